//! studyquiz-core: quiz session engine, data model, and scoring.
//!
//! This crate defines the question-bank model, the session state machine,
//! answer evaluation, and the summary statistics the rest of studyquiz
//! builds on.

pub mod bank;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod pool;
pub mod report;
pub mod sampler;
pub mod session;
pub mod statistics;
pub mod traits;
