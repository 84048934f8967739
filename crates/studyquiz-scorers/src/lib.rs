//! studyquiz-scorers: remote answer scoring and service plumbing.
//!
//! Implements the `AnswerScorer` trait over HTTP, loads the studyquiz
//! configuration, and runs the keep-alive ping task.

pub mod config;
pub mod error;
pub mod keepalive;
pub mod mock;
pub mod remote;

pub use config::{create_evaluator, create_scorer, load_config, ScorerConfig, StudyQuizConfig};
pub use error::ScorerError;
pub use keepalive::{KeepAlive, KeepAliveConfig, KeepAliveHandle};
pub use remote::HttpScorer;
