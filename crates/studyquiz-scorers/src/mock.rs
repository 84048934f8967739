//! Mock scorer for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use studyquiz_core::traits::{AnswerScorer, ScoreRequest, ScoreResponse};

use crate::error::ScorerError;

/// A mock scorer for exercising the evaluator without a real service.
///
/// Returns configurable responses keyed by the user's answer, or fails every
/// call when built with [`MockScorer::failing`].
pub struct MockScorer {
    /// Map of exact user answer → response.
    responses: HashMap<String, ScoreResponse>,
    /// Response when no answer matches.
    default_response: ScoreResponse,
    failure: Option<u16>,
    call_count: AtomicU32,
    last_request: Mutex<Option<ScoreRequest>>,
}

impl MockScorer {
    /// Create a mock scorer with the given answer→response mappings.
    pub fn new(responses: HashMap<String, ScoreResponse>) -> Self {
        Self {
            responses,
            default_response: ScoreResponse::default(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same score and feedback.
    pub fn with_fixed_score(score: f64, feedback: &str) -> Self {
        Self {
            default_response: ScoreResponse {
                score: Some(score),
                feedback: Some(feedback.to_string()),
            },
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock whose every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Self::new(HashMap::new())
        }
    }

    /// Number of calls made to this scorer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request made to this scorer.
    pub fn last_request(&self) -> Option<ScoreRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AnswerScorer for MockScorer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn score(&self, request: &ScoreRequest) -> anyhow::Result<ScoreResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        if let Some(status) = self.failure {
            return Err(ScorerError::ApiError {
                status,
                message: "mock failure".into(),
            }
            .into());
        }

        Ok(self
            .responses
            .get(&request.user_answer)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}
