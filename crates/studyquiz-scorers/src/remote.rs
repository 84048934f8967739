//! HTTP answer scorer.
//!
//! POSTs `{ "userAnswer", "correctAnswer" }` to the configured endpoint and
//! expects `{ "score", "feedback" }` back. Either response field may be absent.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use studyquiz_core::traits::{AnswerScorer, ScoreRequest, ScoreResponse};

use crate::error::ScorerError;

/// Path appended to a bare base URL.
pub const EVALUATE_PATH: &str = "/api/evaluate";

/// Remote scoring service reached over HTTP.
pub struct HttpScorer {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpScorer {
    /// `url` is either the full endpoint or a base URL without a path, in
    /// which case `/api/evaluate` is appended.
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            endpoint: endpoint_for(url),
            timeout_secs: timeout.as_secs(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_for(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let has_path = trimmed
        .split_once("://")
        .map(|(_, rest)| rest.contains('/'))
        .unwrap_or(false);
    if has_path {
        trimmed.to_string()
    } else {
        format!("{trimmed}{EVALUATE_PATH}")
    }
}

#[async_trait]
impl AnswerScorer for HttpScorer {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn score(&self, request: &ScoreRequest) -> anyhow::Result<ScoreResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScorerError::Timeout(self.timeout_secs)
                } else {
                    ScorerError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScorerError::ApiError {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| ScorerError::MalformedResponse(e.to_string()))?;

        tracing::debug!(score = ?body.score, "remote score received");
        Ok(body)
    }
}
