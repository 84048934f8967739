//! Periodic keep-alive pings.
//!
//! A background task GETs the target URL on a fixed interval so a hosted
//! scoring service does not idle out. Ping failures are logged and never stop
//! the task; only [`KeepAliveHandle::stop`] does.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Keep-alive settings. Pings run only with a URL and a positive interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    120_000
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_ms: default_interval_ms(),
        }
    }
}

impl KeepAliveConfig {
    pub fn is_enabled(&self) -> bool {
        self.url.is_some() && self.interval_ms > 0
    }
}

pub struct KeepAlive;

impl KeepAlive {
    /// Spawn the ping task on the current tokio runtime.
    pub fn start(config: &KeepAliveConfig) -> Result<KeepAliveHandle> {
        let url = config
            .url
            .clone()
            .context("keep-alive requires a ping URL")?;
        anyhow::ensure!(
            config.interval_ms > 0,
            "keep-alive interval must be positive, got {}",
            config.interval_ms
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.interval_ms))
            .build()
            .context("failed to build HTTP client")?;
        let period = Duration::from_millis(config.interval_ms);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        tracing::info!("pinging {url} every {}s", period.as_secs_f64());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => ping(&client, &url).await,
                }
            }
            tracing::debug!("keep-alive stopped");
        });

        Ok(KeepAliveHandle {
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

async fn ping(client: &reqwest::Client, url: &str) {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!("keep-alive ping ok");
        }
        Ok(response) => {
            tracing::warn!("keep-alive ping failed with status {}", response.status());
        }
        Err(e) => {
            tracing::warn!("keep-alive ping failed: {e}");
        }
    }
}

/// Owns the running ping task.
pub struct KeepAliveHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl KeepAliveHandle {
    /// Stop pinging and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!("keep-alive task ended abnormally: {e}");
        }
    }
}

impl Drop for KeepAliveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn disabled_without_url_or_interval() {
        assert!(!KeepAliveConfig::default().is_enabled());
        assert!(!KeepAliveConfig {
            url: Some("http://localhost".into()),
            interval_ms: 0,
        }
        .is_enabled());
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let err = KeepAlive::start(&KeepAliveConfig {
            url: Some("http://localhost".into()),
            interval_ms: 0,
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("must be positive"));
    }

    #[tokio::test]
    async fn missing_url_is_rejected() {
        assert!(KeepAlive::start(&KeepAliveConfig::default()).is_err());
    }

    #[tokio::test]
    async fn pings_until_stopped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let handle = KeepAlive::start(&KeepAliveConfig {
            url: Some(format!("{}/", server.uri())),
            interval_ms: 20,
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.stop().await;

        let seen = server.received_requests().await.unwrap().len();
        assert!(seen >= 2, "expected repeated pings, saw {seen}");

        tokio::time::sleep(Duration::from_millis(100)).await;
        let after = server.received_requests().await.unwrap().len();
        assert_eq!(after, seen, "no pings after stop");
    }

    #[tokio::test]
    async fn failing_target_does_not_stop_task() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let handle = KeepAlive::start(&KeepAliveConfig {
            url: Some(server.uri()),
            interval_ms: 20,
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!handle.task.is_finished());
        handle.stop().await;
        assert!(server.received_requests().await.unwrap().len() >= 2);
    }
}
