//! Configuration loading and scorer factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studyquiz_core::evaluator::AnswerEvaluator;
use studyquiz_core::sampler::MAX_SESSION_QUESTIONS;
use studyquiz_core::traits::AnswerScorer;

use crate::keepalive::KeepAliveConfig;
use crate::remote::HttpScorer;

/// Remote scoring settings. Without a URL only the local heuristic is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// Bound on each remote call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level studyquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyQuizConfig {
    /// Directory of subject TOML banks.
    #[serde(default = "default_bank_dir")]
    pub bank_dir: PathBuf,
    /// Subject used when none is given.
    #[serde(default = "default_subject")]
    pub default_subject: String,
    /// Max questions per session; clamped to `1..=10` when sampling.
    #[serde(default = "default_session_size")]
    pub session_size: usize,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub keep_alive: KeepAliveConfig,
}

fn default_bank_dir() -> PathBuf {
    PathBuf::from("./question-banks")
}
fn default_subject() -> String {
    "hematology".to_string()
}
fn default_session_size() -> usize {
    MAX_SESSION_QUESTIONS
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for StudyQuizConfig {
    fn default() -> Self {
        Self {
            bank_dir: default_bank_dir(),
            default_subject: default_subject(),
            session_size: default_session_size(),
            scorer: ScorerConfig::default(),
            keep_alive: KeepAliveConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = lookup(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `studyquiz.toml` in the current directory
/// 2. `~/.config/studyquiz/config.toml`
///
/// Environment variable overrides: `STUDYQUIZ_SCORER_URL`,
/// `KEEP_ALIVE_PING_URL`, `KEEP_ALIVE_INTERVAL_MS`.
pub fn load_config() -> Result<StudyQuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyQuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyquiz.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<StudyQuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StudyQuizConfig::default(),
    };

    Ok(finalize(config, |name| std::env::var(name).ok()))
}

/// Apply environment overrides, then resolve `${VAR}` references.
fn finalize(mut config: StudyQuizConfig, lookup: impl Fn(&str) -> Option<String>) -> StudyQuizConfig {
    if let Some(url) = lookup("STUDYQUIZ_SCORER_URL") {
        config.scorer.url = Some(url);
    }
    if let Some(url) = lookup("KEEP_ALIVE_PING_URL") {
        config.keep_alive.url = Some(url);
    }
    if let Some(raw) = lookup("KEEP_ALIVE_INTERVAL_MS") {
        config.keep_alive.interval_ms = match raw.trim().parse::<i64>() {
            Ok(ms) if ms > 0 => ms as u64,
            _ => {
                tracing::warn!("invalid KEEP_ALIVE_INTERVAL_MS value '{raw}', skipping keep-alive pings");
                0
            }
        };
    }

    config.bank_dir = PathBuf::from(resolve_env_vars(&config.bank_dir.to_string_lossy(), &lookup));
    config.default_subject = resolve_env_vars(&config.default_subject, &lookup);
    config.scorer.url = config
        .scorer
        .url
        .as_deref()
        .map(|u| resolve_env_vars(u, &lookup))
        .filter(|u| !u.trim().is_empty());
    config.keep_alive.url = config
        .keep_alive
        .url
        .as_deref()
        .map(|u| resolve_env_vars(u, &lookup))
        .filter(|u| !u.trim().is_empty());

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyquiz"))
}

/// Create the remote scorer described by the config, if any.
pub fn create_scorer(config: &ScorerConfig) -> Result<Option<Arc<dyn AnswerScorer>>> {
    match &config.url {
        Some(url) => {
            let scorer = HttpScorer::new(url, Duration::from_secs(config.timeout_secs))?;
            Ok(Some(Arc::new(scorer)))
        }
        None => Ok(None),
    }
}

/// Build the answer evaluator for a scorer config.
pub fn create_evaluator(config: &ScorerConfig) -> Result<AnswerEvaluator> {
    let timeout = Duration::from_secs(config.timeout_secs);
    Ok(match create_scorer(config)? {
        Some(scorer) => AnswerEvaluator::new(scorer).with_timeout(timeout),
        None => AnswerEvaluator::local_only(),
    })
}
