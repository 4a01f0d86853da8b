//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory (or
//! the file passed with `-f`), then applies `REVNS_LOG_LEVEL` and `REVNS_BIND`
//! env overrides. The LLM API key is only ever read from `LLM_API_KEY`.

use std::{
    env, fs,
    path::Path,
};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"` or `"openai"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Knobs for turning retrieval hits into generator context.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalSettings {
    /// Hits after the first are kept only when their score is strictly above this.
    pub min_score: f64,
    /// Characters of assembled context echoed back in an answer.
    pub context_preview_chars: usize,
    /// Characters of each source chunk echoed back in an answer.
    pub source_preview_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            context_preview_chars: default_context_preview_chars(),
            source_preview_chars: default_source_preview_chars(),
        }
    }
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    pub log_level: String,
    /// Socket address for the HTTP API.
    pub bind: String,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY` env var — `None` for keyless local models.
    pub llm_api_key: Option<String>,
    pub retrieval: RetrievalSettings,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    service: RawService,
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    retrieval: RawRetrieval,
}

#[derive(Deserialize)]
struct RawService {
    #[serde(default = "default_service_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawService {
    fn default() -> Self {
        Self { name: default_service_name(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawRetrieval {
    #[serde(default = "default_min_score")]
    min_score: f64,
    #[serde(default = "default_context_preview_chars")]
    context_preview_chars: usize,
    #[serde(default = "default_source_preview_chars")]
    source_preview_chars: usize,
}

impl Default for RawRetrieval {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            context_preview_chars: default_context_preview_chars(),
            source_preview_chars: default_source_preview_chars(),
        }
    }
}

fn default_service_name() -> String { "revns-study".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_min_score() -> f64 { 0.5 }
fn default_context_preview_chars() -> usize { 500 }
fn default_source_preview_chars() -> usize { 200 }

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load config from `path` (default `config/default.toml`), then apply
/// env-var overrides.
///
/// A missing default file is not an error: every field has a default. An
/// explicitly given path must exist.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    if let Some(p) = path {
        if !Path::new(p).exists() {
            return Err(AppError::Config(format!("config file not found: {p}")));
        }
    }
    let log_level_override = env::var("REVNS_LOG_LEVEL").ok();
    let bind_override = env::var("REVNS_BIND").ok();
    let mut config = load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        log_level_override.as_deref(),
        bind_override.as_deref(),
    )?;
    config.llm_api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
    Ok(config)
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    bind_override: Option<&str>,
) -> Result<Config, AppError> {
    let parsed: RawConfig = if path.exists() {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?
    } else {
        RawConfig::default()
    };

    let log_level = log_level_override.unwrap_or(&parsed.service.log_level).to_string();
    logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("log_level: {e}")))?;

    let r = parsed.retrieval;
    if !(0.0..=1.0).contains(&r.min_score) {
        return Err(AppError::Config(format!(
            "retrieval.min_score must be within 0..=1, got {}",
            r.min_score
        )));
    }

    Ok(Config {
        service_name: parsed.service.name,
        log_level,
        bind: bind_override.unwrap_or(&parsed.server.bind).to_string(),
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: None,
        retrieval: RetrievalSettings {
            min_score: r.min_score,
            context_preview_chars: r.context_preview_chars,
            source_preview_chars: r.source_preview_chars,
        },
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            service_name: "test".into(),
            log_level: "info".into(),
            bind: "127.0.0.1:0".into(),
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
            retrieval: RetrievalSettings::default(),
        }
    }
}
