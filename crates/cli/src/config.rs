//! Configuration file loading.
//!
//! The configuration is a small JSON document read once at startup:
//!
//! ```json
//! { "organization": "acme", "auth_token": "ghp_..." }
//! ```
//!
//! `org` and `auth` are accepted as aliases. A non-empty `GITHUB_TOKEN`
//! environment variable overrides the file's token. Any problem is fatal
//! before the first network request.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use github::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use report::{
    Organization, PipelineSettings, ReportError, TruncationPolicy, DEFAULT_MAX_CONCURRENCY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl From<ConfigError> for ReportError {
    fn from(err: ConfigError) -> Self {
        ReportError::Config {
            message: err.to_string(),
        }
    }
}

/// The file as written by the user.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(alias = "org")]
    organization: String,
    #[serde(alias = "auth", default)]
    auth_token: Option<String>,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    max_concurrency: Option<usize>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    allow_truncated: bool,
}

/// Validated runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub organization: Organization,
    pub auth_token: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub pipeline: PipelineSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("auth_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl Config {
    /// Reads and validates the file at `path`.
    ///
    /// `token_override` (normally `GITHUB_TOKEN`) replaces the file's token
    /// when it is set and non-empty.
    pub fn load(path: &Path, token_override: Option<String>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path, token_override)
    }

    fn parse(text: &str, path: &Path, token_override: Option<String>) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        let organization = Organization::new(raw.organization.trim())
            .ok_or_else(|| invalid("organization is empty"))?;

        let auth_token = token_override
            .filter(|token| !token.trim().is_empty())
            .or(raw.auth_token)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| invalid("auth_token is missing (set it or GITHUB_TOKEN)"))?;

        let max_concurrency =
            NonZeroUsize::new(raw.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY))
                .ok_or_else(|| invalid("max_concurrency must be at least 1"))?;

        let request_timeout = match raw.request_timeout_secs {
            Some(0) => return Err(invalid("request_timeout_secs must be at least 1")),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let truncation = if raw.allow_truncated {
            TruncationPolicy::Warn
        } else {
            TruncationPolicy::Fail
        };

        Ok(Self {
            organization,
            auth_token,
            api_base_url: raw
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout,
            pipeline: PipelineSettings {
                max_concurrency,
                truncation,
            },
        })
    }
}
