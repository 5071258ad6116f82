//! Error types for the alert pipeline.

use thiserror::Error;

/// Longest body excerpt carried by [`AlertsError::Parse`].
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Failures a poll can report. Per-row skips (stale history rows,
/// unrecognized category codes) are diagnostics and never show up here.
#[derive(Debug, Error)]
pub enum AlertsError {
    /// Network failure, timeout or non-200 status.
    #[error("failed to retrieve alerts from HFC API: {reason}")]
    Transport {
        /// What went wrong on the wire.
        reason: String,
    },

    /// The upstream served its error page with a 200 status.
    #[error("the HFC API returned a temporary error page")]
    TransientUpstream,

    /// The decoded body is not a feed payload we understand.
    #[error("failed to parse HFC JSON: {reason}, body: {excerpt}")]
    Parse {
        /// Parser message.
        reason: String,
        /// Start of the offending body, truncated to [`EXCERPT_MAX_CHARS`].
        excerpt: String,
    },

    /// Missing or invalid configuration.
    #[error("configuration error: {reason}")]
    Configuration {
        /// Which setting is wrong.
        reason: String,
    },
}

impl AlertsError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl ToString, body: &str) -> Self {
        Self::Parse {
            reason: reason.to_string(),
            excerpt: excerpt(body),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::TransientUpstream => "transient_upstream",
            Self::Parse { .. } => "parse",
            Self::Configuration { .. } => "configuration",
        }
    }
}

impl From<reqwest::Error> for AlertsError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        Self::Transport { reason }
    }
}

fn excerpt(body: &str) -> String {
    let mut out: String = body.chars().take(EXCERPT_MAX_CHARS).collect();
    if body.chars().count() > EXCERPT_MAX_CHARS {
        out.push_str("...");
    }
    out
}

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, AlertsError>;
