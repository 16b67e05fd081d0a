//! Crawling service trait definitions
//!
//! The crawler only sees pages through [`PageFetcher`], so the live HTTP
//! client and in-memory test fetchers are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page body returned by a fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// Requested URL
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub body: String,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Fetch failure after the retry policy gave up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url} after {attempts} attempt(s)")]
    Status { url: String, status: u16, attempts: u32 },

    #[error("request to {url} failed after {attempts} attempt(s): {message}")]
    Transport { url: String, message: String, attempts: u32 },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Status { attempts, .. } | Self::Transport { attempts, .. } => *attempts,
            Self::InvalidUrl { .. } => 0,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::InvalidUrl { url, .. } => url,
        }
    }
}

/// Page fetching service
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body, applying rate limiting and retries
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_exposes_attempts() {
        let err = FetchError::Status {
            url: "https://x".into(),
            status: 503,
            attempts: 3,
        };
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.url(), "https://x");
        assert_eq!(err.to_string(), "HTTP 503 for https://x after 3 attempt(s)");

        let invalid = FetchError::InvalidUrl {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(invalid.attempts(), 0);
    }
}
