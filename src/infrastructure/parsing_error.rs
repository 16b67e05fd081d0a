//! Parsing error types
//!
//! Errors raised while turning fetched HTML into product candidates and
//! category links. Most are recoverable: the crawler logs them and moves on
//! to the next page.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn url_resolution_failed(url: &str, reason: impl ToString, base_url: Option<&str>) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: base_url.map(ToString::to_string),
        }
    }

    pub fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Page level errors are skipped; setup errors abort
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::RequiredFieldMissing { .. } | Self::UrlResolutionFailed { .. } => true,
            Self::InvalidSelector { .. } | Self::InvalidPattern { .. } => false,
        }
    }
}

impl From<regex::Error> for ParsingError {
    fn from(err: regex::Error) -> Self {
        match err {
            regex::Error::Syntax(ref detail) => Self::invalid_pattern(detail, &err),
            _ => Self::invalid_pattern("<regex>", &err),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverability() {
        assert!(ParsingError::required_field_missing("name", Some("https://x")).is_recoverable());
        assert!(!ParsingError::invalid_selector("td[", "unexpected end").is_recoverable());
    }

    #[test]
    fn regex_errors_convert() {
        let err: ParsingError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, ParsingError::InvalidPattern { .. }));
    }
}
