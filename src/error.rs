//! Error types for KeywordWeb
//!
//! This module provides the error type hierarchy using `thiserror`,
//! shared across the locator, browser, and keyword layers.

use thiserror::Error;

/// The main error type for KeywordWeb operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser lifecycle and control errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Element locator resolution errors
    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    /// Browser session selection errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Remote keyword protocol errors
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Browser already closed
    #[error("Browser already closed")]
    AlreadyClosed,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),

    /// Timeout waiting for the browser
    #[error("Browser operation timed out after {0}ms")]
    Timeout(u64),

    /// Named cookie not present on the current page
    #[error("No cookie found with name '{0}'")]
    CookieNotFound(String),
}

/// Element locator resolution errors
///
/// Inapplicable criteria (a non-numeric locator tested against the positional
/// index criterion) are skipped, not errors; only a locator with zero matches
/// across every applicable criterion produces `NotFound`.
#[derive(Error, Debug)]
pub enum LocatorError {
    /// No criterion matched any element
    #[error("No element found matching locator '{locator}'")]
    NotFound {
        /// The locator string that failed to resolve
        locator: String,
    },

    /// A criterion failed to evaluate against the element set
    #[error("Criterion evaluation failed: {0}")]
    Evaluation(String),

    /// The criterion list violates its invariants
    #[error("Invalid criterion list: {0}")]
    InvalidCriteria(String),
}

/// Browser session selection errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// `switch_browser` found no open session matching the pattern
    #[error("No open browser matches '{0}' by title or URL")]
    NoMatch(String),

    /// A keyword was invoked before any browser was opened
    #[error("No active browser session")]
    NoActiveSession,
}

/// Remote keyword protocol errors
#[derive(Error, Debug)]
pub enum RpcError {
    /// Invalid JSON-RPC request
    #[error("Invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    /// Unknown method
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Keyword not found in the registry
    #[error("Unknown keyword: {0}")]
    UnknownKeyword(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias for KeywordWeb operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Browser(BrowserError::LaunchFailed("no chrome".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chrome"));
    }

    #[test]
    fn test_locator_not_found() {
        let err = LocatorError::NotFound {
            locator: "agree".to_string(),
        };
        assert_eq!(err.to_string(), "No element found matching locator 'agree'");
    }

    #[test]
    fn test_session_no_match() {
        let err = SessionError::NoMatch("Checkout - Step 2".to_string());
        assert!(err.to_string().contains("Checkout - Step 2"));
    }

    #[test]
    fn test_rpc_unknown_keyword() {
        let err = RpcError::UnknownKeyword("press_big_red_button".to_string());
        assert_eq!(err.to_string(), "Unknown keyword: press_big_red_button");
    }

    #[test]
    fn test_cookie_not_found() {
        let err = BrowserError::CookieNotFound("sessionid".to_string());
        assert!(err.to_string().contains("sessionid"));
    }

    #[test]
    fn test_generic_error() {
        let err = Error::generic("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
