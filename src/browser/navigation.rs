//! Page navigation
//!
//! URL validation, navigation with a timeout budget, load waiting, history,
//! and reload. The load wait polls document readiness and fails when the
//! caller-supplied budget is exhausted.

use crate::error::{BrowserError, Error, Result};
use chromiumoxide::Page;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Interval between document readiness polls
const READY_POLL_MS: u64 = 100;

/// Settle delay after a history traversal
const HISTORY_SETTLE_MS: u64 = 500;

/// Page navigation operations
pub struct PageNavigator;

impl PageNavigator {
    /// Validate a URL for navigation.
    pub fn validate(url: &str) -> std::result::Result<(), String> {
        if url.is_empty() {
            return Err("URL cannot be empty".to_string());
        }

        if !url.starts_with("http://")
            && !url.starts_with("https://")
            && !url.starts_with("file://")
        {
            return Err(format!(
                "URL must start with http://, https://, or file://: {}",
                url
            ));
        }

        if url.len() > 2048 {
            return Err("URL exceeds maximum length of 2048 characters".to_string());
        }

        Ok(())
    }

    /// Navigate to a URL, waiting up to `timeout_ms` for the load to start.
    #[instrument(skip(page))]
    pub async fn goto(page: &Page, url: &str, timeout_ms: u64) -> Result<()> {
        Self::validate(url).map_err(BrowserError::InvalidUrl)?;

        info!("Navigating to: {}", url);

        let timeout = Duration::from_millis(timeout_ms);
        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(timeout_ms))?
            .map_err(|e| BrowserError::LoadFailed(e.to_string()))?;

        debug!("Navigation started: {}", url);
        Ok(())
    }

    /// Wait until the document reports `readyState === "complete"`.
    ///
    /// Fails with a timeout error when the page has not finished loading
    /// within `timeout_ms`.
    #[instrument(skip(page))]
    pub async fn wait_until_loaded(page: &Page, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let ready: bool = page
                .evaluate("document.readyState === 'complete'")
                .await
                .map_err(|e| Error::cdp(e.to_string()))?
                .into_value()
                .unwrap_or(false);

            if ready {
                debug!("Page load complete");
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(timeout_ms).into());
            }

            tokio::time::sleep(Duration::from_millis(READY_POLL_MS)).await;
        }
    }

    /// Go back in browser history.
    ///
    /// Returns `false` when there is no earlier history entry to go back to,
    /// `true` after traversing.
    #[instrument(skip(page))]
    pub async fn back(page: &Page) -> Result<bool> {
        let depth: i64 = page
            .evaluate("window.history.length")
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .into_value()
            .unwrap_or(0);

        if depth <= 1 {
            debug!("No history to go back to");
            return Ok(false);
        }

        page.evaluate("window.history.back()")
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        tokio::time::sleep(Duration::from_millis(HISTORY_SETTLE_MS)).await;
        Ok(true)
    }

    /// Reload the current page.
    #[instrument(skip(page))]
    pub async fn reload(page: &Page) -> Result<()> {
        page.reload()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }

    /// Current location of the page.
    #[instrument(skip(page))]
    pub async fn location(page: &Page) -> Result<String> {
        let url = page
            .url()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .unwrap_or_default();
        Ok(url)
    }

    /// Current document title.
    #[instrument(skip(page))]
    pub async fn title(page: &Page) -> Result<String> {
        let title = page
            .evaluate("document.title")
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .into_value::<String>()
            .unwrap_or_default();
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation_valid_http() {
        assert!(PageNavigator::validate("http://example.com").is_ok());
    }

    #[test]
    fn test_url_validation_valid_https() {
        assert!(PageNavigator::validate("https://example.com").is_ok());
    }

    #[test]
    fn test_url_validation_valid_file() {
        assert!(PageNavigator::validate("file:///path/to/file.html").is_ok());
    }

    #[test]
    fn test_url_validation_empty() {
        let result = PageNavigator::validate("");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("empty"));
    }

    #[test]
    fn test_url_validation_no_protocol() {
        let result = PageNavigator::validate("example.com");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("must start with"));
    }

    #[test]
    fn test_url_validation_invalid_protocol() {
        assert!(PageNavigator::validate("ftp://example.com").is_err());
    }

    #[test]
    fn test_url_validation_too_long() {
        let long_url = format!("https://example.com/{}", "a".repeat(3000));
        let result = PageNavigator::validate(&long_url);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("maximum length"));
    }

    #[test]
    fn test_url_validation_with_query_params() {
        assert!(PageNavigator::validate("https://example.com?foo=bar&baz=123").is_ok());
    }

    #[test]
    fn test_url_validation_with_fragment() {
        assert!(PageNavigator::validate("https://example.com#section").is_ok());
    }
}
