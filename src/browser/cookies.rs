//! Cookie access
//!
//! Reading, formatting, and clearing cookies for the current page over the
//! CDP network domain.

use crate::error::{BrowserError, Error, Result};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::Page;
use tracing::{debug, info, instrument};

/// Cookie operations for a page.
pub struct PageCookies;

impl PageCookies {
    /// All cookies of the current page, formatted as `name=value; ...`.
    #[instrument(skip(page))]
    pub async fn all(page: &Page) -> Result<String> {
        let cookies = page
            .get_cookies()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        debug!("Fetched {} cookies", cookies.len());

        let formatted = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(formatted)
    }

    /// Value of the cookie named `name`.
    ///
    /// Fails with [`BrowserError::CookieNotFound`] when no such cookie exists
    /// on the current page.
    #[instrument(skip(page))]
    pub async fn value(page: &Page, name: &str) -> Result<String> {
        let cookies = page
            .get_cookies()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        cookies
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
            .ok_or_else(|| BrowserError::CookieNotFound(name.to_string()).into())
    }

    /// Delete all browser cookies.
    #[instrument(skip(page))]
    pub async fn clear(page: &Page) -> Result<()> {
        info!("Clearing all cookies");

        page.execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}
