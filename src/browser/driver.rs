//! Browser drivers
//!
//! One `Driver` implementation per supported browser kind. Keywords are
//! forwarded to a selected driver instance; there is no string comparison on
//! a browser name anywhere past the parse boundary.
//!
//! Cookie access is a Chromium-only capability: the Firefox CDP subset does
//! not expose it, so the Firefox driver degrades cookie keywords to empty
//! results instead of failing.

use crate::browser::controller::{BrowserConfig, BrowserController};
use crate::browser::cookies::PageCookies;
use crate::browser::navigation::PageNavigator;
use crate::browser::window::WindowControl;
use crate::error::{Error, Result};
use crate::locator::{collect_script, parse_snapshot, ElementSnapshot, CHECKBOX_SELECTOR};
use async_trait::async_trait;
use chromiumoxide::Page;
use tracing::{debug, instrument, warn};

/// The closed set of supported browser kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    /// Chrome/Chromium over full CDP
    Chromium,
    /// Firefox over its CDP subset
    Firefox,
}

impl BrowserKind {
    /// The default kind used when none is specified.
    pub const DEFAULT: BrowserKind = BrowserKind::Chromium;

    /// Parse a caller-supplied browser type string.
    ///
    /// Unrecognized values fall back to the default kind with a warning
    /// rather than erroring; a typo in a test suite selects the default
    /// browser instead of aborting the run.
    pub fn parse(value: &str) -> BrowserKind {
        match value.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" | "gc" => BrowserKind::Chromium,
            "firefox" | "ff" => BrowserKind::Firefox,
            other => {
                warn!(
                    browser_type = other,
                    "Unrecognized browser type, using default"
                );
                BrowserKind::DEFAULT
            }
        }
    }

    /// Stable name for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The abstract browser interface every keyword is forwarded through.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Which kind of browser this driver controls
    fn kind(&self) -> BrowserKind;

    /// Navigate the session to `url`
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Wait until the current page has finished loading
    async fn wait_for_load(&self, timeout_ms: u64) -> Result<()>;

    /// Go back in history; false when there is nothing to go back to
    async fn back(&self) -> Result<bool>;

    /// Maximize the browser window
    async fn maximize(&self) -> Result<()>;

    /// Close the current window
    async fn close_window(&self) -> Result<()>;

    /// Current location URL
    async fn url(&self) -> Result<String>;

    /// Current window title
    async fn title(&self) -> Result<String>;

    /// All cookies of the current page as `name=value; ...`
    async fn cookies(&self) -> Result<String>;

    /// Value of the named cookie; fails when absent
    async fn cookie(&self, name: &str) -> Result<String>;

    /// Delete all cookies
    async fn clear_cookies(&self) -> Result<()>;

    /// Reload the current page
    async fn reload(&self) -> Result<()>;

    /// Capture the page's checkboxes in document order
    async fn checkbox_snapshot(&self) -> Result<Vec<ElementSnapshot>>;

    /// Check the checkbox at snapshot position `index`; no-op when already
    /// checked
    async fn check_checkbox(&self, index: usize) -> Result<()>;
}

/// Shared CDP session state behind both driver kinds.
struct CdpSession {
    #[allow(dead_code)]
    controller: BrowserController,
    page: Page,
}

impl CdpSession {
    async fn open(kind: BrowserKind, config: &BrowserConfig) -> Result<Self> {
        let controller = BrowserController::launch(kind, config).await?;
        let page = controller.new_page().await?;
        Ok(Self { controller, page })
    }

    fn page(&self) -> &Page {
        &self.page
    }

    async fn checkbox_snapshot(&self) -> Result<Vec<ElementSnapshot>> {
        let json: String = self
            .page
            .evaluate(collect_script(CHECKBOX_SELECTOR).as_str())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .into_value()
            .map_err(|e| Error::cdp(e.to_string()))?;

        let elements = parse_snapshot(&json)?;
        debug!("Captured {} checkbox candidates", elements.len());
        Ok(elements)
    }

    async fn check_checkbox(&self, index: usize) -> Result<()> {
        // Re-runs the snapshot query so the index addresses the same node;
        // never toggles an already-checked box.
        let script = format!(
            r#"
            (() => {{
                const els = document.querySelectorAll("{}");
                const el = els[{}];
                if (!el) return 'missing';
                if (!el.checked) {{
                    el.checked = true;
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return 'checked';
                }}
                return 'already-checked';
            }})()
            "#,
            CHECKBOX_SELECTOR, index
        );

        let outcome: String = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .into_value()
            .map_err(|e| Error::cdp(e.to_string()))?;

        match outcome.as_str() {
            "checked" | "already-checked" => {
                debug!(index, outcome = %outcome, "Checkbox selected");
                Ok(())
            }
            _ => Err(Error::generic(format!(
                "checkbox at position {} no longer present",
                index
            ))),
        }
    }
}

/// Chrome/Chromium driver with the full capability set.
pub struct ChromiumDriver {
    session: CdpSession,
}

impl ChromiumDriver {
    /// Launch a Chromium session.
    #[instrument(skip(config))]
    pub async fn open(config: &BrowserConfig) -> Result<Self> {
        let session = CdpSession::open(BrowserKind::Chromium, config).await?;
        Ok(Self { session })
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    fn kind(&self) -> BrowserKind {
        BrowserKind::Chromium
    }

    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()> {
        PageNavigator::goto(self.session.page(), url, timeout_ms).await
    }

    async fn wait_for_load(&self, timeout_ms: u64) -> Result<()> {
        PageNavigator::wait_until_loaded(self.session.page(), timeout_ms).await
    }

    async fn back(&self) -> Result<bool> {
        PageNavigator::back(self.session.page()).await
    }

    async fn maximize(&self) -> Result<()> {
        WindowControl::maximize(self.session.page()).await
    }

    async fn close_window(&self) -> Result<()> {
        WindowControl::close(self.session.page()).await
    }

    async fn url(&self) -> Result<String> {
        PageNavigator::location(self.session.page()).await
    }

    async fn title(&self) -> Result<String> {
        PageNavigator::title(self.session.page()).await
    }

    async fn cookies(&self) -> Result<String> {
        PageCookies::all(self.session.page()).await
    }

    async fn cookie(&self, name: &str) -> Result<String> {
        PageCookies::value(self.session.page(), name).await
    }

    async fn clear_cookies(&self) -> Result<()> {
        PageCookies::clear(self.session.page()).await
    }

    async fn reload(&self) -> Result<()> {
        PageNavigator::reload(self.session.page()).await
    }

    async fn checkbox_snapshot(&self) -> Result<Vec<ElementSnapshot>> {
        self.session.checkbox_snapshot().await
    }

    async fn check_checkbox(&self, index: usize) -> Result<()> {
        self.session.check_checkbox(index).await
    }
}

/// Firefox driver over the Firefox CDP subset.
///
/// Cookie operations are not available on this kind and degrade to empty
/// results rather than failing.
pub struct FirefoxDriver {
    session: CdpSession,
}

impl FirefoxDriver {
    /// Launch a Firefox session.
    #[instrument(skip(config))]
    pub async fn open(config: &BrowserConfig) -> Result<Self> {
        let session = CdpSession::open(BrowserKind::Firefox, config).await?;
        Ok(Self { session })
    }
}

#[async_trait]
impl Driver for FirefoxDriver {
    fn kind(&self) -> BrowserKind {
        BrowserKind::Firefox
    }

    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()> {
        PageNavigator::goto(self.session.page(), url, timeout_ms).await
    }

    async fn wait_for_load(&self, timeout_ms: u64) -> Result<()> {
        PageNavigator::wait_until_loaded(self.session.page(), timeout_ms).await
    }

    async fn back(&self) -> Result<bool> {
        PageNavigator::back(self.session.page()).await
    }

    async fn maximize(&self) -> Result<()> {
        WindowControl::maximize(self.session.page()).await
    }

    async fn close_window(&self) -> Result<()> {
        WindowControl::close(self.session.page()).await
    }

    async fn url(&self) -> Result<String> {
        PageNavigator::location(self.session.page()).await
    }

    async fn title(&self) -> Result<String> {
        PageNavigator::title(self.session.page()).await
    }

    async fn cookies(&self) -> Result<String> {
        debug!("Cookie access unsupported on firefox, returning empty");
        Ok(String::new())
    }

    async fn cookie(&self, _name: &str) -> Result<String> {
        debug!("Cookie access unsupported on firefox, returning empty");
        Ok(String::new())
    }

    async fn clear_cookies(&self) -> Result<()> {
        debug!("Cookie access unsupported on firefox, skipping clear");
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        PageNavigator::reload(self.session.page()).await
    }

    async fn checkbox_snapshot(&self) -> Result<Vec<ElementSnapshot>> {
        self.session.checkbox_snapshot().await
    }

    async fn check_checkbox(&self, index: usize) -> Result<()> {
        self.session.check_checkbox(index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(BrowserKind::parse("chromium"), BrowserKind::Chromium);
        assert_eq!(BrowserKind::parse("chrome"), BrowserKind::Chromium);
        assert_eq!(BrowserKind::parse("gc"), BrowserKind::Chromium);
        assert_eq!(BrowserKind::parse("firefox"), BrowserKind::Firefox);
        assert_eq!(BrowserKind::parse("ff"), BrowserKind::Firefox);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(BrowserKind::parse("FireFox"), BrowserKind::Firefox);
        assert_eq!(BrowserKind::parse("  Chrome  "), BrowserKind::Chromium);
    }

    #[test]
    fn test_parse_unrecognized_falls_back_to_default() {
        assert_eq!(BrowserKind::parse("safari"), BrowserKind::DEFAULT);
        assert_eq!(BrowserKind::parse(""), BrowserKind::DEFAULT);
        assert_eq!(BrowserKind::parse("ie"), BrowserKind::DEFAULT);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(BrowserKind::Chromium.to_string(), "chromium");
        assert_eq!(BrowserKind::Firefox.to_string(), "firefox");
    }
}
