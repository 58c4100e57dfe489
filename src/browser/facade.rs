//! Driver facade
//!
//! Holds at most one live driver per browser kind plus the active-kind
//! selector, and forwards each keyword to the currently selected driver
//! instance. Drivers launch lazily: the first keyword that needs a browser
//! opens one of the active kind.

use crate::browser::controller::BrowserConfig;
use crate::browser::driver::{BrowserKind, ChromiumDriver, Driver, FirefoxDriver};
use crate::error::{Result, SessionError};
use crate::locator::LocatorResolver;
use tracing::{debug, info, instrument};

/// Stateful selector routing keywords to the active browser driver.
pub struct DriverFacade {
    config: BrowserConfig,
    resolver: LocatorResolver,
    active: BrowserKind,
    chromium: Option<Box<dyn Driver>>,
    firefox: Option<Box<dyn Driver>>,
}

impl DriverFacade {
    /// Create a facade with the default locator resolver.
    pub fn new(config: BrowserConfig) -> Self {
        Self::with_resolver(config, LocatorResolver::default())
    }

    /// Create a facade with a custom locator resolver.
    pub fn with_resolver(config: BrowserConfig, resolver: LocatorResolver) -> Self {
        Self {
            config,
            resolver,
            active: BrowserKind::DEFAULT,
            chromium: None,
            firefox: None,
        }
    }

    /// The currently selected browser kind.
    pub fn active_kind(&self) -> BrowserKind {
        self.active
    }

    fn slot(&self, kind: BrowserKind) -> Option<&dyn Driver> {
        match kind {
            BrowserKind::Chromium => self.chromium.as_deref(),
            BrowserKind::Firefox => self.firefox.as_deref(),
        }
    }

    fn active_driver(&self) -> Result<&dyn Driver> {
        self.slot(self.active)
            .ok_or_else(|| SessionError::NoActiveSession.into())
    }

    /// Launch a driver for the active kind if none is open yet.
    async fn ensure_active(&mut self) -> Result<()> {
        if self.slot(self.active).is_some() {
            return Ok(());
        }

        info!(kind = self.active.as_str(), "Opening browser session");
        let driver: Box<dyn Driver> = match self.active {
            BrowserKind::Chromium => Box::new(ChromiumDriver::open(&self.config).await?),
            BrowserKind::Firefox => Box::new(FirefoxDriver::open(&self.config).await?),
        };

        match self.active {
            BrowserKind::Chromium => self.chromium = Some(driver),
            BrowserKind::Firefox => self.firefox = Some(driver),
        }
        Ok(())
    }

    /// Navigate the active browser to `url`.
    #[instrument(skip(self))]
    pub async fn go_to(&mut self, url: &str) -> Result<()> {
        self.ensure_active().await?;
        let timeout_ms = self.config.timeout_ms;
        self.active_driver()?.navigate(url, timeout_ms).await
    }

    /// Wait for the current page to finish loading, failing on timeout.
    #[instrument(skip(self))]
    pub async fn wait_until_page_loaded(&mut self, timeout_ms: u64) -> Result<()> {
        self.ensure_active().await?;
        self.active_driver()?.wait_for_load(timeout_ms).await
    }

    /// Go back in the active browser's history.
    #[instrument(skip(self))]
    pub async fn go_back(&mut self) -> Result<bool> {
        self.ensure_active().await?;
        self.active_driver()?.back().await
    }

    /// Maximize the active browser window.
    #[instrument(skip(self))]
    pub async fn maximize_browser_window(&mut self) -> Result<()> {
        self.ensure_active().await?;
        self.active_driver()?.maximize().await
    }

    /// Close the active browser window.
    #[instrument(skip(self))]
    pub async fn close_window(&mut self) -> Result<()> {
        self.active_driver()?.close_window().await
    }

    /// Current location of the active browser.
    #[instrument(skip(self))]
    pub async fn get_location(&mut self) -> Result<String> {
        self.ensure_active().await?;
        self.active_driver()?.url().await
    }

    /// All cookies of the current page; empty on kinds without cookie
    /// support.
    #[instrument(skip(self))]
    pub async fn get_cookies(&mut self) -> Result<String> {
        self.ensure_active().await?;
        self.active_driver()?.cookies().await
    }

    /// Value of the named cookie; fails when absent on a kind with cookie
    /// support, empty otherwise.
    #[instrument(skip(self))]
    pub async fn get_cookie_value(&mut self, name: &str) -> Result<String> {
        self.ensure_active().await?;
        self.active_driver()?.cookie(name).await
    }

    /// Delete all cookies of the active browser.
    #[instrument(skip(self))]
    pub async fn delete_all_cookies(&mut self) -> Result<()> {
        self.ensure_active().await?;
        self.active_driver()?.clear_cookies().await
    }

    /// Select (check) the checkbox identified by `locator`.
    ///
    /// The page's checkboxes are captured once, the locator is resolved
    /// against that snapshot, and only a currently-unchecked box is mutated.
    /// On resolution failure nothing is touched.
    #[instrument(skip(self))]
    pub async fn select_checkbox(&mut self, locator: &str) -> Result<()> {
        info!("Selecting checkbox '{}'", locator);
        self.ensure_active().await?;
        let driver = self.active_driver()?;

        let snapshot = driver.checkbox_snapshot().await?;
        let element = self.resolver.resolve(locator, &snapshot)?;
        driver.check_checkbox(element.index).await
    }

    /// Reload the current page.
    #[instrument(skip(self))]
    pub async fn reload_page(&mut self) -> Result<()> {
        self.ensure_active().await?;
        self.active_driver()?.reload().await
    }

    /// Open a browser of `browser_type` and navigate it to `url`, making it
    /// the active session.
    #[instrument(skip(self))]
    pub async fn open_browser(&mut self, url: &str, browser_type: &str) -> Result<()> {
        self.active = BrowserKind::parse(browser_type);
        self.ensure_active().await?;
        let timeout_ms = self.config.timeout_ms;
        self.active_driver()?.navigate(url, timeout_ms).await
    }

    /// Switch the active browser kind without opening a session.
    #[instrument(skip(self))]
    pub fn set_browser_type(&mut self, browser_type: &str) {
        self.active = BrowserKind::parse(browser_type);
        debug!(kind = self.active.as_str(), "Active browser type set");
    }

    /// Attach to an already-open session whose window title or current URL
    /// equals `pattern` (first match wins, Chromium checked first).
    #[instrument(skip(self))]
    pub async fn switch_browser(&mut self, pattern: &str) -> Result<()> {
        let mut matched = None;

        for kind in [BrowserKind::Chromium, BrowserKind::Firefox] {
            if let Some(driver) = self.slot(kind) {
                let title = driver.title().await.unwrap_or_default();
                let url = driver.url().await.unwrap_or_default();
                if title == pattern || url == pattern {
                    matched = Some(kind);
                    break;
                }
            }
        }

        match matched {
            Some(kind) => {
                info!(kind = kind.as_str(), "Switched active browser");
                self.active = kind;
                Ok(())
            }
            None => Err(SessionError::NoMatch(pattern.to_string()).into()),
        }
    }
}
