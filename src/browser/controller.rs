//! Browser lifecycle management
//!
//! This module handles browser launch, shutdown, and page creation over CDP.

use crate::browser::driver::BrowserKind;
use crate::error::{BrowserError, Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width (default: 1920)
    pub width: u32,
    /// Browser window height (default: 1080)
    pub height: u32,
    /// Enable sandbox (default: true for production)
    pub sandbox: bool,
    /// User agent string (None = use default)
    pub user_agent: Option<String>,
    /// Navigation timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Path to Firefox executable (None = auto-detect)
    pub firefox_path: Option<String>,
    /// Additional browser arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            sandbox: true,
            user_agent: None,
            timeout_ms: 30000,
            chrome_path: None,
            firefox_path: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }

    /// Executable path configured for the given browser kind, if any.
    pub fn executable_for(&self, kind: BrowserKind) -> Option<&str> {
        match kind {
            BrowserKind::Chromium => self.chrome_path.as_deref(),
            BrowserKind::Firefox => self.firefox_path.as_deref(),
        }
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Set navigation timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set Chrome/Chromium path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set Firefox path
    pub fn firefox_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.firefox_path = Some(path.into());
        self
    }

    /// Add an extra browser argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// A launched browser process and its CDP event loop.
pub struct BrowserController {
    browser: Browser,
    handler: JoinHandle<()>,
    kind: BrowserKind,
    session_id: Uuid,
}

impl BrowserController {
    /// Launch a browser of the given kind.
    #[instrument(skip(config))]
    pub async fn launch(kind: BrowserKind, config: &BrowserConfig) -> Result<Self> {
        info!(
            kind = kind.as_str(),
            headless = config.headless,
            "Launching browser"
        );

        let mut builder = CdpBrowserConfig::builder();

        builder = builder.viewport(chromiumoxide::handler::viewport::Viewport {
            width: config.width,
            height: config.height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        });

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.arg("--no-sandbox");
        }

        if let Some(path) = config.executable_for(kind) {
            builder = builder.chrome_executable(path);
        } else if kind == BrowserKind::Firefox {
            // Firefox is only reachable through an explicit executable path;
            // auto-detection finds Chromium binaries.
            warn!("No firefox_path configured; relying on PATH lookup");
        }

        if let Some(ref ua) = config.user_agent {
            builder = builder.arg(format!("--user-agent={}", ua));
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| BrowserError::ConfigError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        let session_id = Uuid::new_v4();
        info!(kind = kind.as_str(), session = %session_id, "Browser launched");

        Ok(Self {
            browser,
            handler: handler_task,
            kind,
            session_id,
        })
    }

    /// Which browser kind this controller drives.
    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    /// Unique id of this browser session, for log correlation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Create a new page/tab.
    #[instrument(skip(self))]
    pub async fn new_page(&self) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        debug!("Created new page");
        Ok(page)
    }

    /// Close the browser.
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        info!(kind = self.kind.as_str(), "Closing browser");

        self.browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let _ = tokio::time::timeout(Duration::from_secs(5), self.handler).await;

        info!("Browser closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert!(config.sandbox);
        assert_eq!(config.timeout_ms, 30000);
        assert!(config.chrome_path.is_none());
        assert!(config.firefox_path.is_none());
    }

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::builder()
            .headless(false)
            .viewport(1280, 720)
            .sandbox(false)
            .user_agent("KeywordBot/1.0")
            .timeout_ms(60000)
            .chrome_path("/usr/bin/chromium")
            .firefox_path("/usr/bin/firefox")
            .arg("--disable-gpu")
            .build();

        assert!(!config.headless);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert!(!config.sandbox);
        assert_eq!(config.user_agent, Some("KeywordBot/1.0".to_string()));
        assert_eq!(config.timeout_ms, 60000);
        assert_eq!(config.extra_args, vec!["--disable-gpu"]);
    }

    #[test]
    fn test_executable_for_kind() {
        let config = BrowserConfig::builder()
            .chrome_path("/opt/chrome")
            .firefox_path("/opt/firefox")
            .build();

        assert_eq!(
            config.executable_for(BrowserKind::Chromium),
            Some("/opt/chrome")
        );
        assert_eq!(
            config.executable_for(BrowserKind::Firefox),
            Some("/opt/firefox")
        );
    }
}
