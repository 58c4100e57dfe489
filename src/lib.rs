//! KeywordWeb - Remote Keyword Server for Browser Automation
//!
//! This crate serves a flat surface of browser-automation keywords to a
//! keyword-driven test runner over JSON-RPC (HTTP or stdio). Each keyword is
//! a thin delegation onto a live browser session driven over the Chrome
//! DevTools Protocol.
//!
//! # Features
//!
//! - **Remote keyword protocol**: JSON-RPC server with keyword
//!   introspection (`get_keyword_names`, `run_keyword`, ...)
//! - **Locator resolution**: multi-criteria element lookup — id, class,
//!   default attribute, name, value, visible text, and positional index,
//!   tried in priority order
//! - **Driver facade**: chromium and firefox sessions behind one polymorphic
//!   driver interface
//!
//! # Architecture
//!
//! ```text
//! Test Runner ──▶ Keyword Server ──▶ Keyword Registry
//!                      │                   │
//!                      ▼                   ▼
//!                ┌──────────┐       ┌──────────────┐
//!                │ /status  │       │ DriverFacade │
//!                └──────────┘       └──────┬───────┘
//!                                          │
//!                               ┌──────────┴──────────┐
//!                               ▼                     ▼
//!                        ChromiumDriver         FirefoxDriver
//!                               │                     │
//!                               └──── CDP session ────┘
//!                                 (locator resolver runs
//!                                  over page snapshots)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use keyword_web::browser::{BrowserConfig, DriverFacade};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut facade = DriverFacade::new(BrowserConfig::default());
//!
//!     facade.open_browser("https://example.com", "chromium").await?;
//!     facade.select_checkbox("agree").await?;
//!
//!     println!("Now at: {}", facade.get_location().await?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod keyword;
pub mod locator;

// Re-exports for convenience
pub use browser::{BrowserConfig, BrowserKind, Driver, DriverFacade};
pub use error::{Error, Result};
pub use keyword::{KeywordRegistry, KeywordServer, RunResult, RunStatus};
pub use locator::{Criterion, CriterionList, ElementSnapshot, LocatorResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
