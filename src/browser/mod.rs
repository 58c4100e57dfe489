//! Browser automation module
//!
//! Browser launch and control over CDP: lifecycle, navigation, window
//! control, cookies, the per-kind drivers, and the facade that routes
//! keywords to the active driver.

pub mod controller;
pub mod cookies;
pub mod driver;
pub mod facade;
pub mod navigation;
pub mod window;

pub use controller::{BrowserConfig, BrowserController};
pub use cookies::PageCookies;
pub use driver::{BrowserKind, ChromiumDriver, Driver, FirefoxDriver};
pub use facade::DriverFacade;
pub use navigation::PageNavigator;
pub use window::WindowControl;
