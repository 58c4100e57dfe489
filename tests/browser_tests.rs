//! Browser module tests
//!
//! These tests verify browser configuration, kind parsing, and URL
//! validation. Full browser integration tests require a running
//! Chrome/Chromium instance.

use keyword_web::browser::{BrowserConfig, BrowserKind, DriverFacade, PageNavigator};

#[test]
fn test_browser_config_default() {
    let config = BrowserConfig::default();
    assert!(config.headless);
    assert_eq!(config.width, 1920);
    assert_eq!(config.height, 1080);
    assert!(config.sandbox);
    assert_eq!(config.timeout_ms, 30000);
    assert!(config.user_agent.is_none());
    assert!(config.chrome_path.is_none());
    assert!(config.firefox_path.is_none());
    assert!(config.extra_args.is_empty());
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
        .arg("--no-first-run")
        .build();

    assert!(!config.headless);
    assert_eq!(config.width, 1280);
    assert_eq!(config.height, 720);
    assert!(!config.sandbox);
    assert_eq!(config.user_agent, Some("KeywordBot/1.0".to_string()));
    assert_eq!(config.timeout_ms, 60000);
    assert_eq!(config.extra_args.len(), 2);
}

#[test]
fn test_executable_selection_per_kind() {
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

#[test]
fn test_browser_kind_parse_aliases() {
    assert_eq!(BrowserKind::parse("chromium"), BrowserKind::Chromium);
    assert_eq!(BrowserKind::parse("chrome"), BrowserKind::Chromium);
    assert_eq!(BrowserKind::parse("gc"), BrowserKind::Chromium);
    assert_eq!(BrowserKind::parse("firefox"), BrowserKind::Firefox);
    assert_eq!(BrowserKind::parse("ff"), BrowserKind::Firefox);
    assert_eq!(BrowserKind::parse("FF"), BrowserKind::Firefox);
}

#[test]
fn test_browser_kind_unrecognized_defaults() {
    // Documented leniency: a typo selects the default kind, it does not
    // abort the suite.
    assert_eq!(BrowserKind::parse("opera"), BrowserKind::DEFAULT);
    assert_eq!(BrowserKind::parse(""), BrowserKind::DEFAULT);
    assert_eq!(BrowserKind::DEFAULT, BrowserKind::Chromium);
}

#[test]
fn test_facade_initial_state() {
    let facade = DriverFacade::new(BrowserConfig::default());
    assert_eq!(facade.active_kind(), BrowserKind::Chromium);
}

#[test]
fn test_facade_kind_switching_is_lenient() {
    let mut facade = DriverFacade::new(BrowserConfig::default());
    facade.set_browser_type("ff");
    assert_eq!(facade.active_kind(), BrowserKind::Firefox);
    facade.set_browser_type("definitely-not-a-browser");
    assert_eq!(facade.active_kind(), BrowserKind::Chromium);
}

#[tokio::test]
async fn test_switch_browser_no_sessions_is_attach_failure() {
    let mut facade = DriverFacade::new(BrowserConfig::default());
    let err = facade.switch_browser("Dashboard").await.unwrap_err();
    assert!(err.to_string().contains("Dashboard"));
}

#[test]
fn test_url_validation() {
    assert!(PageNavigator::validate("http://example.com").is_ok());
    assert!(PageNavigator::validate("https://example.com/path?q=1").is_ok());
    assert!(PageNavigator::validate("file:///tmp/page.html").is_ok());

    assert!(PageNavigator::validate("").is_err());
    assert!(PageNavigator::validate("example.com").is_err());
    assert!(PageNavigator::validate("ftp://example.com").is_err());

    let long_url = format!("https://example.com/{}", "a".repeat(3000));
    assert!(PageNavigator::validate(&long_url).is_err());
}
