//! KeywordWeb remote keyword server
//!
//! Serves browser-automation keywords to a keyword-driven test runner.

#![recursion_limit = "512"]

use clap::Parser;
use keyword_web::browser::{BrowserConfig, DriverFacade};
use keyword_web::keyword::{KeywordRegistry, KeywordServer};
use std::sync::Arc;

/// KeywordWeb remote keyword server
#[derive(Parser, Debug)]
#[command(name = "kw-web")]
#[command(version)]
#[command(about = "Remote keyword server for browser automation")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8270")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Serve over stdio instead of HTTP
    #[arg(long)]
    stdio: bool,

    /// Default browser type (chromium or firefox)
    #[arg(short, long, default_value = "chromium")]
    browser: String,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Path to Firefox executable
    #[arg(long)]
    firefox_path: Option<String>,

    /// Run browsers with a visible window
    #[arg(long)]
    headed: bool,

    /// Navigation timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut builder = BrowserConfig::builder()
        .headless(!args.headed)
        .timeout_ms(args.timeout_ms);
    if let Some(path) = args.chrome_path {
        builder = builder.chrome_path(path);
    }
    if let Some(path) = args.firefox_path {
        builder = builder.firefox_path(path);
    }
    let config = builder.build();

    // Browsers launch lazily; the CLI value goes through the same lenient
    // parse as the set_browser_type keyword.
    let mut facade = DriverFacade::new(config);
    facade.set_browser_type(&args.browser);

    let registry = KeywordRegistry::with_facade(facade);
    let server = Arc::new(KeywordServer::new(registry));

    if args.stdio {
        server.run_stdio().await?;
    } else {
        tracing::info!(
            "KeywordWeb server starting on {}:{}",
            args.host,
            args.port
        );
        server.serve_http(&args.host, args.port).await?;
    }

    Ok(())
}
