//! Keyword definitions and dispatch
//!
//! The keyword surface a remote runner sees: each keyword has a spec (name,
//! argument names, documentation) served through the protocol's
//! introspection methods, and an implementation that forwards onto the
//! driver facade. Execution is serialized behind a mutex — one keyword runs
//! to completion before the next is served, matching the runner's
//! request/response cycle.

use crate::browser::{BrowserConfig, DriverFacade};
use crate::keyword::types::RunResult;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Static description of one keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSpec {
    /// Keyword name as invoked by the runner
    pub name: &'static str,
    /// Positional argument names
    pub args: &'static [&'static str],
    /// Documentation served to the runner
    pub doc: &'static str,
}

/// All keywords exposed by this server.
pub const KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        name: "go_to",
        args: &["url"],
        doc: "Navigates the active browser instance to the provided URL.",
    },
    KeywordSpec {
        name: "wait_until_page_loaded",
        args: &["timeout_ms"],
        doc: "Waits for a page load to happen, failing when the load has not \
              completed within the given timeout. Use after an action that \
              causes a page load so following keywords see the page fully \
              loaded.",
    },
    KeywordSpec {
        name: "go_back",
        args: &[],
        doc: "Simulates the user clicking the back button on their browser. \
              Returns true if history was traversed, false when there was \
              nothing to go back to.",
    },
    KeywordSpec {
        name: "maximize_browser_window",
        args: &[],
        doc: "Maximizes the current browser window.",
    },
    KeywordSpec {
        name: "close_window",
        args: &[],
        doc: "Closes the currently open window.",
    },
    KeywordSpec {
        name: "get_location",
        args: &[],
        doc: "Returns the URL of the current location.",
    },
    KeywordSpec {
        name: "get_cookies",
        args: &[],
        doc: "Returns all cookies of the current page as 'name=value' pairs. \
              Supported on chromium only; other browsers return an empty \
              string.",
    },
    KeywordSpec {
        name: "get_cookie_value",
        args: &["name"],
        doc: "Returns the value of the cookie found with 'name'. Fails if no \
              cookie with that name exists. Supported on chromium only; \
              other browsers return an empty string.",
    },
    KeywordSpec {
        name: "delete_all_cookies",
        args: &[],
        doc: "Deletes all cookies of the active browser.",
    },
    KeywordSpec {
        name: "select_checkbox",
        args: &["locator"],
        doc: "Selects the checkbox identified by 'locator'. Does nothing if \
              the checkbox is already selected. Key attributes for \
              checkboxes are id and name; class, default attribute, value, \
              visible text, and zero-based position are also tried, in that \
              order.",
    },
    KeywordSpec {
        name: "reload_page",
        args: &[],
        doc: "Reloads the current page.",
    },
    KeywordSpec {
        name: "open_browser",
        args: &["url", "browser_type"],
        doc: "Opens a browser of the given type at the given URL and makes \
              it the active session. Use 'chromium' or 'firefox'; \
              unrecognized values select the default browser.",
    },
    KeywordSpec {
        name: "set_browser_type",
        args: &["browser_type"],
        doc: "Selects which browser kind subsequent keywords drive. Use \
              'chromium' or 'firefox'; unrecognized values select the \
              default browser.",
    },
    KeywordSpec {
        name: "switch_browser",
        args: &["match_string"],
        doc: "Switches the active session to an already-open browser whose \
              window title or current URL equals 'match_string'. Fails when \
              no open browser matches.",
    },
];

/// Look up a keyword spec by name.
pub fn spec(name: &str) -> Option<&'static KeywordSpec> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// Registry executing keywords against a driver facade.
pub struct KeywordRegistry {
    facade: Mutex<DriverFacade>,
}

impl KeywordRegistry {
    /// Create a registry with a fresh facade over `config`.
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            facade: Mutex::new(DriverFacade::new(config)),
        }
    }

    /// Create a registry over an existing facade.
    pub fn with_facade(facade: DriverFacade) -> Self {
        Self {
            facade: Mutex::new(facade),
        }
    }

    /// Names of all keywords, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        KEYWORDS.iter().map(|k| k.name).collect()
    }

    /// Execute a keyword by name.
    ///
    /// Every failure — unknown keyword, bad arguments, browser or locator
    /// error — is reported as a FAIL result; nothing panics across the
    /// protocol boundary.
    #[instrument(skip(self, args))]
    pub async fn run(&self, name: &str, args: &[Value]) -> RunResult {
        info!("Running keyword: {}", name);

        let Some(spec) = spec(name) else {
            return RunResult::fail(format!("Unknown keyword: {}", name));
        };

        if args.len() != spec.args.len() {
            return RunResult::fail(format!(
                "Keyword '{}' expected {} argument(s) ({}), got {}",
                name,
                spec.args.len(),
                spec.args.join(", "),
                args.len()
            ));
        }

        let mut facade = self.facade.lock().await;
        self.dispatch(&mut facade, name, args).await
    }

    async fn dispatch(
        &self,
        facade: &mut DriverFacade,
        name: &str,
        args: &[Value],
    ) -> RunResult {
        match name {
            "go_to" => {
                let url = match str_arg(args, 0, "url") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.go_to(&url).await {
                    Ok(()) => RunResult::pass_with_output(
                        Value::Null,
                        format!("Opening url '{}'", url),
                    ),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            "wait_until_page_loaded" => {
                let timeout_ms = match u64_arg(args, 0, "timeout_ms") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.wait_until_page_loaded(timeout_ms).await {
                    Ok(()) => RunResult::pass(Value::Null),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            "go_back" => match facade.go_back().await {
                Ok(went) => RunResult::pass(json!(went)),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "maximize_browser_window" => match facade.maximize_browser_window().await {
                Ok(()) => RunResult::pass(Value::Null),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "close_window" => match facade.close_window().await {
                Ok(()) => RunResult::pass(Value::Null),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "get_location" => match facade.get_location().await {
                Ok(url) => RunResult::pass(json!(url)),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "get_cookies" => match facade.get_cookies().await {
                Ok(cookies) => RunResult::pass(json!(cookies)),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "get_cookie_value" => {
                let cookie_name = match str_arg(args, 0, "name") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.get_cookie_value(&cookie_name).await {
                    Ok(value) => RunResult::pass(json!(value)),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            "delete_all_cookies" => match facade.delete_all_cookies().await {
                Ok(()) => RunResult::pass(Value::Null),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "select_checkbox" => {
                let locator = match str_arg(args, 0, "locator") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.select_checkbox(&locator).await {
                    Ok(()) => RunResult::pass_with_output(
                        Value::Null,
                        format!("Selecting checkbox '{}'.", locator),
                    ),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            "reload_page" => match facade.reload_page().await {
                Ok(()) => RunResult::pass(Value::Null),
                Err(e) => RunResult::fail(e.to_string()),
            },
            "open_browser" => {
                let url = match str_arg(args, 0, "url") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                let browser_type = match str_arg(args, 1, "browser_type") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.open_browser(&url, &browser_type).await {
                    Ok(()) => RunResult::pass_with_output(
                        Value::Null,
                        format!("Opening url '{}' in {}", url, browser_type),
                    ),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            "set_browser_type" => {
                let browser_type = match str_arg(args, 0, "browser_type") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                facade.set_browser_type(&browser_type);
                RunResult::pass(json!(facade.active_kind().as_str()))
            }
            "switch_browser" => {
                let pattern = match str_arg(args, 0, "match_string") {
                    Ok(v) => v,
                    Err(e) => return RunResult::fail(e),
                };
                match facade.switch_browser(&pattern).await {
                    Ok(()) => RunResult::pass(json!(facade.active_kind().as_str())),
                    Err(e) => RunResult::fail(e.to_string()),
                }
            }
            // Arity was validated against KEYWORDS, so this is unreachable
            // for any registered keyword.
            other => RunResult::fail(format!("Unknown keyword: {}", other)),
        }
    }
}

/// Extract a required string argument.
fn str_arg(args: &[Value], index: usize, name: &str) -> Result<String, String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string().trim_matches('"').to_string()),
        None => Err(format!("Missing required argument: {}", name)),
    }
}

/// Extract a required non-negative integer argument; numeric strings are
/// accepted, since keyword runners pass everything as text.
fn u64_arg(args: &[Value], index: usize, name: &str) -> Result<u64, String> {
    match args.get(index) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| format!("Argument '{}' must be a non-negative integer", name)),
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|_| format!("Argument '{}' must be a non-negative integer", name)),
        Some(_) | None => Err(format!(
            "Argument '{}' must be a non-negative integer",
            name
        )),
    }
}
