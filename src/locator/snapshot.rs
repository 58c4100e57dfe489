//! Element snapshot model
//!
//! A snapshot is the element set a resolve call runs against: every candidate
//! interactive element on the page, captured in document order by a single
//! script evaluation. Snapshots are produced and consumed within one keyword
//! call and never cached across calls, since the page may mutate between
//! keywords.

use serde::{Deserialize, Serialize};

/// One interactive element captured from the live page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Zero-based position in document order among captured elements
    pub index: usize,
    /// Lowercase tag name
    pub tag: String,
    /// `id` attribute, if present
    #[serde(default)]
    pub id: Option<String>,
    /// Class tokens, in attribute order
    #[serde(default)]
    pub classes: Vec<String>,
    /// `name` attribute, if present
    #[serde(default)]
    pub name: Option<String>,
    /// `value` attribute, if present
    #[serde(default)]
    pub value: Option<String>,
    /// Visible text, trimmed
    #[serde(default)]
    pub text: Option<String>,
    /// `alt` attribute (images)
    #[serde(default)]
    pub alt: Option<String>,
    /// `for` attribute (labels)
    #[serde(default, rename = "for")]
    pub label_for: Option<String>,
    /// Checked state for checkboxes and radio buttons
    #[serde(default)]
    pub checked: Option<bool>,
}

impl ElementSnapshot {
    /// The element's default identification attribute value.
    ///
    /// Mirrors the per-tag convention of classic element finders: links match
    /// by their visible text, images by `alt`, labels by `for`, everything
    /// else by `id`.
    pub fn default_attribute(&self) -> Option<&str> {
        match self.tag.as_str() {
            "a" => self.text.as_deref(),
            "img" => self.alt.as_deref(),
            "label" => self.label_for.as_deref(),
            _ => self.id.as_deref(),
        }
    }

    /// Whether this element is a checkbox input.
    pub fn is_checkbox(&self) -> bool {
        self.tag == "input" && self.checked.is_some()
    }
}

/// Selector for checkbox resolution; the element set a checkbox keyword
/// resolves against is the page's checkboxes, indexed within that collection.
pub const CHECKBOX_SELECTOR: &str = "input[type='checkbox']";

/// Build the script that captures the element set for `selector`.
///
/// Returns a JSON array in document order. Actions re-run the same query, so
/// a snapshot index addresses the same node for the duration of one keyword
/// call.
pub fn collect_script(selector: &str) -> String {
    format!(
        r#"
    JSON.stringify(Array.from(
        document.querySelectorAll("{}")
    ).map((el, i) => ({{
        index: i,
        tag: el.tagName.toLowerCase(),
        id: el.id || null,
        classes: Array.from(el.classList),
        name: el.getAttribute('name'),
        value: el.getAttribute('value'),
        text: (el.innerText || el.textContent || '').trim() || null,
        alt: el.getAttribute('alt'),
        for: el.getAttribute('for'),
        checked: (el.tagName === 'INPUT' && (el.type === 'checkbox' || el.type === 'radio'))
            ? el.checked : null
    }})))
"#,
        selector
    )
}

/// Parse the JSON produced by the collection script.
pub fn parse_snapshot(json: &str) -> serde_json::Result<Vec<ElementSnapshot>> {
    serde_json::from_str(json)
}
