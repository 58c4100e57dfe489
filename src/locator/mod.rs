//! Element locator resolution
//!
//! The locator resolver turns a caller-supplied identifier string into
//! exactly one element on the page. A fixed, prioritized list of
//! identification criteria (id, class, default attribute, name, value,
//! visible text, positional index) is evaluated as a single any-of query
//! over a snapshot of the page's candidate elements.

pub mod criteria;
pub mod resolver;
pub mod snapshot;

pub use criteria::{Criterion, CriterionList};
pub use resolver::LocatorResolver;
pub use snapshot::{collect_script, parse_snapshot, ElementSnapshot, CHECKBOX_SELECTOR};
