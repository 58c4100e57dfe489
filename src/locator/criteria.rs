//! Identification criteria
//!
//! A criterion is a named predicate over one attribute class of an element.
//! Criteria are evaluated in list order; the list is the priority. The
//! positional index criterion carries an applicability condition instead of
//! relying on a failed integer parse to signal "not this one".

use crate::error::LocatorError;
use crate::locator::snapshot::ElementSnapshot;

/// A named predicate matching an element by one attribute class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// `id` attribute equality
    ById,
    /// Class token membership
    ByClass,
    /// Per-tag default identification attribute equality
    ByDefault,
    /// `name` attribute equality
    ByName,
    /// `value` attribute equality
    ByValue,
    /// Visible text equality
    ByText,
    /// Zero-based document-order position; applicable only to numeric locators
    ByIndex,
}

impl Criterion {
    /// Stable name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::ById => "id",
            Criterion::ByClass => "class",
            Criterion::ByDefault => "default",
            Criterion::ByName => "name",
            Criterion::ByValue => "value",
            Criterion::ByText => "text",
            Criterion::ByIndex => "index",
        }
    }

    /// Whether this criterion can be evaluated against the locator at all.
    ///
    /// Only the index criterion is conditional: it requires the locator to
    /// parse as a non-negative integer. Every other criterion accepts any
    /// string, including the empty string, which is a valid literal for
    /// attributes whose value is empty.
    pub fn is_applicable(&self, locator: &str) -> bool {
        match self {
            Criterion::ByIndex => locator.parse::<usize>().is_ok(),
            _ => true,
        }
    }

    /// Evaluate this criterion for one element.
    ///
    /// An absent attribute never matches, even against an empty locator; an
    /// attribute present with an empty value matches the empty locator.
    /// Calling the index criterion with a non-numeric locator is an
    /// evaluation error, not a no-match.
    pub fn matches(
        &self,
        locator: &str,
        element: &ElementSnapshot,
    ) -> Result<bool, LocatorError> {
        let matched = match self {
            Criterion::ById => element.id.as_deref() == Some(locator),
            Criterion::ByClass => element.classes.iter().any(|c| c == locator),
            Criterion::ByDefault => element.default_attribute() == Some(locator),
            Criterion::ByName => element.name.as_deref() == Some(locator),
            Criterion::ByValue => element.value.as_deref() == Some(locator),
            Criterion::ByText => element.text.as_deref() == Some(locator),
            Criterion::ByIndex => {
                let wanted = locator.parse::<usize>().map_err(|e| {
                    LocatorError::Evaluation(format!(
                        "index criterion applied to non-numeric locator '{}': {}",
                        locator, e
                    ))
                })?;
                element.index == wanted
            }
        };
        Ok(matched)
    }
}

/// An ordered, non-empty sequence of criteria; list order is priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionList(Vec<Criterion>);

impl CriterionList {
    /// Build a list, enforcing the invariants: non-empty, and the index
    /// criterion may only appear as the last entry.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, LocatorError> {
        if criteria.is_empty() {
            return Err(LocatorError::InvalidCriteria(
                "criterion list must not be empty".to_string(),
            ));
        }
        let last = criteria.len() - 1;
        if criteria
            .iter()
            .enumerate()
            .any(|(i, c)| *c == Criterion::ByIndex && i != last)
        {
            return Err(LocatorError::InvalidCriteria(
                "index criterion is only valid as the last entry".to_string(),
            ));
        }
        Ok(Self(criteria))
    }

    /// The standard priority order: id, class, default, name, value, text,
    /// then positional index as the final resort.
    pub fn standard() -> Self {
        Self(vec![
            Criterion::ById,
            Criterion::ByClass,
            Criterion::ByDefault,
            Criterion::ByName,
            Criterion::ByValue,
            Criterion::ByText,
            Criterion::ByIndex,
        ])
    }

    /// The same list with the index criterion removed, used by the retry path.
    pub fn without_index(&self) -> Self {
        Self(
            self.0
                .iter()
                .copied()
                .filter(|c| *c != Criterion::ByIndex)
                .collect(),
        )
    }

    /// Iterate criteria in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.0.iter()
    }

    /// Number of criteria in the list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty (only possible via `without_index` on an
    /// index-only list).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CriterionList {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> ElementSnapshot {
        ElementSnapshot {
            index: 2,
            tag: "input".to_string(),
            id: Some("agree".to_string()),
            classes: vec!["consent".to_string(), "required".to_string()],
            name: Some("agree-box".to_string()),
            value: Some("yes".to_string()),
            text: Some("I agree".to_string()),
            alt: None,
            label_for: None,
            checked: Some(false),
        }
    }

    #[test]
    fn test_id_equality() {
        let el = element();
        assert!(Criterion::ById.matches("agree", &el).unwrap());
        assert!(!Criterion::ById.matches("disagree", &el).unwrap());
    }

    #[test]
    fn test_class_membership() {
        let el = element();
        assert!(Criterion::ByClass.matches("required", &el).unwrap());
        assert!(!Criterion::ByClass.matches("optional", &el).unwrap());
    }

    #[test]
    fn test_absent_attribute_never_matches() {
        let mut el = element();
        el.id = None;
        assert!(!Criterion::ById.matches("", &el).unwrap());
        assert!(!Criterion::ById.matches("agree", &el).unwrap());
    }

    #[test]
    fn test_empty_locator_matches_empty_attribute() {
        let mut el = element();
        el.value = Some(String::new());
        assert!(Criterion::ByValue.matches("", &el).unwrap());
    }

    #[test]
    fn test_index_applicability() {
        assert!(Criterion::ByIndex.is_applicable("3"));
        assert!(Criterion::ByIndex.is_applicable("0"));
        assert!(!Criterion::ByIndex.is_applicable("-1"));
        assert!(!Criterion::ByIndex.is_applicable("agree"));
        assert!(!Criterion::ByIndex.is_applicable(""));
        assert!(!Criterion::ByIndex.is_applicable("3.5"));
    }

    #[test]
    fn test_index_match() {
        let el = element();
        assert!(Criterion::ByIndex.matches("2", &el).unwrap());
        assert!(!Criterion::ByIndex.matches("3", &el).unwrap());
    }

    #[test]
    fn test_index_evaluation_error_on_non_numeric() {
        let el = element();
        let err = Criterion::ByIndex.matches("agree", &el).unwrap_err();
        assert!(matches!(err, LocatorError::Evaluation(_)));
    }

    #[test]
    fn test_non_index_criteria_always_applicable() {
        for c in [
            Criterion::ById,
            Criterion::ByClass,
            Criterion::ByDefault,
            Criterion::ByName,
            Criterion::ByValue,
            Criterion::ByText,
        ] {
            assert!(c.is_applicable(""));
            assert!(c.is_applicable("anything"));
        }
    }

    #[test]
    fn test_list_rejects_empty() {
        assert!(CriterionList::new(vec![]).is_err());
    }

    #[test]
    fn test_list_rejects_index_not_last() {
        let result = CriterionList::new(vec![Criterion::ByIndex, Criterion::ById]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_accepts_index_last() {
        let result = CriterionList::new(vec![Criterion::ById, Criterion::ByIndex]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_standard_order() {
        let list = CriterionList::standard();
        let order: Vec<&str> = list.iter().map(|c| c.name()).collect();
        assert_eq!(
            order,
            vec!["id", "class", "default", "name", "value", "text", "index"]
        );
    }

    #[test]
    fn test_without_index() {
        let list = CriterionList::standard().without_index();
        assert_eq!(list.len(), 6);
        assert!(!list.iter().any(|c| *c == Criterion::ByIndex));
    }
}
