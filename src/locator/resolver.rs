//! Locator resolution
//!
//! Turns a caller-supplied locator string into exactly one element from a
//! page snapshot. Criteria are evaluated as one prioritized any-of query:
//! the earliest-priority criterion with at least one match wins, and within
//! a criterion the first match in document order wins. A criterion that is
//! inapplicable to the locator is skipped, not failed. If the combined query
//! including the index criterion errors, the identical query is retried once
//! with the index criterion excluded; that retry is the only fallback.

use crate::error::LocatorError;
use crate::locator::criteria::CriterionList;
use crate::locator::snapshot::ElementSnapshot;
use tracing::{debug, warn};

/// Resolves locator strings against element snapshots.
///
/// Resolution is a pure function of (locator, snapshot): no side effects, no
/// caching, no staleness tracking. The snapshot is assumed stable for the
/// duration of a single call.
#[derive(Debug, Clone)]
pub struct LocatorResolver {
    criteria: CriterionList,
}

impl LocatorResolver {
    /// Create a resolver with a custom criterion list.
    pub fn new(criteria: CriterionList) -> Self {
        Self { criteria }
    }

    /// The criterion list this resolver evaluates, in priority order.
    pub fn criteria(&self) -> &CriterionList {
        &self.criteria
    }

    /// Resolve `locator` to exactly one element.
    ///
    /// Returns the element matched by the earliest-priority applicable
    /// criterion; among several matches for that criterion, the first in
    /// document order. Zero matches across all applicable criteria is
    /// [`LocatorError::NotFound`].
    pub fn resolve<'a>(
        &self,
        locator: &str,
        elements: &'a [ElementSnapshot],
    ) -> Result<&'a ElementSnapshot, LocatorError> {
        match self.run_query(&self.criteria, locator, elements) {
            Err(LocatorError::Evaluation(reason)) => {
                warn!(%locator, %reason, "combined query failed, retrying without index criterion");
                self.run_query(&self.criteria.without_index(), locator, elements)
            }
            other => other,
        }
    }

    /// One pass of the prioritized any-of query.
    fn run_query<'a>(
        &self,
        criteria: &CriterionList,
        locator: &str,
        elements: &'a [ElementSnapshot],
    ) -> Result<&'a ElementSnapshot, LocatorError> {
        for criterion in criteria.iter() {
            if !criterion.is_applicable(locator) {
                debug!(criterion = criterion.name(), %locator, "criterion not applicable, skipped");
                continue;
            }
            for element in elements {
                if criterion.matches(locator, element)? {
                    debug!(
                        criterion = criterion.name(),
                        index = element.index,
                        tag = %element.tag,
                        "locator resolved"
                    );
                    return Ok(element);
                }
            }
        }
        Err(LocatorError::NotFound {
            locator: locator.to_string(),
        })
    }
}

impl Default for LocatorResolver {
    fn default() -> Self {
        Self::new(CriterionList::standard())
    }
}
