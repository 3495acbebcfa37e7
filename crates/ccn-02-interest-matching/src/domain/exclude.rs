//! Exclusion filters
//!
//! An `ExcludeFilter` lists name components that must not appear as the
//! component following an Interest's prefix. Explicit components are listed
//! in strictly increasing canonical order; a Bloom element stands for the
//! members of the open interval between its neighbouring explicit
//! components (or an open end of the ordering).
//!
//! ```text
//! [ aaa, Bloom{one..thirteen}, zzzzzzzz ]
//!         \_______ covers (aaa, zzzzzzzz) ______/
//! ```

use ccn_01_bloom_filters::BloomFilter;
use serde::{Deserialize, Serialize};
use shared_types::NameComponent;

use crate::error::ExcludeError;

/// One element of an exclusion filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcludeElement {
    /// A single explicitly excluded component.
    Component(NameComponent),
    /// Probabilistic exclusion of the interval between the neighbours.
    Bloom(BloomFilter),
}

impl From<NameComponent> for ExcludeElement {
    fn from(component: NameComponent) -> Self {
        Self::Component(component)
    }
}

impl From<BloomFilter> for ExcludeElement {
    fn from(filter: BloomFilter) -> Self {
        Self::Bloom(filter)
    }
}

/// Validated, immutable exclusion filter
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExcludeElement>", into = "Vec<ExcludeElement>")]
pub struct ExcludeFilter {
    elements: Vec<ExcludeElement>,
}

impl ExcludeFilter {
    /// Build a filter, checking element order
    pub fn new(elements: Vec<ExcludeElement>) -> Result<Self, ExcludeError> {
        validate(&elements)?;
        Ok(Self { elements })
    }

    /// Build a filter of explicit components in any order
    ///
    /// Components are sorted and deduplicated, so this cannot fail.
    pub fn from_components<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<NameComponent>,
    {
        let mut components: Vec<NameComponent> = components.into_iter().map(Into::into).collect();
        components.sort();
        components.dedup();
        Self {
            elements: components.into_iter().map(ExcludeElement::Component).collect(),
        }
    }

    /// True if `component` is excluded
    ///
    /// Explicit components match on equality. A Bloom element only answers
    /// for components strictly inside its interval.
    pub fn matches(&self, component: &NameComponent) -> bool {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                ExcludeElement::Component(excluded) => {
                    if excluded == component {
                        return true;
                    }
                }
                ExcludeElement::Bloom(filter) => {
                    if self.in_interval(i, component) && filter.test(component.as_bytes()) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// True if `component` lies strictly between the neighbours of element `i`.
    fn in_interval(&self, i: usize, component: &NameComponent) -> bool {
        let above_lower = match i.checked_sub(1).and_then(|j| self.elements.get(j)) {
            Some(ExcludeElement::Component(lower)) => component > lower,
            _ => true,
        };
        let below_upper = match self.elements.get(i + 1) {
            Some(ExcludeElement::Component(upper)) => component < upper,
            _ => true,
        };
        above_lower && below_upper
    }

    /// A new filter with `other`'s elements after this one's
    pub fn compose(&self, other: &ExcludeFilter) -> Result<Self, ExcludeError> {
        self.add(other.elements.iter().cloned())
    }

    /// A new filter with `elements` appended
    pub fn add<I>(&self, elements: I) -> Result<Self, ExcludeError>
    where
        I: IntoIterator<Item = ExcludeElement>,
    {
        let mut combined = self.elements.clone();
        combined.extend(elements);
        Self::new(combined)
    }

    pub fn elements(&self) -> &[ExcludeElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl TryFrom<Vec<ExcludeElement>> for ExcludeFilter {
    type Error = ExcludeError;

    fn try_from(elements: Vec<ExcludeElement>) -> Result<Self, Self::Error> {
        Self::new(elements)
    }
}

impl From<ExcludeFilter> for Vec<ExcludeElement> {
    fn from(filter: ExcludeFilter) -> Self {
        filter.elements
    }
}

fn validate(elements: &[ExcludeElement]) -> Result<(), ExcludeError> {
    let mut last_component: Option<&NameComponent> = None;
    let mut previous_was_bloom = false;

    for (index, element) in elements.iter().enumerate() {
        match element {
            ExcludeElement::Component(component) => {
                if last_component.is_some_and(|last| component <= last) {
                    return Err(ExcludeError::InvalidOrdering { index });
                }
                last_component = Some(component);
                previous_was_bloom = false;
            }
            ExcludeElement::Bloom(_) => {
                if previous_was_bloom {
                    return Err(ExcludeError::AdjacentBloom { index });
                }
                previous_was_bloom = true;
            }
        }
    }
    Ok(())
}
