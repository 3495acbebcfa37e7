//! Interests and the matching predicate

use serde::{Deserialize, Serialize};
use shared_types::{ContentDigest, ContentObject, Name, NameComponent, PublisherId};
use std::cmp::Ordering;

use super::exclude::ExcludeFilter;

/// Preference among several matching children
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildSelector {
    /// Prefer the smallest next component.
    #[default]
    Left,
    /// Prefer the largest next component.
    Right,
}

/// Constraint on who published the content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublisherConstraint {
    /// Content must be signed by this publisher.
    Publisher(PublisherId),
    /// Content must have exactly this digest.
    ContentDigest(ContentDigest),
}

/// Where an answer may come from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerOriginKind {
    /// Answer from a content store.
    pub content_store: bool,
    /// The responder may generate new content.
    pub generate: bool,
    /// Stale content is acceptable.
    pub stale: bool,
    /// Mark the answering content stale.
    pub expire: bool,
}

impl AnswerOriginKind {
    /// Content store and generation, no stale content.
    pub const DEFAULT: Self = Self {
        content_store: true,
        generate: true,
        stale: false,
        expire: false,
    };

    /// Content already stored, stale or not.
    pub const STORED_INCLUDING_STALE: Self = Self {
        content_store: true,
        generate: false,
        stale: true,
        expire: false,
    };
}

impl Default for AnswerOriginKind {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Query for named content
///
/// Built with `Interest::new` and the `with_*` methods, then used read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    name: Name,
    min_suffix_components: Option<usize>,
    max_suffix_components: Option<usize>,
    child_selector: ChildSelector,
    publisher: Option<PublisherConstraint>,
    exclude: Option<ExcludeFilter>,
    scope: Option<u8>,
    answer_origin: AnswerOriginKind,
}

impl Interest {
    /// Interest in everything under `name`
    pub fn new(name: Name) -> Self {
        Self {
            name,
            min_suffix_components: None,
            max_suffix_components: None,
            child_selector: ChildSelector::default(),
            publisher: None,
            exclude: None,
            scope: None,
            answer_origin: AnswerOriginKind::default(),
        }
    }

    /// Interest answerable only from local storage
    ///
    /// Scope 0 keeps the query on this node; with `allow_stale` stale
    /// content is returned too.
    pub fn local_scope(name: Name, allow_stale: bool) -> Self {
        let answer_origin = if allow_stale {
            AnswerOriginKind::STORED_INCLUDING_STALE
        } else {
            AnswerOriginKind {
                generate: false,
                ..AnswerOriginKind::DEFAULT
            }
        };
        Self::new(name).with_scope(0).with_answer_origin(answer_origin)
    }

    pub fn with_min_suffix_components(mut self, min: usize) -> Self {
        self.min_suffix_components = Some(min);
        self
    }

    pub fn with_max_suffix_components(mut self, max: usize) -> Self {
        self.max_suffix_components = Some(max);
        self
    }

    pub fn with_child_selector(mut self, selector: ChildSelector) -> Self {
        self.child_selector = selector;
        self
    }

    pub fn with_publisher(mut self, constraint: PublisherConstraint) -> Self {
        self.publisher = Some(constraint);
        self
    }

    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_scope(mut self, scope: u8) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_answer_origin(mut self, answer_origin: AnswerOriginKind) -> Self {
        self.answer_origin = answer_origin;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn min_suffix_components(&self) -> Option<usize> {
        self.min_suffix_components
    }

    pub fn max_suffix_components(&self) -> Option<usize> {
        self.max_suffix_components
    }

    pub fn child_selector(&self) -> ChildSelector {
        self.child_selector
    }

    pub fn publisher(&self) -> Option<&PublisherConstraint> {
        self.publisher.as_ref()
    }

    pub fn exclude(&self) -> Option<&ExcludeFilter> {
        self.exclude.as_ref()
    }

    pub fn scope(&self) -> Option<u8> {
        self.scope
    }

    pub fn answer_origin(&self) -> AnswerOriginKind {
        self.answer_origin
    }

    /// True if `candidate_name` (and `candidate_object`, if given) satisfies
    /// this Interest
    ///
    /// When an object is supplied its digest is appended to the candidate
    /// name and counts toward the suffix length. Without an object any
    /// publisher constraint fails.
    pub fn matches(&self, candidate_name: &Name, candidate_object: Option<&ContentObject>) -> bool {
        let full_name;
        let candidate = match candidate_object {
            Some(object) => {
                full_name = candidate_name.append(object.digest_component());
                &full_name
            }
            None => candidate_name,
        };

        // Prefix
        if !self.name.is_prefix_of(candidate) {
            return false;
        }

        // Suffix length
        let k = candidate.len() - self.name.len();
        if let (Some(min), Some(max)) = (self.min_suffix_components, self.max_suffix_components) {
            if min > max {
                return false;
            }
        }
        if self.min_suffix_components.is_some_and(|min| k < min) {
            return false;
        }
        if self.max_suffix_components.is_some_and(|max| k > max) {
            return false;
        }

        // Exclusion of the next component
        if let Some(exclude) = &self.exclude {
            if let Some(next) = candidate.component(self.name.len()) {
                if exclude.matches(next) {
                    return false;
                }
            }
        }

        // Publisher
        match (&self.publisher, candidate_object) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(PublisherConstraint::Publisher(id)), Some(object)) => {
                id.identifies(object.publisher())
            }
            (Some(PublisherConstraint::ContentDigest(digest)), Some(object)) => {
                *digest == object.digest()
            }
        }
    }

    /// `matches` against an object's own name
    pub fn matches_object(&self, object: &ContentObject) -> bool {
        self.matches(object.name(), Some(object))
    }

    /// Pick the preferred matching candidate
    ///
    /// Among matching objects the one with the smallest (`Left`) or largest
    /// (`Right`) next component after the prefix wins; ties fall back to the
    /// full name in the same direction.
    pub fn select_best<'a, I>(&self, candidates: I) -> Option<&'a ContentObject>
    where
        I: IntoIterator<Item = &'a ContentObject>,
    {
        let mut best: Option<(Name, &'a ContentObject)> = None;
        for object in candidates {
            if !self.matches_object(object) {
                continue;
            }
            let full = object.full_name();
            let better = match &best {
                None => true,
                Some((best_name, _)) => {
                    let ordering = self.compare_children(&full, best_name);
                    match self.child_selector {
                        ChildSelector::Left => ordering == Ordering::Less,
                        ChildSelector::Right => ordering == Ordering::Greater,
                    }
                }
            };
            if better {
                best = Some((full, object));
            }
        }
        best.map(|(_, object)| object)
    }

    fn compare_children(&self, a: &Name, b: &Name) -> Ordering {
        let next = |n: &Name| n.component(self.name.len()).cloned().unwrap_or_else(NameComponent::default);
        next(a).cmp(&next(b)).then_with(|| a.cmp(b))
    }
}
