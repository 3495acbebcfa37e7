//! # Retrieval Window
//!
//! Pure bookkeeping for the sliding window of segment requests.
//!
//! ## Refill rule
//!
//! ```text
//! first = max(highest outstanding-or-retry segment + 1, current_block)
//! slots = window_size - |outstanding|
//! plan  = retries (ascending) ++ fresh segments first, first+1, ...
//! ```
//!
//! `current_block` is a floor that only moves forward. A segment below it
//! that was never requested is not requested later: gaps left by
//! out-of-order arrival are not backfilled.

use ccn_02_interest_matching::Interest;
use shared_types::Name;
use std::collections::BTreeMap;

use super::value_objects::{QueryHandle, SegmentKey};

/// An expressed segment Interest awaiting content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutstandingRequest {
    pub interest: Interest,
    pub handle: QueryHandle,
}

/// One segment Interest the window wants issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedRequest {
    pub segment: u64,
    pub name: Name,
    /// Re-attempt of an issuance that failed earlier.
    pub is_retry: bool,
}

/// Sliding window state of one retrieval session.
#[derive(Clone, Debug)]
pub struct RetrievalWindow {
    window_size: usize,
    current_block: u64,
    outstanding: BTreeMap<SegmentKey, OutstandingRequest>,
    retry: BTreeMap<u64, Name>,
}

impl RetrievalWindow {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            current_block: 0,
            outstanding: BTreeMap::new(),
            retry: BTreeMap::new(),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Next segment number not yet requested.
    pub fn current_block(&self) -> u64 {
        self.current_block
    }

    /// Record the arrival of `segment` under `name`.
    ///
    /// Advances the floor and retires the matching request, if any. A
    /// duplicate arrival is a no-op apart from returning `None`.
    pub fn retire(&mut self, segment: u64, name: &Name) -> Option<OutstandingRequest> {
        if segment >= self.current_block {
            self.current_block = segment.saturating_add(1);
        }
        self.retry.remove(&segment);
        self.outstanding.remove(&SegmentKey::new(segment, name.clone()))
    }

    /// First fresh segment number the next refill would request.
    pub fn first_to_request(&self) -> u64 {
        let highest_outstanding = self.outstanding.keys().next_back().map(|k| k.segment);
        let highest_retry = self.retry.keys().next_back().copied();
        match highest_outstanding.max(highest_retry) {
            Some(highest) => highest.saturating_add(1).max(self.current_block),
            None => self.current_block,
        }
    }

    /// Requests that fit before the window is full.
    pub fn free_slots(&self) -> usize {
        self.window_size.saturating_sub(self.outstanding.len())
    }

    /// Requests needed to fill the window.
    ///
    /// `segment_name` builds the name of a fresh segment.
    pub fn plan_refill<F>(&self, segment_name: F) -> Vec<PlannedRequest>
    where
        F: Fn(u64) -> Name,
    {
        let slots = self.free_slots();
        let mut plan: Vec<PlannedRequest> = self
            .retry
            .iter()
            .take(slots)
            .map(|(&segment, name)| PlannedRequest {
                segment,
                name: name.clone(),
                is_retry: true,
            })
            .collect();

        let first = self.first_to_request();
        let fresh = (slots - plan.len()) as u64;
        plan.extend((0..fresh).map(|i| {
            let segment = first + i;
            PlannedRequest {
                segment,
                name: segment_name(segment),
                is_retry: false,
            }
        }));
        plan
    }

    /// Register a successfully expressed request.
    pub fn record_issued(&mut self, segment: u64, name: Name, request: OutstandingRequest) {
        self.retry.remove(&segment);
        self.outstanding.insert(SegmentKey::new(segment, name), request);
    }

    /// Remember a request the transport refused, for the next refill.
    pub fn record_failed(&mut self, segment: u64, name: Name) {
        self.retry.insert(segment, name);
    }

    /// Outstanding segment numbers, ascending.
    pub fn outstanding_segments(&self) -> Vec<u64> {
        self.outstanding.keys().map(|k| k.segment).collect()
    }

    pub fn outstanding_len(&self) -> usize {
        self.outstanding.len()
    }

    /// Segments waiting to be re-attempted, ascending.
    pub fn retry_segments(&self) -> Vec<u64> {
        self.retry.keys().copied().collect()
    }

    /// True if any request at or below `segment` is still unanswered.
    pub fn has_pending_through(&self, segment: u64) -> bool {
        self.outstanding.keys().next().is_some_and(|k| k.segment <= segment)
            || self.retry.range(..=segment).next().is_some()
    }

    /// Remove every request, returning the outstanding ones.
    pub fn drain(&mut self) -> Vec<(SegmentKey, OutstandingRequest)> {
        self.retry.clear();
        std::mem::take(&mut self.outstanding).into_iter().collect()
    }
}
