//! # Inbound Ports
//!
//! Entry points the transport drives when content arrives.

use ccn_02_interest_matching::Interest;
use shared_types::ContentObject;

/// Arrival callback - inbound port.
///
/// Invoked by the transport with every batch of content satisfying an
/// Interest this listener expressed. May be called concurrently, and the
/// same object may be delivered more than once.
pub trait ContentListener: Send + Sync {
    fn on_arrival(&self, objects: Vec<ContentObject>, for_interest: &Interest);
}
