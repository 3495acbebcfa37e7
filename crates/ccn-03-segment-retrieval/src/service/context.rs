//! Collaborators shared by every session of a registry.

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::RetrievalError;
use crate::ports::outbound::{ContentHandler, InterestTransport, SegmentNaming};

use super::dispatcher::ContentDispatcher;

/// Transport, naming profile, handler pool and configuration.
///
/// Passed explicitly to sessions instead of living in process globals.
pub struct RetrievalContext<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    pub transport: Arc<T>,
    pub naming: Arc<S>,
    pub dispatcher: Arc<ContentDispatcher>,
    pub config: RetrievalConfig,
}

impl<T, S> RetrievalContext<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    /// Validate `config` and start a handler pool on the current runtime.
    pub fn new(
        transport: Arc<T>,
        naming: Arc<S>,
        handler: Arc<dyn ContentHandler>,
        config: RetrievalConfig,
    ) -> Result<Self, RetrievalError> {
        config.validate()?;
        let dispatcher = ContentDispatcher::new(handler, config.handler_workers)?;
        Ok(Self {
            transport,
            naming,
            dispatcher: Arc::new(dispatcher),
            config,
        })
    }
}

impl<T, S> Clone for RetrievalContext<T, S>
where
    T: InterestTransport,
    S: SegmentNaming,
{
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            naming: Arc::clone(&self.naming),
            dispatcher: Arc::clone(&self.dispatcher),
            config: self.config.clone(),
        }
    }
}
