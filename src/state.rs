//! Shared state handed to every handler.

use std::sync::Arc;

use crate::messaging::TopicTransport;
use crate::repository::SharedStore;
use crate::service::{AutomobileService, MessagePublisher, Topics};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub service: AutomobileService,
    pub publisher: MessagePublisher,
}

impl AppState {
    pub fn new(store: SharedStore, transport: Arc<dyn TopicTransport>, topics: Topics) -> Self {
        Self::with_service(AutomobileService::new(store), transport, topics)
    }

    /// Builds state around a preconfigured service, e.g. one with a custom color policy.
    pub fn with_service(
        service: AutomobileService,
        transport: Arc<dyn TopicTransport>,
        topics: Topics,
    ) -> Self {
        Self {
            store: service.store().clone(),
            publisher: MessagePublisher::new(service.clone(), transport, topics),
            service,
        }
    }
}
