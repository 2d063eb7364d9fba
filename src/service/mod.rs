pub mod automobile_service;
pub mod color_policy;
pub mod publisher;

pub use automobile_service::{AutomobileService, ServiceError};
pub use color_policy::{ColorPolicy, ColorRejection, LogColorChange};
pub use publisher::{MessagePublisher, PublishFailure, Topics};
