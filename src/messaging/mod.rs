pub mod broadcast;
pub mod redis_transport;
pub mod transport;

pub use broadcast::BroadcastTransport;
pub use redis_transport::RedisTransport;
pub use transport::{TopicTransport, TransportError};
