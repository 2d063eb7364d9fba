use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Topic transport unavailable: {0}")]
    Unavailable(String),
}

/// Publish side of a topic broker. Delivery is at-most-once and fire-and-forget.
#[async_trait]
pub trait TopicTransport: Send + Sync {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError>;
}
