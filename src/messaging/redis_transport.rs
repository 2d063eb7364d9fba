use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;

use super::transport::{TopicTransport, TransportError};
use crate::constants::API_NAME;

/// Redis pub/sub topics. The connection is opened on first send and then reused.
pub struct RedisTransport {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
}

impl RedisTransport {
    /// # Arguments
    /// * `url` - The redis URL (e.g., "redis://127.0.0.1/").
    pub fn new(url: &str) -> Result<Self, TransportError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, TransportError> {
        let connection = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await?;
        Ok(connection.clone())
    }
}

#[async_trait]
impl TopicTransport for RedisTransport {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let mut connection = self.connection().await?;
        let receivers: i64 = connection.publish(topic, payload).await?;
        tracing::debug!("{} Published to {} redis subscribers of {}", API_NAME, receivers, topic);
        Ok(())
    }
}
