use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::transport::{TopicTransport, TransportError};
use crate::constants::API_NAME;

const DEFAULT_CAPACITY: usize = 64;

/// In-process topics backed by tokio broadcast channels.
pub struct BroadcastTransport {
    capacity: usize,
    topics: Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>,
}

impl BroadcastTransport {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Receives every message sent to `topic` after this call.
    pub fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<Vec<u8>>, TransportError> {
        Ok(self.sender(topic)?.subscribe())
    }

    fn sender(&self, topic: &str) -> Result<broadcast::Sender<Vec<u8>>, TransportError> {
        let mut topics = self
            .topics
            .lock()
            .map_err(|_| TransportError::Unavailable("topic registry poisoned".to_string()))?;
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Ok(sender.clone())
    }
}

impl Default for BroadcastTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopicTransport for BroadcastTransport {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let sender = self.sender(topic)?;
        // A topic without subscribers drops the message, same as a broker would
        match sender.send(payload) {
            Ok(receivers) => {
                tracing::debug!("{} Delivered to {} subscribers of {}", API_NAME, receivers, topic);
            }
            Err(_) => {
                tracing::debug!("{} No subscribers on {}", API_NAME, topic);
            }
        }
        Ok(())
    }
}
