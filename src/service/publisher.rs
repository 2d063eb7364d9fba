use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use super::automobile_service::AutomobileService;
use crate::constants::{API_NAME, DEFAULT_AUTO_TOPIC, DEFAULT_UPDATE_AUTO_TOPIC};
use crate::messaging::TopicTransport;
use crate::models::Automobile;

/// Every persistence or delivery error surfaces as this single outcome.
#[derive(Debug, Error)]
#[error("Message publication failed")]
pub struct PublishFailure;

#[derive(Debug, Clone)]
pub struct Topics {
    pub create: String,
    pub update: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            create: DEFAULT_AUTO_TOPIC.to_string(),
            update: DEFAULT_UPDATE_AUTO_TOPIC.to_string(),
        }
    }
}

/// Persist-then-publish. The store write and the topic send are not atomic:
/// a send failure after a successful write leaves the row written.
#[derive(Clone)]
pub struct MessagePublisher {
    service: AutomobileService,
    transport: Arc<dyn TopicTransport>,
    topics: Topics,
}

impl MessagePublisher {
    pub fn new(service: AutomobileService, transport: Arc<dyn TopicTransport>, topics: Topics) -> Self {
        Self {
            service,
            transport,
            topics,
        }
    }

    /// Saves the record and announces it on the create topic.
    pub async fn push_message(&self, automobile: Automobile) -> Result<Automobile, PublishFailure> {
        let result = async {
            let saved = self
                .service
                .store()
                .save(automobile)
                .await
                .context("Failed to save automobile")?;
            self.send(&self.topics.create, &saved).await?;
            Ok::<Automobile, anyhow::Error>(saved)
        }
        .await;

        result.map_err(|e| {
            tracing::error!("{} Failed to push automobile message: {:#}", API_NAME, e);
            PublishFailure
        })
    }

    /// Refreshes the record through the service and announces it on the update topic.
    pub async fn update_auto_message(
        &self,
        automobile: Automobile,
    ) -> Result<Automobile, PublishFailure> {
        let result = async {
            let id = automobile
                .id
                .context("Automobile id is required for an update message")?;
            let saved = self
                .service
                .refresh_automobile(id, &automobile)
                .await
                .context("Failed to refresh automobile")?;
            self.send(&self.topics.update, &saved).await?;
            Ok::<Automobile, anyhow::Error>(saved)
        }
        .await;

        result.map_err(|e| {
            tracing::error!("{} Failed to push automobile update message: {:#}", API_NAME, e);
            PublishFailure
        })
    }

    async fn send(&self, topic: &str, automobile: &Automobile) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(automobile).context("Failed to serialize automobile")?;
        tracing::info!("{} Sending Automobile with id: {:?} to {}", API_NAME, automobile.id, topic);
        self.transport
            .send(topic, payload)
            .await
            .with_context(|| format!("Failed to send to topic {}", topic))?;
        Ok(())
    }
}
