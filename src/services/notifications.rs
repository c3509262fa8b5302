use crate::models::donation::DonationTask;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client as SnsClient;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

/// Sentinel ARN SNS reports for email subscriptions the donor has not
/// confirmed yet.
const PENDING_CONFIRMATION: &str = "PendingConfirmation";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("SNS request failed: {0}")]
    Sns(String),
    #[error("invalid message attribute: {0}")]
    Attribute(String),
    #[error("publish payload could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionState {
    Active(String),
    Pending,
}

/// Topic client: task hand-off, donor subscriptions and receipt publishing.
#[derive(Clone)]
pub struct NotificationClient {
    client: SnsClient,
    topic_arn: String,
}

impl NotificationClient {
    pub fn new(client: SnsClient, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }

    fn string_attribute(value: &str) -> Result<MessageAttributeValue, NotifyError> {
        MessageAttributeValue::builder()
            .data_type("String")
            .string_value(value)
            .build()
            .map_err(|e| NotifyError::Attribute(e.to_string()))
    }

    async fn publish(
        &self,
        message: &str,
        subject: &str,
        attributes: &[(&str, &str)],
    ) -> Result<String, NotifyError> {
        let mut request = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(message)
            .subject(subject);

        for (name, value) in attributes {
            request = request.message_attributes((*name).to_string(), Self::string_attribute(value)?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Sns(e.to_string()))?;

        let message_id = response.message_id().unwrap_or_default().to_string();
        debug!("Published message to topic: {}", message_id);

        Ok(message_id)
    }

    /// Hands a donation task off to the worker. The attributes route the
    /// message to the worker queue subscription only.
    pub async fn publish_task(&self, task: &DonationTask) -> Result<String, NotifyError> {
        let body = serde_json::to_string(task)?;

        self.publish(
            &body,
            "Donation Processing Task",
            &[("messageType", "ProcessingTask"), ("target", "worker")],
        )
        .await
    }

    /// Publishes a receipt filtered to the donor's own subscription.
    pub async fn publish_receipt(&self, email: &str, body: &str) -> Result<String, NotifyError> {
        self.publish(body, "Thank you for your donation!", &[("target", email)])
            .await
    }

    /// Broadcast to every confirmed subscriber.
    pub async fn broadcast(&self, message: &str) -> Result<String, NotifyError> {
        self.publish(message, "Important Donations Update", &[("target", "all")])
            .await
    }

    pub async fn subscription_for(
        &self,
        email: &str,
    ) -> Result<Option<SubscriptionState>, NotifyError> {
        let response = self
            .client
            .list_subscriptions_by_topic()
            .topic_arn(&self.topic_arn)
            .send()
            .await
            .map_err(|e| NotifyError::Sns(e.to_string()))?;

        let state = response
            .subscriptions()
            .iter()
            .find(|s| s.endpoint() == Some(email))
            .map(|s| match s.subscription_arn() {
                Some(PENDING_CONFIRMATION) | None => SubscriptionState::Pending,
                Some(arn) => SubscriptionState::Active(arn.to_string()),
            });

        Ok(state)
    }

    /// Subscribes the address with a filter policy so the donor receives
    /// their own receipts plus anything broadcast to "all".
    pub async fn subscribe(&self, email: &str) -> Result<String, NotifyError> {
        let filter_policy = json!({ "target": [email, "all"] }).to_string();

        let response = self
            .client
            .subscribe()
            .topic_arn(&self.topic_arn)
            .protocol("email")
            .endpoint(email)
            .attributes("FilterPolicy", filter_policy)
            .return_subscription_arn(true)
            .send()
            .await
            .map_err(|e| NotifyError::Sns(e.to_string()))?;

        let arn = response.subscription_arn().unwrap_or_default().to_string();
        info!("Subscribed {} to topic: {}", email, arn);

        Ok(arn)
    }

    pub async fn unsubscribe(&self, subscription_arn: &str) -> Result<(), NotifyError> {
        self.client
            .unsubscribe()
            .subscription_arn(subscription_arn)
            .send()
            .await
            .map_err(|e| NotifyError::Sns(e.to_string()))?;

        info!("Cancelled subscription: {}", subscription_arn);
        Ok(())
    }
}
