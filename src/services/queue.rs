use aws_sdk_sqs::Client as SqsClient;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("SQS request failed: {0}")]
    Sqs(String),
}

/// A received queue message with the handle needed to acknowledge it.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub id: String,
    pub receipt_handle: String,
    pub body: String,
}

#[derive(Clone)]
pub struct QueueClient {
    client: SqsClient,
    queue_url: String,
}

impl QueueClient {
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }

    /// Long-polls the queue for up to `wait_seconds` and at most
    /// `max_messages` messages.
    pub async fn receive(
        &self,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let response = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Sqs(e.to_string()))?;

        let messages = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| {
                let id = message.message_id().unwrap_or_default().to_string();
                match (message.receipt_handle(), message.body()) {
                    (Some(handle), Some(body)) => Some(QueueMessage {
                        id,
                        receipt_handle: handle.to_string(),
                        body: body.to_string(),
                    }),
                    _ => {
                        warn!("Skipping message {} without handle or body", id);
                        None
                    }
                }
            })
            .collect();

        Ok(messages)
    }

    /// Acknowledges a message so the queue stops redelivering it.
    pub async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Sqs(e.to_string()))?;

        Ok(())
    }
}
