use crate::config::Settings;
use crate::models::envelope::NotificationEnvelope;
use crate::services::queue::{QueueClient, QueueMessage};
use crate::worker::console::{ConsoleStream, EventKind};
use crate::worker::executor::FulfillmentExecutor;
use crate::worker::retry::retry_with_backoff;
use crate::worker::stats::ProcessingStats;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Long-poll loop over the worker queue. Each batch is fanned out onto
/// spawned tasks and awaited together before the next poll, so concurrency
/// is bounded by the batch size.
///
/// Retry policy is unified in-process: every message is deleted once its
/// fulfillment reaches a terminal outcome (success, exhausted retries, or a
/// malformed payload). Queue redelivery via the visibility timeout only
/// covers process crashes, so side effects stay duplicate-tolerant.
pub struct QueuePoller {
    queue: QueueClient,
    executor: Arc<FulfillmentExecutor>,
    stats: Arc<ProcessingStats>,
    console: ConsoleStream,
    max_messages: i32,
    wait_time_seconds: i32,
    max_attempts: u32,
    empty_poll_delay: Duration,
    poll_error_delay: Duration,
}

impl QueuePoller {
    pub fn new(
        queue: QueueClient,
        executor: Arc<FulfillmentExecutor>,
        stats: Arc<ProcessingStats>,
        console: ConsoleStream,
        settings: &Settings,
    ) -> Self {
        Self {
            queue,
            executor,
            stats,
            console,
            max_messages: settings.worker_max_messages,
            wait_time_seconds: settings.worker_wait_time_seconds,
            max_attempts: settings.worker_max_attempts,
            empty_poll_delay: Duration::from_millis(settings.worker_empty_poll_delay_ms),
            poll_error_delay: Duration::from_millis(settings.worker_poll_error_delay_ms),
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        self.console
            .emit(EventKind::Info, "Donation processor worker online");
        self.console.emit(EventKind::Info, "Waiting for messages...");

        loop {
            // Cancellation is coarse-grained: checked once per iteration,
            // never mid-task.
            if shutdown.is_cancelled() {
                break;
            }

            let received = tokio::select! {
                _ = shutdown.cancelled() => break,
                received = self.queue.receive(self.max_messages, self.wait_time_seconds) => received,
            };

            match received {
                Ok(messages) if messages.is_empty() => {
                    self.console.emit(EventKind::Waiting, ".");
                    tokio::time::sleep(self.empty_poll_delay).await;
                }
                Ok(messages) => {
                    self.console.emit(
                        EventKind::Info,
                        format!("Received {} messages from queue", messages.len()),
                    );

                    let mut handles = Vec::with_capacity(messages.len());
                    for message in messages {
                        let queue = self.queue.clone();
                        let executor = self.executor.clone();
                        let stats = self.stats.clone();
                        let console = self.console.clone();
                        let max_attempts = self.max_attempts;

                        handles.push(tokio::spawn(async move {
                            handle_message(queue, executor, stats, console, max_attempts, message)
                                .await;
                        }));
                    }

                    for handle in handles {
                        if let Err(e) = handle.await {
                            error!("Fulfillment task panicked: {}", e);
                            self.stats.record_failure();
                        }
                    }

                    let snapshot = self.stats.snapshot();
                    self.console.emit(
                        EventKind::Stats,
                        format!(
                            "Processed: {} | Failed: {} | Total: {}",
                            snapshot.processed, snapshot.failed, snapshot.total
                        ),
                    );
                }
                Err(e) => {
                    self.console
                        .emit(EventKind::Error, format!("Queue poll failed: {}", e));
                    tokio::time::sleep(self.poll_error_delay).await;
                }
            }
        }

        self.console
            .emit(EventKind::Warning, "Worker stopped by cancellation");
    }
}

async fn handle_message(
    queue: QueueClient,
    executor: Arc<FulfillmentExecutor>,
    stats: Arc<ProcessingStats>,
    console: ConsoleStream,
    max_attempts: u32,
    message: QueueMessage,
) {
    let task = match NotificationEnvelope::parse(&message.body).and_then(|e| e.task()) {
        Ok(task) => task,
        Err(e) => {
            // Malformed payloads are dropped without retry.
            warn!("Discarding invalid message {}: {}", message.id, e);
            console.emit(
                EventKind::Warning,
                format!("Invalid message {}: {}", message.id, e),
            );
            stats.record_failure();
            acknowledge(&queue, &message).await;
            return;
        }
    };

    console.emit(
        EventKind::Processing,
        format!(
            "Processing donation: {} | {} products | total ${} | company {}",
            task.email,
            task.amount,
            task.total(),
            task.company.name
        ),
    );

    let outcome = retry_with_backoff(
        "donation fulfillment",
        max_attempts,
        Duration::from_secs(1),
        || executor.fulfill(&task),
    )
    .await;

    match outcome {
        Ok(result) => {
            stats.record_success();
            console.emit(
                EventKind::Success,
                format!(
                    "Donation completed for {} (${})",
                    result.email, result.total_amount
                ),
            );
        }
        Err(e) => {
            stats.record_failure();
            console.emit(
                EventKind::Error,
                format!("Donation failed for {}: {}", task.email, e),
            );
        }
    }

    // Terminal outcome either way: acknowledge so the queue does not act as
    // a second retry layer.
    acknowledge(&queue, &message).await;
}

async fn acknowledge(queue: &QueueClient, message: &QueueMessage) {
    if let Err(e) = queue.delete(&message.receipt_handle).await {
        error!(
            "Failed to delete message {}: {}. It will reappear after the visibility timeout.",
            message.id, e
        );
    }
}
