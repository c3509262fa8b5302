use crate::models::donation::{DonationTask, FulfillmentResult};
use crate::services::email::{EmailError, EmailService};
use crate::services::invoice::{receipt_body, InvoiceRenderer, RenderError};
use crate::services::notifications::{NotificationClient, NotifyError, SubscriptionState};
use crate::services::storage::{StorageClient, StorageError};
use crate::worker::console::{ConsoleStream, EventKind};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DOWNLOAD_LINK_VALIDITY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Failure of one fulfillment step, tagged with the stage that broke.
#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error("fetching company asset: {0}")]
    AssetFetch(StorageError),
    #[error("rendering invoice: {0}")]
    Render(#[from] RenderError),
    #[error("uploading invoice: {0}")]
    Upload(StorageError),
    #[error("generating download link: {0}")]
    Link(StorageError),
    #[error("publishing receipt: {0}")]
    Notify(#[from] NotifyError),
    #[error("sending receipt email: {0}")]
    Email(#[from] EmailError),
}

/// Runs the per-task fulfillment pipeline: fetch the company asset, render
/// the invoice, upload it, mint a download link and notify the donor. Steps
/// are strictly sequential; the first failure short-circuits the rest.
pub struct FulfillmentExecutor {
    storage: StorageClient,
    notifier: NotificationClient,
    renderer: Arc<dyn InvoiceRenderer>,
    email: Option<EmailService>,
    console: ConsoleStream,
}

impl FulfillmentExecutor {
    pub fn new(
        storage: StorageClient,
        notifier: NotificationClient,
        renderer: Arc<dyn InvoiceRenderer>,
        email: Option<EmailService>,
        console: ConsoleStream,
    ) -> Self {
        Self {
            storage,
            notifier,
            renderer,
            email,
            console,
        }
    }

    pub async fn fulfill(
        &self,
        task: &DonationTask,
    ) -> Result<FulfillmentResult, FulfillmentError> {
        let mut result = FulfillmentResult::processing(task);

        match self.run(task).await {
            Ok(invoice_url) => {
                result.complete(invoice_url);
                Ok(result)
            }
            Err(e) => {
                result.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn run(&self, task: &DonationTask) -> Result<String, FulfillmentError> {
        let logo = self
            .storage
            .fetch_image(&task.company.img)
            .await
            .map_err(FulfillmentError::AssetFetch)?;
        self.console.emit(
            EventKind::Processing,
            format!("Fetched company asset {}", task.company.img),
        );

        let pdf = self.renderer.render(task, &logo).await?;
        self.console
            .emit(EventKind::Processing, "Invoice document rendered");

        let key = self
            .storage
            .upload_invoice(pdf)
            .await
            .map_err(FulfillmentError::Upload)?;
        self.console
            .emit(EventKind::Processing, format!("Invoice uploaded as {key}"));

        let url = self
            .storage
            .presigned_url(&key, DOWNLOAD_LINK_VALIDITY)
            .await
            .map_err(FulfillmentError::Link)?;

        self.send_receipt(task, &url).await?;

        Ok(url)
    }

    async fn send_receipt(&self, task: &DonationTask, url: &str) -> Result<(), FulfillmentError> {
        let body = receipt_body(&task.email, task.total(), url);

        match self.notifier.subscription_for(&task.email).await? {
            Some(SubscriptionState::Active(_)) => {
                self.notifier.publish_receipt(&task.email, &body).await?;
                self.console.emit(
                    EventKind::Processing,
                    format!("Receipt published for {}", task.email),
                );
            }
            state => {
                let reason = match state {
                    Some(SubscriptionState::Pending) => "has not confirmed their subscription",
                    _ => "is not subscribed",
                };

                if let Some(email) = &self.email {
                    warn!(
                        "Donor {} {}, sending receipt over SMTP instead",
                        task.email, reason
                    );
                    email
                        .send_receipt(&task.email, "Thank you for your donation!", &body)
                        .await?;
                    self.console.emit(
                        EventKind::Processing,
                        format!("Receipt emailed directly to {}", task.email),
                    );
                } else {
                    warn!(
                        "Donor {} {} and SMTP is not configured, skipping receipt",
                        task.email, reason
                    );
                    self.console.emit(
                        EventKind::Warning,
                        format!("No receipt delivered: donor {} {}", task.email, reason),
                    );
                }
            }
        }

        Ok(())
    }
}
