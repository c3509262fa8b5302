use crate::database::connection::DbPool;
use crate::models::company::Company;
use crate::models::donation::{DonationError, DonationTask};
use crate::models::product::Product;
use crate::requests::donation::DonationRequest;
use crate::services::notifications::NotificationClient;
use tracing::{error, info};

/// How far the hand-off got. `Accepted` means the donation was taken but the
/// task publish failed; the donor still gets a success acknowledgment and the
/// failure is only logged. The distinction is typed so callers can see the
/// fire-and-forget boundary instead of it being swallowed silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed { message_id: String },
    Accepted,
}

/// Validates a donation request, snapshots one random company plus exactly
/// `amount` random products, and publishes the task to the topic.
pub async fn submit_donation(
    pool: &DbPool,
    notifier: &NotificationClient,
    request: &DonationRequest,
) -> Result<SubmissionOutcome, DonationError> {
    request.validate()?;

    let company = Company::random(pool)
        .await?
        .ok_or(DonationError::NoCompanies)?;

    let products = Product::random(pool, request.amount).await?;
    if products.len() < request.amount as usize {
        return Err(DonationError::NoProducts);
    }

    let task = DonationTask::new(request.email.clone(), request.amount, company, products);

    match notifier.publish_task(&task).await {
        Ok(message_id) => {
            info!(
                "Donation task published for {}: {}",
                task.email, message_id
            );
            Ok(SubmissionOutcome::Confirmed { message_id })
        }
        Err(e) => {
            // Best-effort boundary: the donor acknowledgment must not block
            // on the notification layer.
            error!("Failed to publish donation task for {}: {}", task.email, e);
            Ok(SubmissionOutcome::Accepted)
        }
    }
}
