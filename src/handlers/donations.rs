use crate::{
    database::connection::DbPool,
    models::donation::DonationError,
    requests::donation::DonationRequest,
    services::donations::{submit_donation, SubmissionOutcome},
    services::notifications::NotificationClient,
    utils::helpers::ApiResponse,
};
use actix_web::{web, HttpResponse, Result};
use tracing::{error, info};

pub async fn donate(
    pool: web::Data<DbPool>,
    notifier: web::Data<NotificationClient>,
    request: web::Json<DonationRequest>,
) -> Result<HttpResponse> {
    info!(
        "Donation request from {} for {} products",
        request.email, request.amount
    );

    match submit_donation(&pool, &notifier, &request).await {
        Ok(outcome) => {
            if let SubmissionOutcome::Confirmed { message_id } = &outcome {
                info!("Donation task confirmed: {}", message_id);
            }
            Ok(ApiResponse::<()>::ok(
                "Thank you for your donation! You will receive an email with your invoice shortly.",
            )
            .to_response())
        }
        Err(e @ (DonationError::InvalidAmount | DonationError::InvalidEmail(_))) => {
            Ok(ApiResponse::failure(400, e.to_string()).to_response())
        }
        Err(e @ (DonationError::NoCompanies | DonationError::NoProducts)) => {
            error!("Reference data unavailable: {}", e);
            Ok(ApiResponse::failure(502, e.to_string()).to_response())
        }
        Err(DonationError::Database(e)) => {
            error!("Database error submitting donation: {}", e);
            Ok(ApiResponse::failure(500, "Failed to process the donation.").to_response())
        }
    }
}

pub async fn reason() -> Result<HttpResponse> {
    Ok(ApiResponse::success(
        200,
        "Donation reason retrieved successfully.",
        "Help build a brighter (and more controlled) tomorrow. Donate to fund the next \
         generation of consumer cybernetics, upgraded security robots and bioengineering \
         for a cleaner world!",
    )
    .to_response())
}
