use crate::{
    requests::notification::{NotificationRequest, SubscribeRequest},
    services::notifications::{NotificationClient, SubscriptionState},
    utils::helpers::ApiResponse,
};
use actix_web::{web, HttpResponse, Result};
use tracing::{error, info};

pub async fn subscribe(
    notifier: web::Data<NotificationClient>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    info!("Subscription request for {}", request.email);

    match notifier.subscription_for(&request.email).await {
        Ok(Some(SubscriptionState::Pending)) => Ok(ApiResponse::failure(
            400,
            "Subscription request already sent. Check your inbox to confirm it.",
        )
        .to_response()),
        Ok(Some(SubscriptionState::Active(_))) => {
            Ok(ApiResponse::failure(400, "You are already subscribed to notifications.")
                .to_response())
        }
        Ok(None) => match notifier.subscribe(&request.email).await {
            Ok(arn) => Ok(ApiResponse::success(
                200,
                "Subscription request sent. Check your inbox to confirm it.",
                arn,
            )
            .to_response()),
            Err(e) => {
                error!("Failed to subscribe {}: {}", request.email, e);
                Ok(ApiResponse::failure(500, "Failed to create the subscription.").to_response())
            }
        },
        Err(e) => {
            error!("Failed to look up subscription for {}: {}", request.email, e);
            Ok(ApiResponse::failure(500, "Failed to create the subscription.").to_response())
        }
    }
}

pub async fn unsubscribe(
    notifier: web::Data<NotificationClient>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    info!("Unsubscribe request for {}", request.email);

    match notifier.subscription_for(&request.email).await {
        Ok(Some(SubscriptionState::Active(arn))) => match notifier.unsubscribe(&arn).await {
            Ok(()) => Ok(ApiResponse::success(
                200,
                format!("{} has been unsubscribed.", request.email),
                (),
            )
            .to_response()),
            Err(e) => {
                error!("Failed to unsubscribe {}: {}", request.email, e);
                Ok(ApiResponse::failure(500, "Failed to cancel the subscription.").to_response())
            }
        },
        Ok(_) => Ok(ApiResponse::failure(
            404,
            "No active subscription found for this email.",
        )
        .to_response()),
        Err(e) => {
            error!("Failed to look up subscription for {}: {}", request.email, e);
            Ok(ApiResponse::failure(500, "Failed to cancel the subscription.").to_response())
        }
    }
}

pub async fn notification(
    notifier: web::Data<NotificationClient>,
    request: web::Json<NotificationRequest>,
) -> Result<HttpResponse> {
    if request.message.trim().is_empty() {
        return Ok(ApiResponse::failure(400, "The message body cannot be empty.").to_response());
    }

    match notifier.broadcast(&request.message).await {
        Ok(message_id) => Ok(ApiResponse::success(
            200,
            format!("Broadcast notification sent [{}].", message_id),
            request.message.clone(),
        )
        .to_response()),
        Err(e) => {
            error!("Failed to broadcast notification: {}", e);
            Ok(ApiResponse::failure(500, "Failed to send the broadcast notification.")
                .to_response())
        }
    }
}
