use crate::models::company::Company;
use crate::models::product::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DonationError {
    #[error("amount must be between 1 and 3")]
    InvalidAmount,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("no companies available")]
    NoCompanies,
    #[error("not enough products available")]
    NoProducts,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Immutable snapshot of a donation handed off to the worker. Company and
/// products are captured at submission time; the worker never re-queries the
/// catalog, so prices stay as they were when the donor submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationTask {
    pub email: String,
    pub amount: i32,
    pub company: Company,
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
}

impl DonationTask {
    pub fn new(email: String, amount: i32, company: Company, products: Vec<Product>) -> Self {
        Self {
            email,
            amount,
            company,
            products,
            created_at: Utc::now(),
        }
    }

    /// Sum of the snapshot prices, never re-priced at fulfillment time.
    pub fn total(&self) -> Decimal {
        self.products.iter().map(|p| p.price).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DonationStatus {
    Processing,
    Completed,
    Failed,
}

/// Per-task fulfillment record. Created when processing starts, mutated to a
/// terminal state, then dropped once the outcome has been reported.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResult {
    pub email: String,
    pub amount: i32,
    pub company: Company,
    pub products: Vec<Product>,
    pub total_amount: Decimal,
    pub status: DonationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
}

impl FulfillmentResult {
    pub fn processing(task: &DonationTask) -> Self {
        Self {
            email: task.email.clone(),
            amount: task.amount,
            company: task.company.clone(),
            products: task.products.clone(),
            total_amount: task.total(),
            status: DonationStatus::Processing,
            error_message: None,
            invoice_url: None,
        }
    }

    pub fn complete(&mut self, invoice_url: String) {
        self.status = DonationStatus::Completed;
        self.invoice_url = Some(invoice_url);
    }

    pub fn fail(&mut self, message: String) {
        self.status = DonationStatus::Failed;
        self.error_message = Some(message);
    }
}
