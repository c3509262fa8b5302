use crate::{
    database::connection::DbPool,
    models::{company::Company, product::Product},
    utils::helpers::ApiResponse,
};
use actix_web::{web, HttpResponse, Result};
use tracing::{error, info};

pub async fn companies(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    info!("Listing companies");

    match Company::find_all(&pool).await {
        Ok(companies) => Ok(ApiResponse::success(
            200,
            "Companies retrieved successfully.",
            companies,
        )
        .to_response()),
        Err(e) => {
            error!("Database error listing companies: {}", e);
            Ok(ApiResponse::failure(500, "Failed to retrieve companies.").to_response())
        }
    }
}

pub async fn products(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    info!("Listing products");

    match Product::find_all(&pool).await {
        Ok(products) => Ok(ApiResponse::success(
            200,
            "Products retrieved successfully.",
            products,
        )
        .to_response()),
        Err(e) => {
            error!("Database error listing products: {}", e);
            Ok(ApiResponse::failure(500, "Failed to retrieve products.").to_response())
        }
    }
}
