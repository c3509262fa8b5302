use crate::database::connection::DbPool;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only reference row for a sponsored product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl Product {
    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        Ok(products)
    }

    pub async fn random(pool: &DbPool, amount: i32) -> Result<Vec<Self>, sqlx::Error> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY RANDOM() LIMIT $1")
                .bind(i64::from(amount))
                .fetch_all(pool)
                .await?;

        Ok(products)
    }
}
