use crate::database::connection::DbPool;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only reference row describing a sponsoring company. `img` is the
/// object-storage key fragment of the company logo under `images/`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub img: String,
}

impl Company {
    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        Ok(companies)
    }

    pub async fn random(pool: &DbPool) -> Result<Option<Self>, sqlx::Error> {
        let company =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY RANDOM() LIMIT 1")
                .fetch_optional(pool)
                .await?;

        Ok(company)
    }
}
