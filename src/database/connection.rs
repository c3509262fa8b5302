use crate::config::Settings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

pub type DbPool = sqlx::PgPool;

pub async fn establish_pool(settings: &Settings) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&settings.db_host)
        .port(settings.db_port)
        .database(&settings.db_name)
        .username(&settings.db_user)
        .password(&settings.db_password);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!(
        "Connected to database {} at {}:{}",
        settings.db_name, settings.db_host, settings.db_port
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
