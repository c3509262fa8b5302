use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use donations::config::Settings;
use donations::database::connection;
use donations::routes;
use donations::services::notifications::NotificationClient;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env().context("failed to load configuration")?;

    let pool = connection::establish_pool(&settings)
        .await
        .context("failed to connect to the database")?;
    connection::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let aws = settings.aws_config().await;
    let notifier = NotificationClient::new(
        aws_sdk_sns::Client::new(&aws),
        settings.sns_topic_arn.clone(),
    );

    let bind_addr = (settings.http_host.clone(), settings.http_port);
    info!("Donation API listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .configure(routes::api::scoped_config)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
