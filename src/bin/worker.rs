use actix_web::{web, App, HttpServer};
use anyhow::Context;
use donations::config::Settings;
use donations::services::email::{EmailConfig, EmailService};
use donations::services::invoice::PdfInvoiceRenderer;
use donations::services::notifications::NotificationClient;
use donations::services::queue::QueueClient;
use donations::services::storage::StorageClient;
use donations::worker::console::{self, ConsoleStream};
use donations::worker::executor::FulfillmentExecutor;
use donations::worker::poller::QueuePoller;
use donations::worker::stats::ProcessingStats;
use dotenv::dotenv;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env().context("failed to load configuration")?;
    let aws = settings.aws_config().await;

    let queue = QueueClient::new(
        aws_sdk_sqs::Client::new(&aws),
        settings.sqs_queue_url.clone(),
    );
    let storage = StorageClient::new(
        aws_sdk_s3::Client::new(&aws),
        settings.s3_bucket_name.clone(),
    );
    let notifier = NotificationClient::new(
        aws_sdk_sns::Client::new(&aws),
        settings.sns_topic_arn.clone(),
    );

    let email = match EmailConfig::from_settings(&settings) {
        Some(config) => Some(EmailService::new(config).context("failed to build SMTP transport")?),
        None => {
            warn!("SMTP not configured, direct receipt fallback disabled");
            None
        }
    };

    let console = ConsoleStream::new(256);
    let stats = Arc::new(ProcessingStats::default());

    let executor = Arc::new(FulfillmentExecutor::new(
        storage,
        notifier,
        Arc::new(PdfInvoiceRenderer),
        email,
        console.clone(),
    ));
    let poller = QueuePoller::new(queue, executor, stats.clone(), console.clone(), &settings);

    let shutdown = CancellationToken::new();
    let poller_task = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { poller.run(shutdown).await }
    });

    let console_data = web::Data::new(console);
    let stats_data = web::Data::from(stats);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(console_data.clone())
            .app_data(stats_data.clone())
            .service(web::resource("/console/stream").route(web::get().to(console::stream)))
            .service(web::resource("/console/stats").route(web::get().to(console::stats)))
            .service(web::resource("/healthz").route(web::get().to(console::healthz)))
    })
    .disable_signals()
    .bind((settings.http_host.clone(), settings.console_port))?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);
    info!(
        "Worker console listening on {}:{}",
        settings.http_host, settings.console_port
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    shutdown.cancel();
    poller_task.await.context("poller task panicked")?;
    server_handle.stop(true).await;
    server_task.await.context("console server panicked")??;

    info!("Worker exited cleanly");
    Ok(())
}
