use crate::config::Settings;
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    Config(String),
    #[error("Email sending failed: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
    #[error("Message building failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Address parsing failed: {0}")]
    Address(#[from] lettre::address::AddressError),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    /// The SMTP block is optional; without it the worker skips the direct
    /// receipt fallback.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        Some(Self {
            smtp_server: settings.smtp_server.clone()?,
            smtp_port: settings.smtp_port,
            username: settings.smtp_username.clone()?,
            password: settings.smtp_password.clone()?,
            from_email: settings.from_email.clone()?,
            from_name: settings
                .from_name
                .clone()
                .unwrap_or_else(|| "Donations".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            .map_err(|e| EmailError::Config(format!("SMTP relay error: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    pub async fn send_receipt(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
    ) -> Result<(), EmailError> {
        let from_address = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let html_body = format!("<pre>{}</pre>", text_body);

        let message = Message::builder()
            .from(from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        self.mailer.send(message).await?;
        info!("Receipt emailed to: {}", to_email);

        Ok(())
    }
}
