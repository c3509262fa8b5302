use aws_config::{BehaviorVersion, Region, SdkConfig};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Process configuration, read from flat environment variables so existing
/// deployments keep working (AWS_REGION, SNS_TOPIC_ARN, SQS_QUEUE_URL, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    #[serde(default = "default_sns_topic_arn")]
    pub sns_topic_arn: String,

    #[serde(default = "default_sqs_queue_url")]
    pub sqs_queue_url: String,

    #[serde(default = "default_s3_bucket_name")]
    pub s3_bucket_name: String,

    /// Override for LocalStack or other S3/SNS/SQS-compatible endpoints.
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default = "default_db_password")]
    pub db_password: String,

    #[serde(default = "default_http_host")]
    pub http_host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Port the worker's console surface (SSE feed + stats) listens on.
    #[serde(default = "default_console_port")]
    pub console_port: u16,

    #[serde(default = "default_worker_max_messages")]
    pub worker_max_messages: i32,
    #[serde(default = "default_worker_wait_time_seconds")]
    pub worker_wait_time_seconds: i32,
    #[serde(default = "default_worker_max_attempts")]
    pub worker_max_attempts: u32,
    #[serde(default = "default_worker_empty_poll_delay_ms")]
    pub worker_empty_poll_delay_ms: u64,
    #[serde(default = "default_worker_poll_error_delay_ms")]
    pub worker_poll_error_delay_ms: u64,

    // Optional SMTP block for the direct receipt fallback.
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_sns_topic_arn() -> String {
    "arn:aws:sns:us-east-1:123:donations".to_string()
}

fn default_sqs_queue_url() -> String {
    "https://sqs.us-east-1.amazonaws.com/123/donations-worker".to_string()
}

fn default_s3_bucket_name() -> String {
    "donations-storage".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "postgres".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_console_port() -> u16 {
    8081
}

fn default_worker_max_messages() -> i32 {
    10
}

fn default_worker_wait_time_seconds() -> i32 {
    20
}

fn default_worker_max_attempts() -> u32 {
    3
}

fn default_worker_empty_poll_delay_ms() -> u64 {
    2000
}

fn default_worker_poll_error_delay_ms() -> u64 {
    5000
}

fn default_smtp_port() -> u16 {
    587
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    pub async fn aws_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.aws_region.clone()));

        if let Some(endpoint) = &self.aws_endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests so they don't step on each other.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_settings() {
        let _lock = TEST_LOCK.lock().unwrap();

        unsafe {
            std::env::remove_var("AWS_REGION");
            std::env::remove_var("WORKER_MAX_MESSAGES");
            std::env::remove_var("WORKER_WAIT_TIME_SECONDS");
            std::env::remove_var("WORKER_MAX_ATTEMPTS");
            std::env::remove_var("WORKER_EMPTY_POLL_DELAY_MS");
            std::env::remove_var("WORKER_POLL_ERROR_DELAY_MS");
            std::env::remove_var("SMTP_SERVER");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.aws_region, "us-east-1");
        assert_eq!(settings.worker_max_messages, 10);
        assert_eq!(settings.worker_wait_time_seconds, 20);
        assert_eq!(settings.worker_max_attempts, 3);
        assert_eq!(settings.worker_empty_poll_delay_ms, 2000);
        assert_eq!(settings.worker_poll_error_delay_ms, 5000);
        assert!(settings.smtp_server.is_none());
    }

    #[test]
    fn test_settings_from_environment() {
        let _lock = TEST_LOCK.lock().unwrap();

        unsafe {
            std::env::set_var("AWS_REGION", "eu-west-1");
            std::env::set_var("WORKER_MAX_MESSAGES", "5");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.aws_region, "eu-west-1");
        assert_eq!(settings.worker_max_messages, 5);

        unsafe {
            std::env::remove_var("AWS_REGION");
            std::env::remove_var("WORKER_MAX_MESSAGES");
        }
    }
}
