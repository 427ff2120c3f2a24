use std::env;

use bmx_common::{parse_boolean_flag, Secret};
use log::*;

const DEFAULT_BMX_HOST: &str = "127.0.0.1";
const DEFAULT_BMX_PORT: u16 = 8460;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Buffer size of each notification event channel. Publication blocks once the buffer is
    /// full, so this bounds how far mail delivery may fall behind the lifecycle.
    pub event_buffer_size: usize,
    pub mail: MailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BMX_HOST.to_string(),
            port: DEFAULT_BMX_PORT,
            database_url: String::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            mail: MailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, database_url: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            database_url: database_url.to_string(),
            ..Default::default()
        }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BMX_HOST").ok().unwrap_or_else(|| {
            info!("BMX_HOST is not set. Using the default.");
            DEFAULT_BMX_HOST.into()
        });
        let port = env::var("BMX_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("{s} is not a valid port for BMX_PORT. {e} Falling back to the default.");
                    DEFAULT_BMX_PORT
                })
            })
            .unwrap_or(DEFAULT_BMX_PORT);
        let database_url = env::var("BMX_DATABASE_URL").unwrap_or_else(|_| {
            warn!("BMX_DATABASE_URL is not set. Falling back to the default sqlite database.");
            "sqlite://data/bulk_market.db".into()
        });
        let event_buffer_size = env::var("BMX_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let mail = MailConfig::from_env_or_default();
        Self { host, port, database_url, event_buffer_size, mail }
    }
}

/// Configuration of the outbound mail API. Delivery itself is an external collaborator; the
/// server only ever POSTs rendered messages at the configured endpoint. When no endpoint is set,
/// notifications are written to the log instead.
#[derive(Clone, Debug, Default)]
pub struct MailConfig {
    pub endpoint: Option<String>,
    pub sender: String,
    pub api_key: Secret<String>,
}

impl MailConfig {
    pub fn from_env_or_default() -> Self {
        let log_only = parse_boolean_flag(env::var("BMX_MAIL_LOG_ONLY").ok(), false);
        let endpoint = if log_only { None } else { env::var("BMX_MAIL_ENDPOINT").ok() };
        if endpoint.is_none() {
            warn!("No mail endpoint configured. Notification mail will be logged, not delivered.");
        }
        let sender = env::var("BMX_MAIL_SENDER").unwrap_or_else(|_| "noreply@bulkmarket.example".into());
        let api_key = Secret::new(env::var("BMX_MAIL_API_KEY").unwrap_or_default());
        Self { endpoint, sender, api_key }
    }
}
