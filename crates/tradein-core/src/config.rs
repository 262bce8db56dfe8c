//! Configuration module
//!
//! Environment-driven configuration for the intake service: HTTP server,
//! upload limits, photo storage, and SMTP settings.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_FILES_PER_SUBMISSION: usize = 10;
const UPLOAD_CONCURRENCY: usize = 4;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const SEND_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    storage_backend: String,
    local_storage_path: String,
    local_storage_base_url: String,
    max_file_size_bytes: usize,
    max_files_per_submission: usize,
    upload_concurrency: usize,
    upload_timeout_secs: u64,
    send_timeout_secs: u64,
    smtp_host: Option<String>,
    smtp_port: Option<u16>,
    smtp_tls: bool,
    smtp_user: Option<String>,
    smtp_password: Option<String>,
    smtp_from: Option<String>,
    store_notify_to: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            storage_backend: env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/photos".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/photos".to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files_per_submission: env::var("MAX_FILES_PER_SUBMISSION")
                .unwrap_or_else(|_| MAX_FILES_PER_SUBMISSION.to_string())
                .parse()
                .unwrap_or(MAX_FILES_PER_SUBMISSION),
            upload_concurrency: env::var("UPLOAD_CONCURRENCY")
                .unwrap_or_else(|_| UPLOAD_CONCURRENCY.to_string())
                .parse::<usize>()
                .unwrap_or(UPLOAD_CONCURRENCY)
                .max(1),
            upload_timeout_secs: env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| UPLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_TIMEOUT_SECS),
            send_timeout_secs: env::var("SEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| SEND_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(SEND_TIMEOUT_SECS),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|s| s.parse().ok()),
            smtp_tls: env::var("SMTP_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            store_notify_to: env::var("STORE_NOTIFY_TO").ok(),
        };

        Ok(config)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn storage_backend(&self) -> &str {
        &self.storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.local_storage_base_url
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn max_files_per_submission(&self) -> usize {
        self.max_files_per_submission
    }

    /// Bounded fan-out width for photo storage calls. Always at least 1;
    /// 1 reproduces strictly sequential uploads.
    pub fn upload_concurrency(&self) -> usize {
        self.upload_concurrency
    }

    pub fn upload_timeout_secs(&self) -> u64 {
        self.upload_timeout_secs
    }

    pub fn send_timeout_secs(&self) -> u64 {
        self.send_timeout_secs
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> Option<u16> {
        self.smtp_port
    }

    pub fn smtp_tls(&self) -> bool {
        self.smtp_tls
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.smtp_from.as_deref()
    }

    /// Recipient for the store-facing notification. Falls back to the
    /// sender address when unset.
    pub fn store_notify_to(&self) -> Option<&str> {
        self.store_notify_to.as_deref().or(self.smtp_from.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_uses_defaults() {
        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("CORS_ORIGINS");
        let config = Config::from_env().expect("default config");
        assert_eq!(config.server_port(), DEFAULT_PORT);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.max_files_per_submission(), 10);
        assert!(config.upload_concurrency() >= 1);
    }

    #[test]
    fn store_notify_to_falls_back_to_smtp_from() {
        let mut config = Config::from_env().expect("default config");
        config.store_notify_to = None;
        config.smtp_from = Some("shop@example.com".to_string());
        assert_eq!(config.store_notify_to(), Some("shop@example.com"));
    }
}
