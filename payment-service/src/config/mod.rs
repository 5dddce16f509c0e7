use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub payos: PayosConfig,
    pub smtp: SmtpConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub grpc_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
}

/// Endpoints of the sibling services used for display-data lookups.
#[derive(Deserialize, Clone, Debug)]
pub struct DirectoryConfig {
    pub user_service_endpoint: String,
    pub tour_service_endpoint: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PayosConfig {
    pub client_id: String,
    pub api_key: Secret<String>,
    pub checksum_key: Secret<String>,
    pub api_base_url: String,
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: Secret<String>,
    pub from_address: String,
    pub enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("PAYMENT_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PAYMENT_SERVICE_PORT")
            .unwrap_or_else(|_| "3003".to_string())
            .parse()?;
        let grpc_port = env::var("PAYMENT_SERVICE_GRPC_PORT")
            .unwrap_or_else(|_| "50053".to_string())
            .parse()?;

        let db_url = env::var("PAYMENT_DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("PAYMENT_DATABASE_URL must be set"))?;
        let max_connections = env::var("PAYMENT_DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?;

        let user_service_endpoint = env::var("USER_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:50051".to_string());
        let tour_service_endpoint = env::var("TOUR_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:50052".to_string());

        let payos_client_id = env::var("PAYOS_CLIENT_ID").unwrap_or_default();
        let payos_api_key = env::var("PAYOS_API_KEY").unwrap_or_default();
        let payos_checksum_key = env::var("PAYOS_CHECKSUM_KEY").unwrap_or_default();
        let payos_api_base_url = env::var("PAYOS_API_BASE_URL")
            .unwrap_or_else(|_| "https://api-merchant.payos.vn".to_string());
        let return_url = env::var("PAYOS_RETURN_URL")
            .unwrap_or_else(|_| "http://localhost:3003/api/v1/payments".to_string());
        let cancel_url = env::var("PAYOS_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:3003/api/v1/payments".to_string());

        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let smtp_from = env::var("SMTP_FROM_ADDRESS")
            .unwrap_or_else(|_| "no-reply@tourmate.local".to_string());
        let smtp_enabled = env::var("SMTP_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                grpc_port,
            },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections,
            },
            directory: DirectoryConfig {
                user_service_endpoint,
                tour_service_endpoint,
            },
            payos: PayosConfig {
                client_id: payos_client_id,
                api_key: Secret::new(payos_api_key),
                checksum_key: Secret::new(payos_checksum_key),
                api_base_url: payos_api_base_url,
                return_url,
                cancel_url,
            },
            smtp: SmtpConfig {
                host: smtp_host,
                username: smtp_username,
                password: Secret::new(smtp_password),
                from_address: smtp_from,
                enabled: smtp_enabled,
            },
            service_name: "payment-service".to_string(),
        })
    }
}
