pub mod app_config;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod order;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SheetsCredentialSource};
pub use catalog::{Catalog, ProductRecord, ProductStatus};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{hash_password, load_credentials, CookieSettings, CredentialsFile};
pub use order::{
    generate_order_number, validate_submission, Channel, Department, OrderDraft, OrderError,
    OrderHeader, OrderLine, Priority, ShipTo, ShippingMethod, SHEET_COLUMNS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read credentials file {path}: {source}")]
    CredentialsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials file: {0}")]
    CredentialsFileParse(#[source] serde_yaml::Error),

    #[error("invalid credentials file: {0}")]
    Validation(String),
}
