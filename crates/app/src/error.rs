use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
    #[error("gateway error: {0}")]
    Gateway(#[from] client::GatewayError),
    #[error("request rejected: {0}")]
    Rejected(#[from] client::Rejection),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
