use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountsError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid balance: {0}")]
    InvalidBalance(String),
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),
    #[error("Name lookup failed: {0}")]
    Lookup(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccountsError>;
