use crate::domain::balance::Balance;
use crate::domain::payer::PayerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonetizerError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("insufficient balance on id. id={payer_id} price={price} balance={balance}")]
    InsufficientBalance {
        payer_id: PayerId,
        price: Balance,
        balance: Balance,
    },
    #[error("malformed payment notification: {0}")]
    MalformedNotification(String),
    #[error("payer id {0:?} cannot be embedded in a payment address")]
    InvalidPayerId(String),
    #[error("threshold {threshold} can never be reached with max balance {cap}")]
    ThresholdAboveCap { threshold: Balance, cap: Balance },
    #[error("timed out waiting for payer {payer_id} to reach {threshold}")]
    WaitTimedOut {
        payer_id: PayerId,
        threshold: Balance,
    },
    #[error("wrong Accept header: expected application/spsp+json, got {0:?}")]
    WrongAcceptHeader(Option<String>),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonetizerError>;
