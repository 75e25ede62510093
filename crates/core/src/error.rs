use thiserror::Error;

pub type TraderResult<T> = Result<T, TraderError>;

#[derive(Error, Debug)]
pub enum TraderError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No applicable rule in round {round}")]
    NoApplicableRule { round: u64 },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule corpus error: {0}")]
    Corpus(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for TraderError {
    fn from(err: ::config::ConfigError) -> Self {
        TraderError::Config(err.to_string())
    }
}
