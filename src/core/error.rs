use thiserror::Error;


#[derive(Error, Debug)]
pub enum StylistError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("No candidates matched query: {query}")]
    NoCandidates { query: String },

    #[error("External service '{service}' failed: {message}")]
    ExternalService { service: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StylistError {
    pub fn external(service: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// True for errors the caller has to act on (bad input files, bad context,
    /// nothing to recommend). External-service failures never reach callers.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::NoCandidates { .. } | Self::Validation(_)
        )
    }
}

impl From<config::ConfigError> for StylistError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}


pub type Result<T> = std::result::Result<T, StylistError>;
