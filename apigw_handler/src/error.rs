use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Reasons a request body cannot be turned into a record.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{0}' must be a string")]
    InvalidField(&'static str),
    #[error("field 'year' must be numeric, got {0}")]
    InvalidYear(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to put item into table {table}: {source}")]
    PutItem {
        table: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to build response: {0}")]
    Response(#[from] lambda_http::http::Error),
    #[error("failed to encode response body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl HandlerError {
    /// Short label logged as `error_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Validation(ValidationError::InvalidJson(_)) => "JSONDecodeError",
            HandlerError::Validation(_) => "ValidationError",
            HandlerError::Store(_) => "StoreError",
            HandlerError::Response(_) | HandlerError::Encode(_) => "ResponseError",
        }
    }
}
