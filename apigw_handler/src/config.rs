use std::env;

use crate::error::ConfigError;

pub const TABLE_NAME: &str = "TABLE_NAME";
pub const DYNAMODB_ENDPOINT: &str = "DYNAMODB_ENDPOINT";

/// Settings fixed for the lifetime of the function instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub table_name: String,
    pub dynamodb_endpoint: Option<String>,
}

impl HandlerConfig {
    pub fn from_env() -> Result<HandlerConfig, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<HandlerConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup(TABLE_NAME)
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::Missing(TABLE_NAME))?;
        let dynamodb_endpoint = lookup(DYNAMODB_ENDPOINT).filter(|endpoint| !endpoint.is_empty());
        Ok(HandlerConfig { table_name, dynamodb_endpoint })
    }
}
