use std::env;

use thiserror::Error;

const DEFAULT_DATABASE: &str = "reyesjeffrey";
const DEFAULT_COLLECTION: &str = "SiteVisits";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 7071;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} connection string is missing from configuration.")]
    MissingConnectionString(&'static str),
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection_string: String,
    pub database_name: String,
    pub collection_name: String,
    pub host: String,
    pub port: u16,
    /// Report storage failures as `success: true` with a describing message.
    pub success_on_storage_failure: bool,
    pub function_key: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let connection_string = get("COSMOSDB_CONNECTION_STRING")
            .ok_or(ConfigError::MissingConnectionString("CosmosDB"))?;

        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let success_on_storage_failure = match get("SUCCESS_ON_STORAGE_FAILURE") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                name: "SUCCESS_ON_STORAGE_FAILURE",
                value,
            })?,
            None => true,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            connection_string,
            database_name: get("COSMOSDB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            collection_name: get("COSMOSDB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            success_on_storage_failure,
            function_key: get("FUNCTION_KEY"),
            allowed_origins,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
