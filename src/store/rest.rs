use std::{env, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{DataStore, Row};
use crate::{error::DataAccessError, query::Query};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid SUPABASE_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}

/// Connection settings for a PostgREST endpoint.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public API key, sent as both `apikey` and bearer token.
    pub anon_key: String,
    /// Per-request timeout; requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
}

impl StoreConfig {
    /// Load the settings from the environment, reading `.env` first if
    /// one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let url = env::var("SUPABASE_URL").map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key =
            env::var("SUPABASE_ANON_KEY").map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let timeout = match env::var("SUPABASE_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(value.clone()))?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            timeout,
        })
    }
}

/// A [`DataStore`] speaking to a PostgREST endpoint over HTTP.
#[derive(Clone, Debug)]
pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Result<Self, DataAccessError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url)
    }

    /// The query string parameters for the query, in the store's syntax.
    pub fn params(query: &Query) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), query.columns())];
        params.extend(
            query
                .filters()
                .iter()
                .map(|filter| (filter.column.clone(), format!("eq.{}", filter.operand()))),
        );
        if !query.ordering().is_empty() {
            let order = query
                .ordering()
                .iter()
                .map(|order| order.to_param())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = query.row_limit() {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, DataAccessError> {
        let response = self
            .client
            .get(self.table_url(query.table()))
            .query(&Self::params(query))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body
                    }
                });
            leptos::logging::debug_warn!("store rejected query on {}: {message}", query.table());
            return Err(DataAccessError::new(message));
        }

        Ok(response.json::<Vec<Row>>().await?)
    }
}
