//! Shared blocking HTTP client.
//!
//! One client serves both the symbol list and the quote provider so the
//! provider's session cookies live in a single cookie store.

use super::provider::DataError;
use crate::config::HttpConfig;
use reqwest::blocking::Client;

pub fn build_client(config: &HttpConfig) -> Result<Client, DataError> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .cookie_store(true)
        .build()
        .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))
}
