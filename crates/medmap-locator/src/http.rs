//! Shared HTTP plumbing for the geocoder and both facility sources.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::LocatorError;

/// Builds the `reqwest` client every stage shares.
///
/// # Errors
///
/// Returns [`LocatorError::Http`] if the client cannot be constructed.
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, LocatorError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base` and joins `path` onto it, keeping any path prefix the base
/// already carries (`https://host/app` + `health/api` → `https://host/app/health/api`).
///
/// # Errors
///
/// Returns [`LocatorError::InvalidBaseUrl`] if the result is not a valid URL.
pub fn endpoint_url(base: &str, path: &str) -> Result<Url, LocatorError> {
    let joined = if path.is_empty() {
        base.trim_end_matches('/').to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    Url::parse(&joined).map_err(|e| LocatorError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Sends `request`, requires a 2xx status and decodes the body as `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    context: &str,
) -> Result<T, LocatorError> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LocatorError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|source| LocatorError::Deserialize {
        context: context.to_string(),
        source,
    })
}
