//! Refresh-token authentication against the Zoho identity service.

use std::sync::Arc;

use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::{Credentials, Region, RetryPolicy};
use crate::error::{ActionError, Result};
use crate::models::TokenResponse;

/// Exchanges long-lived credentials for a short-lived access token.
///
/// The token is fetched at most once per run and cached; jobs are short
/// enough that proactive renewal is unnecessary.
#[derive(Clone)]
pub struct TokenProvider {
    credentials: Arc<Credentials>,
    accounts_base: String,
    client: Client,
    retry: RetryPolicy,
    cached_token: Arc<RwLock<Option<String>>>,
}

impl TokenProvider {
    /// Create a provider for the region's identity endpoint.
    pub fn new(credentials: Credentials, region: Region, retry: RetryPolicy) -> Self {
        Self::with_base_url(credentials, region.accounts_base(), retry)
    }

    /// Create a provider against an explicit identity base URL.
    pub fn with_base_url(
        credentials: Credentials,
        accounts_base: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            accounts_base: accounts_base.into(),
            client: Client::new(),
            retry,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the access token, exchanging the refresh token on first use.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                return Ok(token.clone());
            }
        }

        let token =
            crate::retry::with_retry(self.retry, || self.exchange_refresh_token()).await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(token.clone());
        }

        Ok(token)
    }

    async fn exchange_refresh_token(&self) -> Result<String> {
        let url = format!("{}/oauth/v2/token", self.accounts_base);
        let params = [
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.client.post(&url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // 5xx from the identity service is still worth a retry.
            if status.is_server_error() {
                return Err(ActionError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
            return Err(ActionError::Auth(format!(
                "token refresh returned {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|err| ActionError::Auth(format!("invalid token response: {}", err)))?;

        match token_response.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ActionError::Auth(
                "no access_token in refresh response".to_string(),
            )),
        }
    }
}
