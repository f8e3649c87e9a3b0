//! OAuth2 client-credentials transport used by the subsidy clients.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{config::ClientConfig, Error};

/// Tokens are refreshed this long before their reported expiry.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Bearer-authenticated HTTP transport.
///
/// Fetches an access token from the configured provider via the
/// client-credentials grant and reuses it across requests until shortly
/// before expiry. The cache lock is never held across an await; a race
/// between expired callers costs at most a duplicate token fetch.
#[derive(Debug)]
pub(crate) struct OAuth2Transport {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl OAuth2Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e)
            })?;
        Ok(Self {
            http,
            token_url: format!(
                "{}/access_token",
                config.oauth2_provider_url.trim_end_matches('/')
            ),
            client_id: config.oauth2_client_id.clone(),
            client_secret: config.oauth2_client_secret.clone(),
            token: Mutex::new(None),
        })
    }

    async fn bearer_token(&self) -> Result<String, Error> {
        if let Some(cached) = self
            .token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach token endpoint: {}", e);
                Error::Transport(e)
            })?;
        let status = resp.status();
        if !status.is_success() {
            tracing::error!("Token request failed with status {}", status);
            return Err(Error::Auth(format!("token endpoint returned {}", status)));
        }
        let parsed: TokenResponse = resp.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            Error::Auth(format!("malformed token response: {}", e))
        })?;

        let expires_at = Instant::now()
            + Duration::from_secs(parsed.expires_in).saturating_sub(TOKEN_EXPIRY_SLACK);
        let access_token = parsed.access_token.clone();
        // a poisoned lock still guards a valid-or-stale token; recover it
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(CachedToken {
            access_token: parsed.access_token,
            expires_at,
        });
        Ok(access_token)
    }

    pub(crate) async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        let token = self.bearer_token().await?;
        self.http
            .get(url)
            .bearer_auth(token)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Transport(e)
            })
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<reqwest::Response, Error> {
        let token = self.bearer_token().await?;
        self.http
            .post(url)
            .bearer_auth(token)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to post resource: {}", e);
                Error::Transport(e)
            })
    }
}
