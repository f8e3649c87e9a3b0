//! Client configuration.

use crate::Error;

/// Configuration for the subsidy clients, read once at construction.
///
/// Passed explicitly rather than pulled from ambient global state, so a
/// process can hold clients against different deployments side by side.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the enterprise-subsidy service.
    pub enterprise_subsidy_url: String,
    /// Base URL of the OAuth2 provider; the token endpoint is
    /// `{oauth2_provider_url}/access_token`.
    pub oauth2_provider_url: String,
    /// Backend service application key.
    pub oauth2_client_id: String,
    /// Backend service application secret.
    pub oauth2_client_secret: String,
}

impl ClientConfig {
    /// Creates a config from its parts. Trailing slashes on URLs are trimmed.
    pub fn new(
        enterprise_subsidy_url: &str,
        oauth2_provider_url: &str,
        oauth2_client_id: &str,
        oauth2_client_secret: &str,
    ) -> Self {
        Self {
            enterprise_subsidy_url: enterprise_subsidy_url.trim_end_matches('/').to_string(),
            oauth2_provider_url: oauth2_provider_url.trim_end_matches('/').to_string(),
            oauth2_client_id: oauth2_client_id.to_string(),
            oauth2_client_secret: oauth2_client_secret.to_string(),
        }
    }

    /// Reads the config from the environment variables
    /// `ENTERPRISE_SUBSIDY_URL`, `OAUTH2_PROVIDER_URL`,
    /// `BACKEND_SERVICE_OAUTH2_KEY`, and `BACKEND_SERVICE_OAUTH2_SECRET`.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            &require_env("ENTERPRISE_SUBSIDY_URL")?,
            &require_env("OAUTH2_PROVIDER_URL")?,
            &require_env("BACKEND_SERVICE_OAUTH2_KEY")?,
            &require_env("BACKEND_SERVICE_OAUTH2_SECRET")?,
        ))
    }
}

fn require_env(name: &str) -> Result<String, Error> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::ClientConfig;

    #[test]
    fn trailing_slashes_trimmed() {
        let config = ClientConfig::new(
            "https://subsidy.example.com/",
            "https://auth.example.com/oauth2/",
            "key",
            "secret",
        );
        assert_eq!(config.enterprise_subsidy_url, "https://subsidy.example.com");
        assert_eq!(config.oauth2_provider_url, "https://auth.example.com/oauth2");
    }
}
