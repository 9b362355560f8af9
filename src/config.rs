//! Client configuration and defaults

use reqwest::Client;
use std::time::Duration;

/// English Wikipedia action API
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Page carrying the species table
pub const DEFAULT_PAGE: &str = "List_of_ursids";

/// Section of the page that holds the table rows
pub const DEFAULT_SECTION: u32 = 3;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Wikimedia rejects requests without a descriptive User-Agent
pub const USER_AGENT: &str = concat!(
    "species-gallery/",
    env!("CARGO_PKG_VERSION"),
    " (https://royalbit.ca/species-gallery)"
);

/// Settings shared by every HTTP call
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Build the reqwest client used for API reads and image probes
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://en.wikipedia.org/w/api.php");
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.user_agent.starts_with("species-gallery/"));
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&ClientConfig::default()).is_ok());
    }
}
