//! Image availability checks
//!
//! A HEAD request decides whether an image URL is shown as-is or replaced by
//! the placeholder. Nothing here returns an error to the caller.

use crate::config::{build_http_client, ClientConfig};
use anyhow::{Context, Result};
use clap::Args;
use reqwest::Client;
use serde::Serialize;

/// Shown whenever the real image is missing or unreachable
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/200x200.png?text=Image+Not+Available";

#[derive(Args)]
pub struct ProbeArgs {
    /// Image URL to check
    #[arg(value_name = "URL")]
    url: String,
}

/// Result of a single probe (compact)
#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub url: String,
    pub display: String,
    pub available: bool,
}

/// Run the probe command
pub async fn run_probe(args: ProbeArgs, client_config: &ClientConfig) -> Result<()> {
    let http = build_http_client(client_config).context("Failed to build HTTP client")?;
    let checker = AvailabilityChecker::new(http);

    let result = checker.check(&args.url).await;
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}

/// HEAD-probes candidate image URLs
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    http: Client,
    placeholder: String,
}

impl AvailabilityChecker {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            placeholder: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    /// Use a different placeholder URL
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether a HEAD request for `candidate` gets a 2xx response.
    ///
    /// A blank candidate is unavailable without any request.
    pub async fn is_available(&self, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            tracing::debug!("No image URL");
            return false;
        }

        match self.http.head(candidate).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    url = %truncate(candidate, 80),
                    status = response.status().as_u16(),
                    "Image not available"
                );
                false
            }
            Err(e) => {
                tracing::warn!(url = %truncate(candidate, 80), error = %e, "Error checking image availability");
                false
            }
        }
    }

    /// Return `candidate` if it is available, the placeholder otherwise
    pub async fn resolve_display_url(&self, candidate: &str) -> String {
        if self.is_available(candidate).await {
            candidate.to_string()
        } else {
            self.placeholder.clone()
        }
    }

    /// Check one URL and report both the verdict and the URL to display
    pub async fn check(&self, candidate: &str) -> ProbeResult {
        let available = self.is_available(candidate).await;
        let display = if available {
            candidate.to_string()
        } else {
            self.placeholder.clone()
        };
        ProbeResult {
            url: candidate.to_string(),
            display,
            available,
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max - 3;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a very long string", 10), "this is...");
        assert_eq!(truncate("Ursidé_ürsüs", 9), "Ursid...");
    }

    #[tokio::test]
    async fn test_empty_candidate_uses_placeholder() {
        let checker = AvailabilityChecker::new(Client::new());
        assert_eq!(checker.resolve_display_url("").await, PLACEHOLDER_IMAGE);
        assert_eq!(checker.resolve_display_url("   ").await, PLACEHOLDER_IMAGE);
    }

    #[tokio::test]
    async fn test_check_blank_url_is_unavailable() {
        let checker = AvailabilityChecker::new(Client::new()).with_placeholder("");
        let result = checker.check("").await;
        assert_eq!(result.display, "");
        assert!(!result.available);
    }

    #[tokio::test]
    async fn test_invalid_url_uses_placeholder() {
        let checker = AvailabilityChecker::new(Client::new());
        assert_eq!(checker.resolve_display_url("not a url").await, PLACEHOLDER_IMAGE);
    }
}
