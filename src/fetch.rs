//! MediaWiki API reads: section markup and image URLs
//!
//! Both calls are unauthenticated GETs against the action API with
//! `format=json&origin=*`.

use crate::config::{build_http_client, ClientConfig};
use crate::error::{FetchError, Result};
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Thin wrapper around the action API endpoint
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
    api_url: Url,
}

impl WikiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = build_http_client(config)?;
        Self::with_client(http, &config.api_url)
    }

    /// Reuse an existing reqwest client (shared with the image prober)
    pub fn with_client(http: Client, api_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            api_url: Url::parse(api_url)?,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Fetch the raw wikitext of one numbered section of a page
    pub async fn fetch_page_section(&self, page: &str, section: u32) -> Result<String> {
        let section_param = section.to_string();
        let url = self.endpoint(&[
            ("action", "parse"),
            ("page", page),
            ("prop", "wikitext"),
            ("section", &section_param),
            ("format", "json"),
            ("origin", "*"),
        ]);

        let result = match self.get_json(url, "page section").await {
            Ok(body) => wikitext_of(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(text) => tracing::debug!(page, section, bytes = text.len(), "Fetched page section"),
            Err(e) => tracing::error!(page, section, error = %e, "Error fetching page section"),
        }
        result
    }

    /// Resolve a media file name (without `File:`) to its direct URL.
    ///
    /// Every missing level of the response yields an empty string, and a
    /// blank file name yields one without a request.
    pub async fn fetch_image_url(&self, file_name: &str) -> Result<String> {
        if file_name.trim().is_empty() {
            tracing::debug!("Row has no image file");
            return Ok(String::new());
        }

        let title = format!("File:{}", file_name);
        let url = self.endpoint(&[
            ("action", "query"),
            ("titles", &title),
            ("prop", "imageinfo"),
            ("iiprop", "url"),
            ("format", "json"),
            ("origin", "*"),
        ]);

        match self.get_json(url, "image info").await {
            Ok(body) => {
                let image = image_url_of(&body);
                if image.is_empty() {
                    tracing::debug!(file = file_name, "No image info for file");
                }
                Ok(image)
            }
            Err(e) => {
                tracing::error!(file = file_name, error = %e, "Error fetching image URL");
                Err(e)
            }
        }
    }

    fn endpoint(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }

    async fn get_json(&self, url: Url, what: &'static str) -> Result<Value> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                what,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode { what, source })
    }
}

/// Pull `parse.wikitext["*"]` out of a parse response
fn wikitext_of(body: &Value) -> Result<String> {
    if let Some(error) = body.get("error") {
        return Err(FetchError::Api {
            code: field_str(error, "code"),
            info: field_str(error, "info"),
        });
    }

    let parse = body.get("parse").ok_or(FetchError::Structure {
        what: "parse",
        field: "parse",
    })?;
    let wikitext = parse.get("wikitext").ok_or(FetchError::Structure {
        what: "parse",
        field: "parse.wikitext",
    })?;

    wikitext
        .get("*")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(FetchError::Structure {
            what: "parse",
            field: "parse.wikitext.*",
        })
}

/// First page's `imageinfo[0].url`, or empty
fn image_url_of(body: &Value) -> String {
    body.get("query")
        .and_then(|query| query.get("pages"))
        .and_then(first_page)
        .and_then(|page| page.get("imageinfo"))
        .and_then(|info| info.get(0))
        .and_then(|info| info.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// formatversion=1 keys pages by id, formatversion=2 returns a list
fn first_page(pages: &Value) -> Option<&Value> {
    match pages {
        Value::Object(map) => map.values().next(),
        Value::Array(list) => list.first(),
        _ => None,
    }
}

fn field_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
