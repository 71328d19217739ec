//! HTTP client for the Figma REST API.
//!
//! Authenticates with a personal access token in the `X-FIGMA-TOKEN` header.
//! Every non-success response is turned into [`PullError::Status`]; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ImageFormat;
use crate::contract::{DesignSource, ImageUrls};
use crate::error::PullError;

pub const API_BASE: &str = "https://api.figma.com/v1";
pub const TOKEN_ENV: &str = "FIGMA_TOKEN";

const USER_AGENT: &str = concat!("figma-pull/", env!("CARGO_PKG_VERSION"));
const API_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const ERROR_BODY_LIMIT: usize = 200;

pub struct FigmaClient {
    api: Client,
    /// Rendition URLs point at a CDN and get no token.
    cdn: Client,
    base_url: String,
}

impl FigmaClient {
    pub fn new(token: &str) -> Result<Self, PullError> {
        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token)?;
        token_value.set_sensitive(true);
        headers.insert("x-figma-token", token_value);

        let api = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(API_TIMEOUT)
            .build()
            .map_err(|e| PullError::Http {
                url: API_BASE.to_string(),
                source: e,
            })?;
        let cdn = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| PullError::Http {
                url: API_BASE.to_string(),
                source: e,
            })?;

        info!(token_set = !token.is_empty(), "Initialized FigmaClient");
        Ok(Self {
            api,
            cdn,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, PullError> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Self::new(token.trim()),
            _ => {
                error!("{TOKEN_ENV} missing in environment");
                Err(PullError::MissingToken)
            }
        }
    }

    /// Points the client at another API root, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, PullError> {
        debug!(url = %url, "GET");
        let resp = self
            .api
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "Request failed");
                PullError::Http {
                    url: url.to_string(),
                    source: e,
                }
            })?;
        let resp = check_status(url, resp).await?;
        resp.json::<Value>().await.map_err(|e| PullError::Http {
            url: url.to_string(),
            source: e,
        })
    }
}

async fn check_status(url: &str, resp: reqwest::Response) -> Result<reqwest::Response, PullError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp
        .text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
    let body: String = text.chars().take(ERROR_BODY_LIMIT).collect();
    error!(status = %status, url = %url, "Figma API returned error. Response body: {body}");
    Err(PullError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DesignSource for FigmaClient {
    async fn get_file(&self, file_key: &str) -> Result<Value, PullError> {
        let url = format!("{}/files/{file_key}", self.base_url);
        info!(url = %url, "Fetching Figma file");
        self.get_json(&url, &[]).await
    }

    async fn get_styles(&self, file_key: &str) -> Result<Value, PullError> {
        let url = format!("{}/files/{file_key}/styles", self.base_url);
        info!(url = %url, "Fetching Figma styles");
        self.get_json(&url, &[]).await
    }

    async fn get_image_urls(
        &self,
        file_key: &str,
        node_ids: Vec<String>,
        format: ImageFormat,
        scale: u32,
    ) -> Result<ImageUrls, PullError> {
        let url = format!("{}/images/{file_key}", self.base_url);
        info!(url = %url, count = node_ids.len(), %format, scale, "Requesting image renditions");
        let query = [
            ("ids", node_ids.join(",")),
            ("format", format.as_str().to_string()),
            ("scale", scale.to_string()),
        ];
        let data = self.get_json(&url, &query).await?;
        Ok(parse_image_urls(&data))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PullError> {
        let resp = self.cdn.get(url).send().await.map_err(|e| PullError::Http {
            url: url.to_string(),
            source: e,
        })?;
        let resp = check_status(url, resp).await?;
        let bytes = resp.bytes().await.map_err(|e| PullError::Http {
            url: url.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Reads the `images` object of an images response. Non-string URLs become `None`.
pub fn parse_image_urls(data: &Value) -> ImageUrls {
    data.get("images")
        .and_then(Value::as_object)
        .map(|images| {
            images
                .iter()
                .map(|(id, url)| (id.clone(), url.as_str().map(str::to_string)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_null_and_string_urls() {
        let urls = parse_image_urls(&json!({
            "err": null,
            "images": {"1:2": "https://cdn/a.png", "3:4": null}
        }));
        assert_eq!(urls.len(), 2);
        assert_eq!(urls["1:2"].as_deref(), Some("https://cdn/a.png"));
        assert_eq!(urls["3:4"], None);
    }

    #[test]
    fn missing_images_key_is_empty() {
        assert!(parse_image_urls(&json!({"err": "bad"})).is_empty());
    }

    #[test]
    fn base_url_override_trims_trailing_slash() {
        let client = FigmaClient::new("t").unwrap().with_base_url("http://localhost:9/v1/");
        assert_eq!(client.base_url, "http://localhost:9/v1");
    }

    #[test]
    #[serial_test::serial]
    fn from_env_requires_a_non_blank_token() {
        std::env::set_var(TOKEN_ENV, "   ");
        assert!(matches!(FigmaClient::from_env(), Err(PullError::MissingToken)));
        std::env::set_var(TOKEN_ENV, "figd_abc");
        assert!(FigmaClient::from_env().is_ok());
        std::env::remove_var(TOKEN_ENV);
    }

    #[test]
    fn token_with_newline_is_rejected() {
        assert!(matches!(
            FigmaClient::new("bad\ntoken"),
            Err(PullError::InvalidToken(_))
        ));
    }
}
