use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Outcome of one upstream call: either a decoded, `error`-free payload or
/// nothing at all. Callers never see a third state that would require error
/// inspection downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    Absent,
}

impl Lookup {
    pub fn found(&self) -> Option<&Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// Client for the upstream catalog API. One `reqwest::Client` with the
/// configured timeout, reused across all calls; no retry, no caching, every
/// call independent and stateless.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One GET against the catalog API. Every failure class (transport
    /// error, non-200 status, undecodable body, upstream `error` payload)
    /// collapses to `Lookup::Absent`; nothing propagates to the caller.
    pub async fn fetch(&self, endpoint: &str) -> Lookup {
        let endpoint = endpoint.trim();
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        let url = format!("{}/{}", self.base_url, endpoint);

        log::debug!("GET {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                log::warn!("Request to {} timed out", url);
                return Lookup::Absent;
            }
            Err(e) if e.is_connect() => {
                log::warn!("Cannot connect to {}: {}", url, e);
                return Lookup::Absent;
            }
            Err(e) => {
                log::warn!("Request to {} failed: {}", url, e);
                return Lookup::Absent;
            }
        };

        let status = response.status();
        log::debug!("Response status from {}: {}", url, status);

        if status != StatusCode::OK {
            log::warn!("HTTP {} from {}", status, url);
            return Lookup::Absent;
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Undecodable body from {}: {}", url, e);
                return Lookup::Absent;
            }
        };

        // A 200 that still carries an `error` object is an upstream
        // application error, treated the same as a failed transport.
        if let Some(error) = data.as_object().and_then(|obj| obj.get("error")) {
            log::warn!("Catalog API error from {}: {}", url, error);
            return Lookup::Absent;
        }

        if let Some(items) = data.get("data").and_then(Value::as_array) {
            log::debug!("{} returned {} items", url, items.len());
        }

        Lookup::Found(data)
    }

    pub async fn chart(&self) -> Lookup {
        self.fetch("chart/0").await
    }

    pub async fn editorial(&self) -> Lookup {
        self.fetch("editorial").await
    }

    /// There is no single-editorial endpoint upstream; the selection listing
    /// stands in for it.
    pub async fn editorial_selection(&self, id: &str) -> Lookup {
        self.fetch(&format!("editorial/{}/selection", urlencoding::encode(id)))
            .await
    }

    pub async fn search(&self, kind: &str, query: &str, limit: u32) -> Lookup {
        self.fetch(&format!(
            "search/{}?q={}&limit={}",
            urlencoding::encode(kind),
            urlencoding::encode(query),
            limit
        ))
        .await
    }

    pub async fn user(&self, id: &str) -> Lookup {
        self.fetch(&format!("user/{}", urlencoding::encode(id))).await
    }

    pub async fn track(&self, id: &str) -> Lookup {
        self.fetch(&format!("track/{}", urlencoding::encode(id))).await
    }

    pub async fn album(&self, id: &str) -> Lookup {
        self.fetch(&format!("album/{}", urlencoding::encode(id))).await
    }

    pub async fn artist(&self, id: &str) -> Lookup {
        self.fetch(&format!("artist/{}", urlencoding::encode(id))).await
    }

    pub async fn artist_top(&self, id: &str, limit: u32) -> Lookup {
        self.fetch(&format!(
            "artist/{}/top?limit={}",
            urlencoding::encode(id),
            limit
        ))
        .await
    }

    pub async fn playlist(&self, id: &str) -> Lookup {
        self.fetch(&format!("playlist/{}", urlencoding::encode(id)))
            .await
    }

    pub async fn genres(&self) -> Lookup {
        self.fetch("genre").await
    }

    pub async fn radios(&self) -> Lookup {
        self.fetch("radio").await
    }

    pub async fn episode(&self, id: &str) -> Lookup {
        self.fetch(&format!("episode/{}", urlencoding::encode(id)))
            .await
    }
}
