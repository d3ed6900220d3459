use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::OverpassConfig;

const USER_AGENT: &str = "poimap/0.1.0";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Overpass API at {url} returned error status {status}")]
    Status { status: u16, url: String },

    #[error("failed to parse Overpass JSON response")]
    Decode(#[from] serde_json::Error),
}

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single tagged element from Overpass
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Anything that can produce the raw elements for a locality.
pub trait ElementSource {
    fn fetch(&self, locality: &str) -> Result<OverpassResponse, FetchError>;
}

/// Build the Overpass QL query for every shop and amenity node inside the
/// area named `locality`.
///
/// The locality is interpolated as-is. A name containing a double quote
/// produces a malformed query, which the server answers with an error.
pub fn build_activities_query(locality: &str, timeout_secs: u64) -> String {
    format!(
        r#"[out:json][timeout:{timeout_secs}];
area["name"="{locality}"]->.searchArea;
(
  node["shop"](area.searchArea);
  node["amenity"](area.searchArea);
);
out body;"#
    )
}

/// Parse a raw Overpass JSON body
pub fn parse_response(body: &str) -> Result<OverpassResponse, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Blocking Overpass client. One request per call, no retries.
pub struct OverpassClient {
    client: reqwest::blocking::Client,
    config: OverpassConfig,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.client_timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, config })
    }
}

impl ElementSource for OverpassClient {
    fn fetch(&self, locality: &str) -> Result<OverpassResponse, FetchError> {
        let query = build_activities_query(locality, self.config.query_timeout_secs);
        let url = self.config.url.clone();
        tracing::debug!(%url, %query, "sending Overpass query");

        // Overpass expects form-encoded POST data: data=<query>
        let response = self
            .client
            .post(&url)
            .form(&[("data", query.as_str())])
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .map_err(|source| FetchError::Request { url, source })?;
        parse_response(&body)
    }
}
