//! Google Places API client.
//!
//! Wraps the three legacy JSON endpoints the pipeline depends on (geocoding,
//! text search, and place details) behind the [`PlacesApi`] trait so tests
//! can substitute scripted responses at the seam. Each call is a single GET
//! with a fixed timeout; transport errors propagate and end the run, while
//! upstream status codes are surfaced as data for the caller to interpret.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Geometry, RawCandidate};

const TEXTSEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

const DETAILS_FIELDS: &str =
    "formatted_phone_number,international_phone_number,website,opening_hours";

/// Upstream status code attached to every Places/Geocoding response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    NotFound,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

impl PlacesStatus {
    pub fn is_ok(self) -> bool {
        self == PlacesStatus::Ok
    }
}

impl fmt::Display for PlacesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlacesStatus::Ok => "OK",
            PlacesStatus::ZeroResults => "ZERO_RESULTS",
            PlacesStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            PlacesStatus::RequestDenied => "REQUEST_DENIED",
            PlacesStatus::InvalidRequest => "INVALID_REQUEST",
            PlacesStatus::NotFound => "NOT_FOUND",
            PlacesStatus::UnknownError => "UNKNOWN_ERROR",
            PlacesStatus::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(s)
    }
}

/// Coordinate-plus-radius bias for a text search.
#[derive(Debug, Clone, Copy)]
pub struct Bias {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: u32,
}

/// One page of text-search results.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub status: PlacesStatus,
    #[serde(default)]
    pub results: Vec<RawCandidate>,
    pub next_page_token: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: PlacesStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: PlacesStatus,
    pub result: Option<PlaceDetails>,
}

/// Enrichment fields returned by a details lookup, all optional upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<serde_json::Value>,
}

/// The external search API as the pipeline sees it.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Free-text address lookup.
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse>;

    /// One page of text search, optionally biased to a location and
    /// optionally continuing from a pagination token.
    async fn text_search(
        &self,
        query: &str,
        bias: Option<Bias>,
        page_token: Option<&str>,
    ) -> Result<SearchResponse>;

    /// Details lookup by place id (phone numbers, website, hours).
    async fn place_details(&self, place_id: &str) -> Result<DetailsResponse>;
}

/// HTTP implementation against the production endpoints.
pub struct HttpPlacesApi {
    http: reqwest::Client,
    api_key: String,
}

impl HttpPlacesApi {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("habesha-ingest/1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, api_key })
    }
}

#[async_trait]
impl PlacesApi for HttpPlacesApi {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse> {
        let resp = self
            .http
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Geocode request failed for '{}'", address))?;
        resp.json()
            .await
            .context("Failed to parse geocode response")
    }

    async fn text_search(
        &self,
        query: &str,
        bias: Option<Bias>,
        page_token: Option<&str>,
    ) -> Result<SearchResponse> {
        let mut req = self
            .http
            .get(TEXTSEARCH_URL)
            .query(&[("query", query), ("key", self.api_key.as_str())]);
        if let Some(bias) = bias {
            req = req.query(&[
                ("location", format!("{},{}", bias.lat, bias.lng)),
                ("radius", bias.radius_m.to_string()),
            ]);
        }
        if let Some(token) = page_token {
            req = req.query(&[("pagetoken", token)]);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("Text search request failed for '{}'", query))?;
        resp.json()
            .await
            .context("Failed to parse text search response")
    }

    async fn place_details(&self, place_id: &str) -> Result<DetailsResponse> {
        let resp = self
            .http
            .get(DETAILS_URL)
            .query(&[
                ("place_id", place_id),
                ("key", self.api_key.as_str()),
                ("fields", DETAILS_FIELDS),
            ])
            .send()
            .await
            .with_context(|| format!("Details request failed for '{}'", place_id))?;
        resp.json()
            .await
            .context("Failed to parse details response")
    }
}
