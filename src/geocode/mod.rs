use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub mod rate_limit;

/// Identifies this tool to the Nominatim usage policy. No API key involved.
const USER_AGENT: &str = "vt-town-meeting-geocoder";

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A resolved point on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One free-text address query against some geocoding backend.
///
/// `Ok(Some(_))` is a match, `Ok(None)` means the service answered but found
/// nothing, and `Err(_)` is a transport or service failure. A single attempt
/// per call; callers own any retry or recovery policy.
#[async_trait]
pub trait Geocode {
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>>;
}

/// Client for the public Nominatim (OpenStreetMap) search API.
pub struct Nominatim {
    client: Client,
    search_url: String,
}

/// Nominatim serializes coordinates as strings, e.g. `"lat": "44.2597"`.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl Nominatim {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(Nominatim {
            client,
            search_url: SEARCH_URL.to_string(),
        })
    }

    /// Point the client at a different search endpoint (test servers).
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }
}

#[async_trait]
impl Geocode for Nominatim {
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>> {
        debug!(%query, "nominatim search");
        let hits: Vec<SearchHit> = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .with_context(|| format!("GET {}", self.search_url))?
            .error_for_status()
            .context("Nominatim returned an error status")?
            .json()
            .await
            .context("decoding Nominatim response body")?;

        first_hit_coordinates(&hits)
    }
}

/// An empty hit list is a definitive no-match, not an error.
fn first_hit_coordinates(hits: &[SearchHit]) -> Result<Option<Coordinates>> {
    let hit = match hits.first() {
        Some(hit) => hit,
        None => return Ok(None),
    };
    let latitude = hit
        .lat
        .parse()
        .with_context(|| format!("parsing latitude `{}`", hit.lat))?;
    let longitude = hit
        .lon
        .parse()
        .with_context(|| format!("parsing longitude `{}`", hit.lon))?;
    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}
