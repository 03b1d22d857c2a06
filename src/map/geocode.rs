use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

const MAPBOX_PLACES_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    place_name: String,
}

/// Resolves a clicked coordinate to a human-readable address.
#[allow(async_fn_in_trait)]
pub trait ReverseGeocode {
    async fn reverse(&self, lng: f64, lat: f64) -> Option<String>;
}

/// Mapbox places client, keyed by the access token the backend hands out.
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: Arc<str>,
    token: Arc<str>,
    http: reqwest::Client,
}

impl Geocoder {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            base_url: MAPBOX_PLACES_URL.into(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<Arc<str>>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ReverseGeocode for Geocoder {
    /// Any failure resolves to `None`; a probe without an address is still a
    /// valid, displayable location.
    async fn reverse(&self, lng: f64, lat: f64) -> Option<String> {
        let url = format!("{}/{},{}.json", self.base_url, lng, lat);
        let request = self
            .http
            .get(url)
            .query(&[("access_token", &*self.token)]);
        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(error) => {
                warn!("reverse geocoding failed: {error}");
                return None;
            }
        };
        let collection: FeatureCollection = match response.json().await {
            Ok(collection) => collection,
            Err(error) => {
                warn!("reverse geocoding failed: {error}");
                return None;
            }
        };
        collection
            .features
            .into_iter()
            .next()
            .map(|feature| feature.place_name)
    }
}
