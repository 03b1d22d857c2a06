use serde::{Deserialize, Serialize};

/// A persisted stop as the marker store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Body for `POST /add_marker`. Coordinates are omitted when only free text
/// is known; the store geocodes from the address on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMarker {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Body for `POST /delete_marker`; deletion is by exact address match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerAddress {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapboxToken {
    pub mapbox_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleMapsKey {
    pub key: String,
}
