use std::sync::Arc;

use crate::{backend::Marker, shared::Coordinate};

/// A user-added stop on the trip. The address string is the identity; the
/// store never holds two markers with the same address.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub address: Arc<str>,
    pub coordinate: Coordinate,
}

impl Stop {
    pub fn new(address: impl Into<Arc<str>>, coordinate: Coordinate) -> Self {
        Self {
            address: address.into(),
            coordinate,
        }
    }
}

impl From<Marker> for Stop {
    fn from(value: Marker) -> Self {
        Self {
            address: value.address.into(),
            coordinate: Coordinate {
                latitude: value.lat,
                longitude: value.lng,
            },
        }
    }
}

