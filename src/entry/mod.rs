use thiserror::Error;

use crate::{backend::NewMarker, shared::Coordinate};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("address must not be empty")]
    EmptyAddress,
}

/// An autocomplete-confirmed selection: formatted address plus precise
/// coordinates from the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub address: String,
    pub coordinate: Coordinate,
}

/// The address input component. Owns the text field and turns either an
/// autocomplete selection or raw free text into a marker the store accepts.
#[derive(Debug, Default)]
pub struct MarkerEntry {
    field: String,
}

impl MarkerEntry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_field(&mut self, text: impl Into<String>) {
        self.field = text.into();
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Builds a marker from the confirmed place, or from the raw field text
    /// when there is none (the store geocodes that server-side). The field
    /// is cleared on success, whether or not optimization later keeps the
    /// stop.
    pub fn submit(&mut self, place: Option<ResolvedPlace>) -> Result<NewMarker, Error> {
        let marker = match place {
            Some(place) => {
                let address = place.address.trim();
                if address.is_empty() {
                    return Err(Error::EmptyAddress);
                }
                NewMarker {
                    address: address.to_string(),
                    lat: Some(place.coordinate.latitude),
                    lng: Some(place.coordinate.longitude),
                }
            }
            None => {
                let address = self.field.trim();
                if address.is_empty() {
                    return Err(Error::EmptyAddress);
                }
                NewMarker {
                    address: address.to_string(),
                    lat: None,
                    lng: None,
                }
            }
        };
        self.field.clear();
        Ok(marker)
    }
}
