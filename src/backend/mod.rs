use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::warn;

use crate::trip::Stop;

mod models;
pub use models::*;

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The marker-store capability the trip planner depends on. The remote store
/// is the single source of truth for stops; callers re-fetch through
/// [`Store::markers`] after every mutation instead of trusting local state.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn markers(&self) -> Result<Vec<Stop>, Error>;
    async fn add_marker(&self, marker: &NewMarker) -> Result<(), Error>;
    async fn delete_marker(&self, address: &str) -> Result<(), Error>;
}

/// HTTP client for the remote backend: marker persistence, access tokens and
/// the readiness gate.
#[derive(Debug, Clone)]
pub struct Backend {
    base_url: Arc<str>,
    http: reqwest::Client,
    retry_interval: Duration,
}

impl Backend {
    pub fn new(base_url: impl Into<Arc<str>>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Waits until the backend answers its healthcheck, retrying on a fixed
    /// interval with no attempt cap. There is nothing useful to do before the
    /// store is up, so this never gives up on its own.
    pub async fn wait_until_ready(&self) {
        loop {
            let probe = self
                .http
                .get(format!("{}/healthcheck", self.base_url))
                .send()
                .await;
            match probe.and_then(|response| response.error_for_status()) {
                Ok(_) => return,
                Err(error) => {
                    warn!("backend not ready: {error}");
                    tokio::time::sleep(self.retry_interval).await;
                }
            }
        }
    }

    pub async fn mapbox_token(&self) -> Result<String, Error> {
        let token: MapboxToken = self
            .http
            .get(format!("{}/get_mapbox_token", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(token.mapbox_token)
    }

    pub async fn google_maps_key(&self) -> Result<String, Error> {
        let key: GoogleMapsKey = self
            .http
            .get(format!("{}/get_google_maps_key", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(key.key)
    }
}

impl Store for Backend {
    async fn markers(&self) -> Result<Vec<Stop>, Error> {
        let markers: Vec<Marker> = self
            .http
            .get(format!("{}/get_markers", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(markers.into_iter().map(Stop::from).collect())
    }

    async fn add_marker(&self, marker: &NewMarker) -> Result<(), Error> {
        self.http
            .post(format!("{}/add_marker", self.base_url))
            .json(marker)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_marker(&self, address: &str) -> Result<(), Error> {
        self.http
            .post(format!("{}/delete_marker", self.base_url))
            .json(&MarkerAddress {
                address: address.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
