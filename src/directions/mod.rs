use std::sync::Arc;

use thiserror::Error;

use crate::{polyline, trip::Stop};

mod models;
mod route;
pub use models::*;
pub use route::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("at least two stops are needed to route")]
    NotEnoughStops,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no route through the submitted stops")]
    NoRoute,
    #[error("corrupt route geometry: {0}")]
    Codec(#[from] polyline::Error),
    #[error("waypoint order index {0} is out of range")]
    WaypointOrder(usize),
    #[error("{0} legs do not fit {1} stops")]
    LegMismatch(usize, usize),
}

/// The route-optimization capability: an ordered stop list in, an optimized
/// route out. The first and last stop are pinned as origin and destination;
/// the interior may come back in any order.
#[allow(async_fn_in_trait)]
pub trait Provider {
    async fn optimize(&self, stops: &[Stop]) -> Result<RouteResult, Error>;
}

/// HTTP client for the remote directions service.
#[derive(Debug, Clone)]
pub struct Directions {
    base_url: Arc<str>,
    http: reqwest::Client,
}

impl Directions {
    pub fn new(base_url: impl Into<Arc<str>>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }
}

impl Provider for Directions {
    async fn optimize(&self, stops: &[Stop]) -> Result<RouteResult, Error> {
        if stops.len() < 2 {
            return Err(Error::NotEnoughStops);
        }
        let origin = stops[0].coordinate.to_string();
        let destination = stops[stops.len() - 1].coordinate.to_string();
        let waypoints = stops[1..stops.len() - 1]
            .iter()
            .map(|stop| stop.coordinate.to_string())
            .collect::<Vec<_>>()
            .join("|");

        let response: DirectionsResponse = self
            .http
            .get(format!("{}/directions", self.base_url))
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("waypoints", waypoints),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let route = response.routes.into_iter().next().ok_or(Error::NoRoute)?;
        RouteResult::assemble(stops, route)
    }
}
