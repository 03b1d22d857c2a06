use thiserror::Error;
use tracing::warn;

use crate::{
    backend::{self, NewMarker, Store},
    directions::{self, Provider},
};

mod state;
mod stop;
pub use state::*;
pub use stop::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("marker store error: {0}")]
    Store(#[from] backend::Error),
}

/// What came of a [`Planner::add_stop`] call once the route settled.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added,
    /// The store accepted the stop but the directions service could not route
    /// through it, so it was removed again.
    Rejected { address: String, reason: String },
}

/// Mediates every trip mutation: persists it to the marker store, re-fetches
/// the canonical list, re-optimizes and applies the result under a ticket so
/// overlapping operations cannot clobber each other.
pub struct Planner<P, S> {
    directions: P,
    store: S,
    trip: TripState,
}

impl<P: Provider, S: Store> Planner<P, S> {
    pub fn new(directions: P, store: S) -> Self {
        Self {
            directions,
            store,
            trip: TripState::new(),
        }
    }

    pub fn trip(&self) -> &TripState {
        &self.trip
    }

    pub fn advance_leg(&mut self) -> usize {
        self.trip.advance_leg()
    }

    /// Refetches the canonical stop list and recomputes the route.
    pub async fn load(&mut self) -> Result<Phase, Error> {
        let ticket = self.trip.begin();
        let stops = self.fetch_stops(ticket).await?;
        Ok(self.settle(ticket, stops).await)
    }

    /// Persists a new stop and reconciles. A stop the directions service
    /// cannot route through is removed from the store again and reported
    /// back as rejected.
    pub async fn add_stop(&mut self, marker: NewMarker) -> Result<AddOutcome, Error> {
        let ticket = self.trip.begin();
        if let Err(error) = self.store.add_marker(&marker).await {
            self.trip.abandon(ticket);
            return Err(error.into());
        }
        let stops = self.fetch_stops(ticket).await?;
        if stops.len() < 2 {
            self.trip.apply(ticket, stops, None);
            return Ok(AddOutcome::Added);
        }
        match self.directions.optimize(&stops).await {
            Ok(route) => {
                self.trip.apply(ticket, stops, Some(route));
                Ok(AddOutcome::Added)
            }
            Err(error @ directions::Error::NoRoute) => {
                warn!("no route through {}, removing it again", marker.address);
                let reason = error.to_string();
                if let Err(error) = self.store.delete_marker(&marker.address).await {
                    self.trip.abandon(ticket);
                    return Err(error.into());
                }
                let stops = self.fetch_stops(ticket).await?;
                self.settle(ticket, stops).await;
                Ok(AddOutcome::Rejected {
                    address: marker.address,
                    reason,
                })
            }
            Err(error) => {
                warn!("route optimization failed: {error}");
                self.trip.apply(ticket, stops, None);
                Ok(AddOutcome::Added)
            }
        }
    }

    /// Deletes a stop by address. Addresses not in the trip are a local
    /// no-op; the store is not consulted.
    pub async fn delete_stop(&mut self, address: &str) -> Result<Phase, Error> {
        if !self.trip.contains(address) {
            return Ok(self.trip.phase());
        }
        let ticket = self.trip.begin();
        if let Err(error) = self.store.delete_marker(address).await {
            self.trip.abandon(ticket);
            return Err(error.into());
        }
        let stops = self.fetch_stops(ticket).await?;
        Ok(self.settle(ticket, stops).await)
    }

    /// Makes the named stop the trip's origin and re-optimizes with the
    /// reordered list as the new submission order. Nothing is persisted, so
    /// the store is not re-fetched. If optimization fails the reordered list
    /// stays, with the route cleared.
    pub async fn reorder_by_start(&mut self, address: &str) -> Phase {
        if !self.trip.promote_start(address) {
            return self.trip.phase();
        }
        let ticket = self.trip.begin();
        let stops = self.trip.stops().to_vec();
        self.settle(ticket, stops).await
    }

    async fn fetch_stops(&mut self, ticket: Ticket) -> Result<Vec<Stop>, Error> {
        match self.store.markers().await {
            Ok(stops) => Ok(stops),
            Err(error) => {
                self.trip.abandon(ticket);
                Err(error.into())
            }
        }
    }

    /// Completes a reconcile chain: optimizes when there is anything to
    /// route and applies the outcome under the chain's ticket.
    async fn settle(&mut self, ticket: Ticket, stops: Vec<Stop>) -> Phase {
        if stops.len() < 2 {
            self.trip.apply(ticket, stops, None);
            return self.trip.phase();
        }
        match self.directions.optimize(&stops).await {
            Ok(route) => {
                self.trip.apply(ticket, stops, Some(route));
            }
            Err(error) => {
                warn!("route optimization failed: {error}");
                self.trip.apply(ticket, stops, None);
            }
        }
        self.trip.phase()
    }
}
