use std::sync::Arc;

use tracing::debug;

use crate::{polyline::LngLat, trip::TripState};

mod geocode;
pub use geocode::*;

/// Handle for a marker primitive the drawing surface created.
pub type MarkerId = u64;

const STOP_CLICK_ZOOM: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTone {
    /// A regular trip stop.
    Stop,
    /// The stop the current leg is heading to.
    Current,
    /// The transient map-click probe.
    Probe,
}

/// The drawing-surface capability the view renders onto. Implementations
/// wrap whatever map library is in use; handles returned by
/// [`Canvas::place_marker`] are opaque to the view.
pub trait Canvas {
    fn place_marker(&mut self, at: LngLat, label: &str, tone: MarkerTone) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn draw_route(&mut self, line: &[LngLat]);
    fn clear_route(&mut self);
    fn fly_to(&mut self, center: LngLat, zoom: f64);
    fn open_popup(&mut self, id: MarkerId);
    fn close_popups(&mut self);
}

/// User interaction reported upward by the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    StopClicked(String),
    BackgroundClicked { lng: f64, lat: f64 },
}

/// A transient probe dropped by a background click. Not part of the trip;
/// the next click replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporaryLocation {
    pub lng: f64,
    pub lat: f64,
    pub address: Option<String>,
}

/// Mirrors the trip onto a drawing surface and turns surface events into
/// probes. Renders only; never mutates the trip.
pub struct MapView<C> {
    canvas: C,
    drawn: Vec<(Arc<str>, MarkerId)>,
    route_drawn: bool,
    probe: Option<MarkerId>,
}

impl<C: Canvas> MapView<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            drawn: Vec::new(),
            route_drawn: false,
            probe: None,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Reconciles drawn primitives with the trip. Previously drawn stop
    /// markers are disposed before their replacements are created, so the
    /// surface never accumulates orphaned handles.
    pub fn sync(&mut self, trip: &TripState) {
        for (_, id) in self.drawn.drain(..) {
            self.canvas.remove_marker(id);
        }

        let current = trip
            .route()
            .and_then(|route| route.stops.get(trip.cursor() + 1))
            .map(|stop| stop.address.clone());
        for stop in trip.stops() {
            let tone = if Some(&stop.address) == current.as_ref() {
                MarkerTone::Current
            } else {
                MarkerTone::Stop
            };
            let id = self
                .canvas
                .place_marker(stop.coordinate.lng_lat(), &stop.address, tone);
            self.drawn.push((stop.address.clone(), id));
        }

        match trip.route() {
            Some(route) => {
                self.canvas.draw_route(&route.geometry);
                self.route_drawn = true;
            }
            None if self.route_drawn => {
                self.canvas.clear_route();
                self.route_drawn = false;
            }
            None => {}
        }
    }

    /// Handles a surface event. A background click resolves to a
    /// [`TemporaryLocation`] which is returned upward; the trip itself is
    /// never touched from here.
    pub async fn handle<G: ReverseGeocode>(
        &mut self,
        event: MapEvent,
        trip: &TripState,
        geocoder: &G,
    ) -> Option<TemporaryLocation> {
        match event {
            MapEvent::BackgroundClicked { lng, lat } => {
                let address = geocoder.reverse(lng, lat).await;
                let location = TemporaryLocation { lng, lat, address };
                self.clear_probe();
                let label = location.address.as_deref().unwrap_or("Unknown address");
                let id = self.canvas.place_marker([lng, lat], label, MarkerTone::Probe);
                self.probe = Some(id);
                Some(location)
            }
            MapEvent::StopClicked(address) => {
                self.canvas.close_popups();
                self.clear_probe();
                let Some(stop) = trip.stops().iter().find(|stop| *stop.address == address) else {
                    debug!("click on unknown marker {address}");
                    return None;
                };
                self.canvas.fly_to(stop.coordinate.lng_lat(), STOP_CLICK_ZOOM);
                if let Some((_, id)) = self.drawn.iter().find(|(drawn, _)| **drawn == *address) {
                    self.canvas.open_popup(*id);
                }
                None
            }
        }
    }

    fn clear_probe(&mut self) {
        if let Some(id) = self.probe.take() {
            self.canvas.remove_marker(id);
        }
    }
}
