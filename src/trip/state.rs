use tracing::debug;

use crate::directions::{Leg, RouteResult};

use super::Stop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No stops.
    Empty,
    /// One stop, nothing to route.
    Single,
    /// Two or more stops but no usable route (optimization failed).
    Unrouted,
    /// Two or more stops with a valid route.
    Routed,
    /// A reconcile is in flight; the previous route is stale but still shown.
    Pending,
}

/// Stamp for one reconcile chain. Tickets are monotonic; a chain's result is
/// applied only if no newer chain has settled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The canonical trip: ordered stop list, current route and leg cursor.
/// All mutation flows through [`TripState::begin`]/[`TripState::apply`] so
/// overlapping reconciles settle in completion order and superseded results
/// are dropped on arrival.
#[derive(Debug, Default)]
pub struct TripState {
    stops: Vec<Stop>,
    route: Option<RouteResult>,
    cursor: usize,
    issued: u64,
    applied: u64,
    in_flight: u32,
}

impl TripState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Opens a reconcile chain. Every ticket must be settled exactly once,
    /// through [`TripState::apply`] or [`TripState::abandon`].
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.in_flight += 1;
        Ticket(self.issued)
    }

    /// Settles a chain with the stop list it observed and the route computed
    /// from it. Returns false when the ticket was superseded by a newer
    /// applied one; the result is dropped without touching the trip.
    pub fn apply(&mut self, ticket: Ticket, stops: Vec<Stop>, route: Option<RouteResult>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.0 <= self.applied {
            debug!("dropping superseded reconcile result {:?}", ticket);
            return false;
        }
        self.applied = ticket.0;
        match route {
            Some(route) => {
                self.stops = route.stops.clone();
                self.route = Some(route);
            }
            None => {
                self.stops = stops;
                self.route = None;
            }
        }
        self.cursor = 0;
        true
    }

    /// Settles a chain that never completed (transport failure mid-chain).
    pub fn abandon(&mut self, _ticket: Ticket) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight > 0 && self.stops.len() >= 2 {
            return Phase::Pending;
        }
        match (self.stops.len(), &self.route) {
            (0, _) => Phase::Empty,
            (1, _) => Phase::Single,
            (_, Some(_)) => Phase::Routed,
            (_, None) => Phase::Unrouted,
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn contains(&self, address: &str) -> bool {
        self.stops.iter().any(|stop| &*stop.address == address)
    }

    pub fn current_leg(&self) -> Option<&Leg> {
        self.route.as_ref()?.legs.get(self.cursor)
    }

    /// Moves the cursor to the next leg, clamped to the last one.
    pub fn advance_leg(&mut self) -> usize {
        if let Some(route) = &self.route
            && self.cursor + 1 < route.legs.len()
        {
            self.cursor += 1;
        }
        self.cursor
    }

    /// Moves the named stop to the front of the list, keeping the rest in
    /// order, and rewinds the cursor. False when the address is unknown.
    pub fn promote_start(&mut self, address: &str) -> bool {
        let Some(position) = self.stops.iter().position(|stop| &*stop.address == address) else {
            return false;
        };
        let stop = self.stops.remove(position);
        self.stops.insert(0, stop);
        self.cursor = 0;
        true
    }
}

#[cfg(test)]
fn stop(address: &str, latitude: f64, longitude: f64) -> Stop {
    Stop::new(address, (latitude, longitude).into())
}

#[cfg(test)]
fn route_between(stops: &[Stop]) -> RouteResult {
    let legs = stops
        .windows(2)
        .map(|pair| Leg {
            start: pair[0].address.clone(),
            end: pair[1].address.clone(),
            steps: vec![],
        })
        .collect();
    RouteResult {
        geometry: stops.iter().map(|stop| stop.coordinate.lng_lat()).collect(),
        legs,
        distance: Default::default(),
        duration: Default::default(),
        stops: stops.to_vec(),
    }
}

#[test]
fn stale_ticket_test() {
    let mut trip = TripState::new();
    let first = trip.begin();
    let second = trip.begin();

    let newer = vec![stop("A", 1.0, 1.0)];
    assert!(trip.apply(second, newer, None));
    assert!(!trip.apply(first, vec![stop("B", 2.0, 2.0)], None));
    assert_eq!(trip.stops().len(), 1);
    assert_eq!(&*trip.stops()[0].address, "A")
}

#[test]
fn in_order_completion_test() {
    let mut trip = TripState::new();
    let first = trip.begin();
    let second = trip.begin();

    assert!(trip.apply(first, vec![stop("A", 1.0, 1.0)], None));
    assert!(trip.apply(second, vec![stop("B", 2.0, 2.0)], None));
    assert_eq!(&*trip.stops()[0].address, "B")
}

#[test]
fn apply_prefers_optimized_order_test() {
    let mut trip = TripState::new();
    let fetched = vec![stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)];
    let optimized = vec![fetched[0].clone(), fetched[1].clone()];
    let ticket = trip.begin();
    trip.apply(ticket, fetched, Some(route_between(&optimized)));
    assert_eq!(trip.phase(), Phase::Routed);
    assert_eq!(trip.route().unwrap().legs.len(), 1)
}

#[test]
fn advance_leg_clamp_test() {
    let mut trip = TripState::new();
    let stops = vec![
        stop("A", 1.0, 1.0),
        stop("B", 2.0, 2.0),
        stop("C", 3.0, 3.0),
    ];
    let ticket = trip.begin();
    trip.apply(ticket, stops.clone(), Some(route_between(&stops)));

    assert_eq!(trip.advance_leg(), 1);
    assert_eq!(trip.advance_leg(), 1);
    assert_eq!(trip.current_leg().unwrap().start, stops[1].address)
}

#[test]
fn advance_leg_without_route_test() {
    let mut trip = TripState::new();
    assert_eq!(trip.advance_leg(), 0)
}

#[test]
fn promote_start_test() {
    let mut trip = TripState::new();
    let stops = vec![
        stop("A", 1.0, 1.0),
        stop("B", 2.0, 2.0),
        stop("C", 3.0, 3.0),
    ];
    let ticket = trip.begin();
    trip.apply(ticket, stops.clone(), Some(route_between(&stops)));
    trip.advance_leg();

    assert!(trip.promote_start("B"));
    let order: Vec<_> = trip.stops().iter().map(|s| s.address.clone()).collect();
    assert_eq!(&*order[0], "B");
    assert_eq!(&*order[1], "A");
    assert_eq!(&*order[2], "C");
    assert_eq!(trip.cursor(), 0)
}

#[test]
fn promote_start_unknown_test() {
    let mut trip = TripState::new();
    assert!(!trip.promote_start("Nowhere"))
}

#[test]
fn phase_transitions_test() {
    let mut trip = TripState::new();
    assert_eq!(trip.phase(), Phase::Empty);

    let ticket = trip.begin();
    trip.apply(ticket, vec![stop("A", 1.0, 1.0)], None);
    assert_eq!(trip.phase(), Phase::Single);

    let stops = vec![stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)];
    let ticket = trip.begin();
    trip.apply(ticket, stops.clone(), Some(route_between(&stops)));
    assert_eq!(trip.phase(), Phase::Routed);

    let pending = trip.begin();
    assert_eq!(trip.phase(), Phase::Pending);
    trip.abandon(pending);
    assert_eq!(trip.phase(), Phase::Routed)
}
