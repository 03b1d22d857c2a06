use std::sync::Arc;

use crate::{
    polyline::{self, LngLat},
    shared::{Distance, Duration, strip_tags},
    trip::Stop,
};

use super::{Error, models::RouteData};

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

/// The routed segment between two consecutive stops in optimized order.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub start: Arc<str>,
    pub end: Arc<str>,
    pub steps: Vec<Step>,
}

/// A computed route. Only valid for the exact stop set it was computed from;
/// `stops` holds the optimized visiting order with the first and last of the
/// submission pinned in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub geometry: Vec<LngLat>,
    pub legs: Vec<Leg>,
    pub distance: Distance,
    pub duration: Duration,
    pub stops: Vec<Stop>,
}

impl RouteResult {
    /// Rebuilds the optimized stop order from the service's interior
    /// permutation and zips its legs onto consecutive stop pairs. Expects at
    /// least two submitted stops.
    pub(crate) fn assemble(submitted: &[Stop], route: RouteData) -> Result<Self, Error> {
        let interior = &submitted[1..submitted.len() - 1];
        let mut stops = Vec::with_capacity(submitted.len());
        stops.push(submitted[0].clone());
        for &index in &route.waypoint_order {
            let stop = interior.get(index).ok_or(Error::WaypointOrder(index))?;
            stops.push(stop.clone());
        }
        stops.push(submitted[submitted.len() - 1].clone());

        if route.legs.len() + 1 != stops.len() {
            return Err(Error::LegMismatch(route.legs.len(), stops.len()));
        }

        let geometry = polyline::decode(&route.overview_polyline.points)?;
        let distance = route
            .legs
            .iter()
            .map(|leg| Distance::from_meters(leg.distance.value))
            .sum();
        let duration = route
            .legs
            .iter()
            .map(|leg| Duration::from_seconds(leg.duration.value as u32))
            .sum();
        let legs = route
            .legs
            .into_iter()
            .enumerate()
            .map(|(i, leg)| Leg {
                start: stops[i].address.clone(),
                end: stops[i + 1].address.clone(),
                steps: leg
                    .steps
                    .into_iter()
                    .map(|step| Step {
                        instruction: strip_tags(&step.html_instructions),
                        distance: step.distance.text,
                        duration: step.duration.text,
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            geometry,
            legs,
            distance,
            duration,
            stops,
        })
    }
}
