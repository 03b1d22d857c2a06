use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RouteData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteData {
    pub overview_polyline: OverviewPolyline,
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    #[serde(default)]
    pub legs: Vec<LegData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegData {
    pub distance: Quantity,
    pub duration: Quantity,
    #[serde(default)]
    pub steps: Vec<StepData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepData {
    pub html_instructions: String,
    pub distance: Quantity,
    pub duration: Quantity,
}

/// A scalar with its display form, e.g. `{"value": 1205, "text": "1.2 km"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quantity {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub text: String,
}
