use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
use serde_json::{Value, json};
use waypost::{
    directions::{Directions, Error, Provider},
    polyline,
    shared::{Coordinate, Distance, Duration},
    trip::Stop,
};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Clone, Default)]
struct ServiceLog {
    hits: Arc<AtomicUsize>,
    query: Arc<Mutex<Option<HashMap<String, String>>>>,
}

fn directions_service(body: Value, log: ServiceLog) -> Router {
    Router::new().route(
        "/directions",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let body = body.clone();
            let log = log.clone();
            async move {
                log.hits.fetch_add(1, Ordering::SeqCst);
                *log.query.lock().unwrap() = Some(params);
                Json(body)
            }
        }),
    )
}

fn stop(address: &str, lat: f64, lng: f64) -> Stop {
    Stop::new(
        address,
        Coordinate {
            latitude: lat,
            longitude: lng,
        },
    )
}

fn leg(meters: f64, seconds: f64, instruction: &str) -> Value {
    json!({
        "distance": {"value": meters, "text": format!("{meters} m")},
        "duration": {"value": seconds, "text": format!("{seconds} s")},
        "steps": [{
            "html_instructions": instruction,
            "distance": {"text": "0.5 km"},
            "duration": {"text": "2 mins"},
        }],
    })
}

#[tokio::test]
async fn optimize_permutes_interior_test() {
    let geometry = vec![[-79.38, 43.65], [-80.48, 43.45], [-79.87, 43.25], [-81.25, 42.98]];
    let body = json!({
        "routes": [{
            "overview_polyline": {"points": polyline::encode(&geometry)},
            "waypoint_order": [1, 0],
            "legs": [
                leg(1000.0, 600.0, "Head <b>south</b>"),
                leg(2000.0, 600.0, "Continue"),
                leg(3000.0, 600.0, "Arrive at <div>destination</div>"),
            ],
        }],
    });
    let log = ServiceLog::default();
    let base_url = serve(directions_service(body, log.clone())).await;

    let submitted = vec![
        stop("Toronto", 43.65, -79.38),
        stop("Hamilton", 43.25, -79.87),
        stop("Kitchener", 43.45, -80.48),
        stop("London", 42.98, -81.25),
    ];
    let route = Directions::new(base_url)
        .optimize(&submitted)
        .await
        .unwrap();

    // Origin and destination stay pinned, the interior is permuted.
    let order: Vec<_> = route.stops.iter().map(|s| s.address.clone()).collect();
    assert_eq!(&*order[0], "Toronto");
    assert_eq!(&*order[1], "Kitchener");
    assert_eq!(&*order[2], "Hamilton");
    assert_eq!(&*order[3], "London");

    assert_eq!(route.legs.len(), route.stops.len() - 1);
    assert_eq!(&*route.legs[0].start, "Toronto");
    assert_eq!(&*route.legs[0].end, "Kitchener");
    assert_eq!(&*route.legs[1].start, "Kitchener");
    assert_eq!(&*route.legs[1].end, "Hamilton");
    assert_eq!(&*route.legs[2].end, "London");

    assert_eq!(route.legs[0].steps[0].instruction, "Head south");
    assert_eq!(route.legs[2].steps[0].instruction, "Arrive at destination");
    assert_eq!(route.legs[0].steps[0].distance, "0.5 km");

    assert_eq!(route.distance, Distance::from_meters(6000.0));
    assert_eq!(route.duration, Duration::from_minutes(30));
    assert_eq!(route.geometry, geometry);

    let query = log.query.lock().unwrap().clone().unwrap();
    assert_eq!(query["origin"], "43.65,-79.38");
    assert_eq!(query["destination"], "42.98,-81.25");
    assert_eq!(query["waypoints"], "43.25,-79.87|43.45,-80.48");
}

#[tokio::test]
async fn optimize_single_interior_identity_test() {
    let geometry = vec![[-79.38, 43.65], [-79.87, 43.25], [-80.48, 43.45]];
    let body = json!({
        "routes": [{
            "overview_polyline": {"points": polyline::encode(&geometry)},
            "waypoint_order": [0],
            "legs": [leg(1000.0, 300.0, "Go"), leg(1000.0, 300.0, "Arrive")],
        }],
    });
    let base_url = serve(directions_service(body, ServiceLog::default())).await;

    let submitted = vec![
        stop("Toronto", 43.65, -79.38),
        stop("Hamilton", 43.25, -79.87),
        stop("Kitchener", 43.45, -80.48),
    ];
    let route = Directions::new(base_url)
        .optimize(&submitted)
        .await
        .unwrap();
    let order: Vec<_> = route.stops.iter().map(|s| s.address.clone()).collect();
    assert_eq!(&*order[1], "Hamilton");
    assert_eq!(route.legs.len(), 2)
}

#[tokio::test]
async fn optimize_needs_two_stops_test() {
    let log = ServiceLog::default();
    let base_url = serve(directions_service(json!({"routes": []}), log.clone())).await;

    let directions = Directions::new(base_url);
    let result = directions.optimize(&[stop("Toronto", 43.65, -79.38)]).await;
    assert!(matches!(result, Err(Error::NotEnoughStops)));
    let result = directions.optimize(&[]).await;
    assert!(matches!(result, Err(Error::NotEnoughStops)));
    // Short-circuited locally; the service never saw a request.
    assert_eq!(log.hits.load(Ordering::SeqCst), 0)
}

#[tokio::test]
async fn optimize_transport_failure_test() {
    let app = Router::new().route(
        "/directions",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = serve(app).await;

    let result = Directions::new(base_url)
        .optimize(&[stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)])
        .await;
    assert!(matches!(result, Err(Error::Transport(_))))
}

#[tokio::test]
async fn optimize_no_route_test() {
    let base_url = serve(directions_service(json!({"routes": []}), ServiceLog::default())).await;

    let result = Directions::new(base_url)
        .optimize(&[stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)])
        .await;
    assert!(matches!(result, Err(Error::NoRoute)))
}

#[tokio::test]
async fn optimize_corrupt_polyline_test() {
    let body = json!({
        "routes": [{
            "overview_polyline": {"points": "_p~iF"},
            "waypoint_order": [],
            "legs": [leg(1000.0, 300.0, "Go")],
        }],
    });
    let base_url = serve(directions_service(body, ServiceLog::default())).await;

    let result = Directions::new(base_url)
        .optimize(&[stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)])
        .await;
    assert!(matches!(result, Err(Error::Codec(_))))
}

#[tokio::test]
async fn optimize_waypoint_order_out_of_range_test() {
    let body = json!({
        "routes": [{
            "overview_polyline": {"points": polyline::encode(&[[1.0, 1.0]])},
            "waypoint_order": [5],
            "legs": [leg(1.0, 1.0, "Go"), leg(1.0, 1.0, "Arrive")],
        }],
    });
    let base_url = serve(directions_service(body, ServiceLog::default())).await;

    let result = Directions::new(base_url)
        .optimize(&[
            stop("A", 1.0, 1.0),
            stop("B", 2.0, 2.0),
            stop("C", 3.0, 3.0),
        ])
        .await;
    assert!(matches!(result, Err(Error::WaypointOrder(5))))
}

#[tokio::test]
async fn optimize_leg_count_mismatch_test() {
    let body = json!({
        "routes": [{
            "overview_polyline": {"points": polyline::encode(&[[1.0, 1.0]])},
            "waypoint_order": [],
            "legs": [leg(1.0, 1.0, "Go"), leg(1.0, 1.0, "Arrive")],
        }],
    });
    let base_url = serve(directions_service(body, ServiceLog::default())).await;

    let result = Directions::new(base_url)
        .optimize(&[stop("A", 1.0, 1.0), stop("B", 2.0, 2.0)])
        .await;
    assert!(matches!(result, Err(Error::LegMismatch(2, 2))))
}
