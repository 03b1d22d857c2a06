use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use serde_json::json;
use waypost::map::{Geocoder, ReverseGeocode};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn reverse_geocode_first_feature_test() {
    let seen: Arc<Mutex<Option<(String, HashMap<String, String>)>>> = Arc::default();
    let app = Router::new().route(
        "/{coords}",
        get({
            let seen = seen.clone();
            move |Path(coords): Path<String>, Query(params): Query<HashMap<String, String>>| {
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = Some((coords, params));
                    Json(json!({
                        "features": [
                            {"place_name": "100 Queen St W, Toronto"},
                            {"place_name": "Toronto"},
                        ],
                    }))
                }
            }
        }),
    );
    let base_url = serve(app).await;

    let geocoder = Geocoder::new("pk.test-token").with_base_url(base_url);
    let address = geocoder.reverse(-79.384, 43.653).await;
    assert_eq!(address.as_deref(), Some("100 Queen St W, Toronto"));

    let (coords, params) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(coords, "-79.384,43.653.json");
    assert_eq!(params["access_token"], "pk.test-token")
}

#[tokio::test]
async fn reverse_geocode_no_features_test() {
    let app = Router::new().route(
        "/{coords}",
        get(|| async { Json(json!({"features": []})) }),
    );
    let base_url = serve(app).await;

    let geocoder = Geocoder::new("pk.test-token").with_base_url(base_url);
    assert_eq!(geocoder.reverse(0.0, 0.0).await, None)
}

#[tokio::test]
async fn reverse_geocode_provider_error_test() {
    let app = Router::new().route(
        "/{coords}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = serve(app).await;

    let geocoder = Geocoder::new("pk.test-token").with_base_url(base_url);
    assert_eq!(geocoder.reverse(-79.384, 43.653).await, None)
}
