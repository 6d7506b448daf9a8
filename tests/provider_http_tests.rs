// HTTP adapter tests against a throwaway local gateway.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use flub_agent::providers::{
    FlightProvider, FlightQuery, HttpFlightProvider, HttpSocialProvider, HttpWeatherProvider,
    Passengers, ProviderError, SocialProvider, WeatherProvider,
};
use serde_json::{Value, json};
use serial_test::serial;
use std::collections::HashMap;
use tokio::net::TcpListener;

async fn spawn_gateway(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn query() -> FlightQuery {
    FlightQuery {
        date: "2025-12-01".to_string(),
        from_airport: "EWR".to_string(),
        to_airport: "LAX".to_string(),
        passengers: Passengers {
            adults: 2,
            ..Passengers::default()
        },
    }
}

async fn flights(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let expected = [
        ("date", "2025-12-01"),
        ("from", "EWR"),
        ("to", "LAX"),
        ("adults", "2"),
        ("trip", "one-way"),
        ("seat", "economy"),
    ];
    if expected
        .iter()
        .any(|(key, value)| params.get(*key).map(String::as_str) != Some(*value))
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad params"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "current_price": "low",
            "flights": [
                {
                    "name": "JetBlue", "departure": "8:00 AM", "arrival": "11:45 AM",
                    "duration": "6 hr 45 min", "stops": 0, "price": "$200", "is_best": true
                },
                {
                    "name": "United", "departure": "9:00 AM", "arrival": "2:10 PM",
                    "duration": "8 hr 10 min", "stops": "1", "price": "$350"
                }
            ]
        })),
    )
}

#[tokio::test]
async fn flight_gateway_results_are_decoded() {
    let endpoint = spawn_gateway(Router::new().route("/flights", get(flights))).await;
    let provider = HttpFlightProvider::new(format!("{endpoint}/"));

    let results = provider.search(&query()).await.expect("search succeeds");
    assert_eq!(results.current_price.as_deref(), Some("low"));
    assert_eq!(results.flights.len(), 2);
    assert!(results.flights[0].is_best);
    assert_eq!(results.flights[1].stops, Some(1));
}

#[tokio::test]
async fn gateway_errors_are_classified() {
    let endpoint = spawn_gateway(
        Router::new()
            .route(
                "/flights",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "scraper crashed") }),
            )
            .route(
                "/limited/flights",
                get(|| async { StatusCode::TOO_MANY_REQUESTS }),
            ),
    )
    .await;

    let err = HttpFlightProvider::new(endpoint.clone())
        .search(&query())
        .await
        .expect_err("server error");
    assert!(matches!(
        err,
        ProviderError::Status { status: 500, ref body, .. } if body.contains("scraper crashed")
    ));

    let err = HttpFlightProvider::new(format!("{endpoint}/limited"))
        .search(&query())
        .await
        .expect_err("rate limited");
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[tokio::test]
#[serial]
async fn weather_lookup_sends_key_and_city() {
    let app = Router::new().route(
        "/current.json",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({
                "key_seen": params.get("key"),
                "location": {"name": params.get("q")},
                "current": {"temp_c": 12.5}
            }))
        }),
    );
    let endpoint = spawn_gateway(app).await;
    unsafe { std::env::set_var("FLUB_IT_WEATHER_KEY", "secret") };

    let payload = HttpWeatherProvider::new(endpoint, "FLUB_IT_WEATHER_KEY")
        .current("Paris")
        .await
        .expect("weather succeeds");
    assert_eq!(payload["key_seen"], "secret");
    assert_eq!(payload["location"]["name"], "Paris");

    unsafe { std::env::remove_var("FLUB_IT_WEATHER_KEY") };
}

#[tokio::test]
#[serial]
async fn social_username_is_sent_as_a_single_path_segment() {
    let app = Router::new()
        .route(
            "/2/users/by/username/{name}",
            get(|Path(name): Path<String>| async move {
                if name == "foo?user.fields=id" {
                    Json(json!({"data": {"id": "42", "name": "Foo", "username": name}}))
                } else {
                    Json(json!({}))
                }
            }),
        )
        .route(
            "/2/users/42/tweets",
            get(|| async { Json(json!({"data": []})) }),
        );
    let endpoint = spawn_gateway(app).await;
    unsafe { std::env::set_var("X_BEARER_TOKEN", "bearer") };

    let timeline = HttpSocialProvider::new(endpoint)
        .user_timeline("@foo?user.fields=id", 5)
        .await
        .expect("lookup reaches the user route");
    assert_eq!(timeline.user.username, "foo?user.fields=id");
    assert!(timeline.posts.is_empty());

    unsafe { std::env::remove_var("X_BEARER_TOKEN") };
}
