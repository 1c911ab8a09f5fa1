//! Router round trips without a network: compile, suggest and health
//! endpoints against an in-memory state.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::card_names::CardNamesCache;
use crate::commanders::{CommanderDb, SharedCommanderDb};
use crate::scryfall::SearchClient;
use crate::web::{router, SharedState};

fn test_state() -> Arc<SharedState> {
    Arc::new(SharedState {
        commanders: SharedCommanderDb::new(CommanderDb::from_entries(&[
            ("atraxa", "WUBG"),
            ("chulane", "GWU"),
        ])),
        card_names: Arc::new(RwLock::new(CardNamesCache::from_names(&[
            "Counterspell",
            "Countersquall",
            "Abrupt Decay",
        ]))),
        // port 9 (discard): handlers under test never reach the network
        client: SearchClient::new("http://127.0.0.1:9", Duration::from_secs(1)),
    })
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(test_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[test]
fn test_compile_route() {
    block_on(async {
        let (status, body) = get_json("/api/compile?prompt=1%20mana%20counterspell").await;
        assert_eq!(status, StatusCode::OK);
        let query = body["query"].as_str().expect("query string");
        assert!(query.contains("cmc=1"));
        assert!(query.contains(r#"o:"counter target""#));
        assert_eq!(body["filters"]["cmc"]["value"], 1);
    });
}

#[test]
fn test_compile_route_resolves_commanders() {
    block_on(async {
        let (status, body) = get_json("/api/compile?prompt=removal%20for%20atraxa").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["query"].as_str().unwrap().contains("color<=WUBG"));
    });
}

#[test]
fn test_compile_route_rejects_empty_prompt() {
    block_on(async {
        let (status, body) = get_json("/api/compile?prompt=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("prompt"));
    });
}

#[test]
fn test_suggest_route() {
    block_on(async {
        let (status, body) = get_json("/api/suggest?q=counter&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"], serde_json::json!(["Counterspell"]));
        assert_eq!(body["exact"], false);
    });
}

#[test]
fn test_suggest_route_reports_exact_names() {
    block_on(async {
        let (status, body) = get_json("/api/suggest?q=Abrupt%20Decay").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exact"], true);
    });
}

#[test]
fn test_health_route() {
    block_on(async {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["commanders_loaded"], true);
        assert_eq!(body["card_names_loaded"], true);
        assert_eq!(body["card_name_count"], 3);
    });
}
