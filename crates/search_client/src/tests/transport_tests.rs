use super::*;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::error::ErrorCode;
use tokio::{net::TcpListener, sync::Mutex};

use crate::query::InputState;

#[derive(Clone)]
enum Reply {
    Json(StatusCode, serde_json::Value),
    Raw(StatusCode, &'static str),
    Stall(Duration),
}

#[derive(Clone, Debug)]
struct SeenRequest {
    authorization: Option<String>,
    params: HashMap<String, String>,
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn handle_search(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.seen.lock().await.push(SeenRequest {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        params,
    });

    match state.reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Raw(status, body) => (status, body).into_response(),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

async fn spawn_search_server(reply: Reply) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        reply,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/search", get(handle_search))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), seen)
}

fn transport_for(base: &str) -> HttpSearchTransport {
    let config = ClientConfig::default()
        .with_api_base(base)
        .with_secret("test-secret");
    HttpSearchTransport::new(&config).expect("transport")
}

fn apple_params() -> SearchParams {
    SearchParams::build(&InputState::with_query("apple"), false).expect("params")
}

#[tokio::test]
async fn sends_authenticated_query_and_parses_results() {
    let (base, seen) = spawn_search_server(Reply::Json(
        StatusCode::OK,
        json!({
            "keyword": "apple",
            "city": "",
            "page": 1,
            "page_size": 10,
            "total_estimated_pages": 5,
            "items": [{"title": "Apple unveils", "website": "guardian", "url": "https://example.com/1"}]
        }),
    ))
    .await;

    let response = transport_for(&base)
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect("search");

    assert_eq!(response.items.len(), 1);
    assert_eq!(response.known_total_pages(), Some(5));
    assert_eq!(response.items[0].display_source(), "guardian");

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer test-secret"));
    assert_eq!(seen[0].params.get("query").map(String::as_str), Some("apple"));
    assert_eq!(seen[0].params.get("page").map(String::as_str), Some("1"));
    assert_eq!(seen[0].params.get("page_size").map(String::as_str), Some("10"));
    assert_eq!(seen[0].params.get("offline").map(String::as_str), Some("0"));
    assert!(!seen[0].params.contains_key("city"));
}

#[tokio::test]
async fn non_success_status_maps_to_http_error_with_code() {
    let (base, _seen) = spawn_search_server(Reply::Json(
        StatusCode::UNAUTHORIZED,
        json!({"error": "unauthorized"}),
    ))
    .await;

    let err = transport_for(&base)
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect_err("must fail");

    assert_eq!(
        err,
        SearchError::Http {
            status: 401,
            api: Some(ApiError::new(ErrorCode::Unauthorized)),
        }
    );
    assert_eq!(err.to_string(), "HTTP 401: unauthorized");
}

#[tokio::test]
async fn non_json_error_body_still_reports_status() {
    let (base, _seen) =
        spawn_search_server(Reply::Raw(StatusCode::BAD_GATEWAY, "upstream exploded")).await;

    let err = transport_for(&base)
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect_err("must fail");
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let (base, _seen) = spawn_search_server(Reply::Raw(StatusCode::OK, "{\"items\": 12}")).await;

    let err = transport_for(&base)
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect_err("must fail");
    assert!(matches!(err, SearchError::Decode(_)), "unexpected: {err:?}");
    assert!(err.to_string().contains("malformed search response"), "{err}");
}

#[tokio::test]
async fn cancellation_abandons_the_exchange() {
    let (base, seen) = spawn_search_server(Reply::Stall(Duration::from_secs(30))).await;
    let transport = transport_for(&base);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        transport.search(&apple_params(), cancel),
    )
    .await
    .expect("cancel must not wait for the server")
    .expect_err("must be cancelled");
    assert_eq!(err, SearchError::Cancelled);
    assert_eq!(seen.lock().await.len(), 1);
}

#[tokio::test]
async fn hung_request_times_out() {
    let (base, _seen) = spawn_search_server(Reply::Stall(Duration::from_secs(30))).await;
    let config = ClientConfig {
        request_timeout: Some(Duration::from_millis(100)),
        ..ClientConfig::default().with_api_base(&base)
    };
    let transport = HttpSearchTransport::new(&config).expect("transport");

    let err = transport
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect_err("must time out");
    assert_eq!(err, SearchError::Timeout);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport_for(&format!("http://{addr}"))
        .search(&apple_params(), CancellationToken::new())
        .await
        .expect_err("must fail");
    assert!(matches!(err, SearchError::Transport(_)), "unexpected: {err:?}");
}
