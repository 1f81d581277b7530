//! In-process mock of the partner API for tests

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use chronogolf_auth::Authenticator;
use common::Secret;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::client::ApiClient;

/// A resource request as seen by the mock server.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

type Responder = dyn Fn(&Recorded, usize) -> (StatusCode, Value) + Send + Sync;

pub(crate) struct MockApi {
    pub base_url: String,
    token_calls: Arc<AtomicUsize>,
    reject_tokens: Arc<AtomicBool>,
    delay_ms: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn reject_tokens(&self) {
        self.reject_tokens.store(true, Ordering::SeqCst);
    }

    pub fn delay_responses(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

fn header_value(request: &Request<Body>, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Start a mock API. The token endpoint issues `at_1`, `at_2`, ... valid for
/// an hour; every other request is recorded and answered by `respond`, which
/// receives the request and its zero-based index. A `Value::Null` response
/// body is sent as an empty body.
pub(crate) async fn start_mock_api<F>(respond: F) -> MockApi
where
    F: Fn(&Recorded, usize) -> (StatusCode, Value) + Send + Sync + 'static,
{
    let token_calls = Arc::new(AtomicUsize::new(0));
    let reject_tokens = Arc::new(AtomicBool::new(false));
    let delay_ms = Arc::new(AtomicU64::new(0));
    let requests: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));
    let respond: Arc<Responder> = Arc::new(respond);

    let token_counter = token_calls.clone();
    let reject = reject_tokens.clone();
    let token_route = post(move || {
        let token_counter = token_counter.clone();
        let reject = reject.clone();
        async move {
            let n = token_counter.fetch_add(1, Ordering::SeqCst) + 1;
            if reject.load(Ordering::SeqCst) {
                return (
                    StatusCode::UNAUTHORIZED,
                    axum::Json(serde_json::json!({"error": "invalid_client"})),
                )
                    .into_response();
            }
            axum::Json(serde_json::json!({
                "access_token": format!("at_{n}"),
                "token_type": "Bearer",
                "expires_in": 3600,
            }))
            .into_response()
        }
    });

    let recorded = requests.clone();
    let delay = delay_ms.clone();
    let app = axum::Router::new()
        .route("/oauth/token", token_route)
        .fallback(move |request: Request<Body>| {
            let recorded = recorded.clone();
            let respond = respond.clone();
            let delay = delay.clone();
            async move {
                let entry = Recorded {
                    method: request.method().to_string(),
                    path: request.uri().path().to_string(),
                    query: request.uri().query().unwrap_or("").to_string(),
                    authorization: header_value(&request, header::AUTHORIZATION),
                    content_type: header_value(&request, header::CONTENT_TYPE),
                    accept: header_value(&request, header::ACCEPT),
                    body: String::new(),
                };
                let bytes = axum::body::to_bytes(request.into_body(), 1024 * 1024)
                    .await
                    .unwrap();
                let entry = Recorded {
                    body: String::from_utf8_lossy(&bytes).to_string(),
                    ..entry
                };

                let index = {
                    let mut all = recorded.lock().unwrap();
                    all.push(entry.clone());
                    all.len() - 1
                };

                let wait = delay.load(Ordering::SeqCst);
                if wait > 0 {
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                }

                let (status, body) = respond(&entry, index);
                let body = if body.is_null() {
                    String::new()
                } else {
                    body.to_string()
                };
                let response: Response = (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response();
                response
            }
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}"),
        token_calls,
        reject_tokens,
        delay_ms,
        requests,
    }
}

/// An `ApiClient` whose authenticator and resource base both point at `mock`.
pub(crate) fn client_for(mock: &MockApi) -> ApiClient {
    let http = reqwest::Client::new();
    let auth = Authenticator::new(
        http.clone(),
        &mock.base_url,
        "test-client-id",
        Secret::new("test-client-secret".into()),
    )
    .with_timeout(Duration::from_secs(5));
    ApiClient::new(http, mock.base_url.clone(), Arc::new(auth))
        .with_timeout(Duration::from_secs(5))
}
