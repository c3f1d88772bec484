//! Integration test harness for the Prana site.
//!
//! Every remote the site talks to (content and payment backend, widget script
//! host, forms endpoint) is replaced by one stub server. The site itself runs
//! on a real listener and is driven with a cookie-keeping HTTP client, so
//! session state carries across requests the way it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p prana-integration-tests
//! ```
//!
//! Nothing outside `127.0.0.1` is contacted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use prana_site::catalog::Catalog;
use prana_site::config::{BackendConfig, FormsConfig, PaymentConfig, SiteConfig};
use prana_site::state::AppState;

/// Body of the stub widget script.
pub const WIDGET_SCRIPT: &str = "window.Razorpay = function (options) { this.options = options; };";

/// Public key the stub backend hands out.
pub const TEST_KEY: &str = "rzp_test_1DP5mmOlF5G5ag";

/// Id of every order the stub backend creates.
pub const TEST_ORDER_ID: &str = "order_IluGWxBm9U8zJ8";

/// Path the stub forms endpoint accepts submissions on.
pub const FORMS_PATH: &str = "/f/intake";

/// An address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// How the stub remotes answer.
#[derive(Debug, Clone)]
pub struct StubBehavior {
    /// `success` flag of `create-order`.
    pub order_success: bool,
    /// `success` flag of `verify-payment`.
    pub verify_success: bool,
    /// Status of `get-blogs`; anything but 200 returns a plain-text error.
    pub blogs_status: StatusCode,
    /// Status of the widget script host.
    pub script_status: StatusCode,
    /// Status of the forms endpoint.
    pub forms_status: StatusCode,
    /// Posts served by `get-blogs` and `get-blog`.
    pub posts: Vec<Value>,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            order_success: true,
            verify_success: true,
            blogs_status: StatusCode::OK,
            script_status: StatusCode::OK,
            forms_status: StatusCode::OK,
            posts: Vec::new(),
        }
    }
}

/// Paths (with query) the stub received, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    fn push(&self, entry: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Every request so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many requests hit `path`, ignoring query strings.
    #[must_use]
    pub fn count(&self, path: &str) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.split('?').next() == Some(path))
            .count()
    }

    /// Position of the first request to `path`, ignoring query strings.
    #[must_use]
    pub fn position(&self, path: &str) -> Option<usize> {
        self.entries()
            .iter()
            .position(|entry| entry.split('?').next() == Some(path))
    }
}

#[derive(Clone)]
struct StubState {
    behavior: Arc<StubBehavior>,
}

/// A running stub remote.
pub struct Stub {
    /// Base URL, without a trailing slash.
    pub url: String,
    /// What it has been asked.
    pub log: RequestLog,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl Stub {
    /// Stop the stub so that every later call to it fails to connect.
    ///
    /// Idle keep-alive connections are closed and the listener is released
    /// before this returns.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(server) = self.server.take() {
            let _ = server.await;
        }
    }
}

/// Start a stub remote.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_stub(behavior: StubBehavior) -> Stub {
    let log = RequestLog::default();
    let state = StubState {
        behavior: Arc::new(behavior),
    };

    let router = Router::new()
        .route("/api/v1/create-order", post(create_order))
        .route("/api/v1/get-key", get(get_key))
        .route("/api/v1/verify-payment", post(verify_payment))
        .route("/api/v1/get-blogs", get(get_blogs))
        .route("/api/v1/get-blog/{id}", get(get_blog))
        .route("/checkout.js", get(widget_script))
        .route(FORMS_PATH, post(submit_form))
        .layer(middleware::from_fn_with_state(log.clone(), record))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    let (shutdown, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stopped.await;
            })
            .await;
    });

    Stub {
        url: format!("http://{addr}"),
        log,
        shutdown: Some(shutdown),
        server: Some(server),
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let entry = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
    log.push(entry);
    next.run(request).await
}

async fn create_order(State(stub): State<StubState>, Json(body): Json<Value>) -> Json<Value> {
    if !stub.behavior.order_success {
        return Json(json!({ "success": false, "message": "Order creation failed" }));
    }

    let rupees = body["amount"].as_u64().unwrap_or_default();
    Json(json!({
        "success": true,
        "order": {
            "id": TEST_ORDER_ID,
            "entity": "order",
            "amount": rupees * 100,
            "currency": "INR",
            "status": "created"
        }
    }))
}

async fn get_key() -> Json<Value> {
    Json(json!({ "key": TEST_KEY }))
}

async fn verify_payment(State(stub): State<StubState>) -> Json<Value> {
    if stub.behavior.verify_success {
        Json(json!({ "success": true, "message": "Payment verified successfully" }))
    } else {
        Json(json!({ "success": false, "message": "Invalid signature" }))
    }
}

async fn get_blogs(State(stub): State<StubState>) -> Response {
    if stub.behavior.blogs_status != StatusCode::OK {
        return (stub.behavior.blogs_status, "internal error").into_response();
    }
    Json(json!({ "success": true, "data": stub.behavior.posts })).into_response()
}

async fn get_blog(State(stub): State<StubState>, Path(id): Path<String>) -> Response {
    let found = stub
        .behavior
        .posts
        .iter()
        .find(|post| post["id"].as_str() == Some(id.as_str()));

    match found {
        Some(post) => Json(json!({ "success": true, "data": post })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Blog not found" })),
        )
            .into_response(),
    }
}

async fn widget_script(State(stub): State<StubState>) -> Response {
    if stub.behavior.script_status == StatusCode::OK {
        WIDGET_SCRIPT.into_response()
    } else {
        stub.behavior.script_status.into_response()
    }
}

async fn submit_form(State(stub): State<StubState>) -> Response {
    (stub.behavior.forms_status, Json(json!({ "ok": true }))).into_response()
}

/// A blog post as the backend returns it.
#[must_use]
pub fn post_json(id: &str, title: &str, small_description: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "smallDescription": small_description,
        "mainDescription": format!("<p>{title} in depth.</p>"),
        "authorName": "Karuna",
        "estimateReadTime": 5,
        "category": "wellness",
        "tags": ["wellness"],
        "blogImage": null,
        "createdAt": "2025-01-15T09:00:00.000Z"
    })
}

/// Site configuration with every remote pointed at `remote`.
#[must_use]
pub fn site_config(remote: &str) -> SiteConfig {
    SiteConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        backend: BackendConfig {
            base_url: remote.to_string(),
            blog_cache_ttl: Duration::ZERO,
        },
        forms: FormsConfig {
            endpoint: format!("{remote}{FORMS_PATH}"),
        },
        payment: PaymentConfig {
            sdk_url: format!("{remote}/checkout.js"),
            brand_name: "Prana Wellness".to_string(),
            theme_color: "#1976d2".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running site and a client that keeps its cookies.
pub struct Site {
    /// Base URL, without a trailing slash.
    pub url: String,
    /// Cookie-keeping client; one per visitor.
    pub client: reqwest::Client,
}

impl Site {
    /// Absolute URL for `path`.
    #[must_use]
    pub fn at(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    /// POST an `application/x-www-form-urlencoded` body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.at(path))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body.to_string())
            .send()
            .await
            .expect("form request failed")
    }

    /// POST a JSON body and decode the JSON answer.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent or the answer is not JSON.
    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.at(path))
            .json(body)
            .send()
            .await
            .expect("JSON request failed");
        let status = StatusCode::from_u16(response.status().as_u16())
            .expect("status code is valid");
        let body = response.json().await.expect("answer is JSON");
        (status, body)
    }

    /// GET `path` and return the status and body text.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let response = self
            .client
            .get(self.at(path))
            .send()
            .await
            .expect("GET request failed");
        let status = StatusCode::from_u16(response.status().as_u16())
            .expect("status code is valid");
        let body = response.text().await.expect("body is text");
        (status, body)
    }
}

/// Start the site against `config`.
///
/// # Panics
///
/// Panics if the service catalog cannot be loaded or no local port can be
/// bound.
pub async fn spawn_site(config: SiteConfig) -> Site {
    let site_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../site");
    let catalog = Catalog::load(&site_dir.join("content/services")).expect("catalog loads");
    let state = AppState::with_catalog(config, catalog).expect("state builds");
    let app = prana_site::app(state, &site_dir.join("static"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind site listener");
    let addr = listener.local_addr().expect("site listener address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    });

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client builds");

    Site {
        url: format!("http://{addr}"),
        client,
    }
}

/// Start a stub with `behavior` and a site wired to it.
///
/// # Panics
///
/// Panics if either server cannot start.
pub async fn spawn(behavior: StubBehavior) -> (Site, Stub) {
    let stub = spawn_stub(behavior).await;
    let site = spawn_site(site_config(&stub.url)).await;
    (site, stub)
}
