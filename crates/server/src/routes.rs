//! HTTP routes and the JSON response envelope.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use restyler_core::{Fetcher, Restyler, RestylerError};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared handles for every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub restyler: Restyler,
    pub fetcher: Fetcher,
}

pub type SharedState = Arc<AppState>;

/// `{success, ...}` on success, `{success: false, error}` on failure.
#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

impl Envelope<()> {
    fn err(message: impl Into<String>) -> Json<Self> {
        Json(Self { success: false, data: None, error: Some(message.into()) })
    }
}

#[derive(Debug, Serialize)]
struct FetchedPage {
    html: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchUrlForm {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProcessSourceForm {
    pub source_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TransformForm {
    pub source_html: String,
    pub target_content: String,
}

/// Builds the routes without middleware.
pub fn router(state: SharedState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fetch-url", post(fetch_url))
        .route("/process-source", post(process_source))
        .route("/transform", post(transform))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state)
}

/// Builds the routes with tracing, CORS, compression and a request timeout.
pub fn app(state: SharedState, config: &ServerConfig) -> Router {
    router(state, config)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn fetch_url(State(state): State<SharedState>, Form(form): Form<FetchUrlForm>) -> Response {
    match state.fetcher.fetch(&form.url).await {
        Ok(html) => Envelope::ok(FetchedPage { html }).into_response(),
        Err(e) => {
            tracing::warn!(url = %form.url, error = %e, "fetch failed");
            (StatusCode::BAD_REQUEST, Envelope::err(format!("Error fetching URL: {}", e))).into_response()
        }
    }
}

async fn process_source(State(state): State<SharedState>, Form(form): Form<ProcessSourceForm>) -> Response {
    match state.restyler.process_source(&form.source_text) {
        Ok(processed) => Envelope::ok(processed).into_response(),
        Err(e) => Envelope::err(e.to_string()).into_response(),
    }
}

async fn transform(State(state): State<SharedState>, Form(form): Form<TransformForm>) -> Response {
    let restyler = state.restyler.clone();
    let outcome = tokio::task::spawn_blocking(move || restyler.transform(&form.source_html, &form.target_content)).await;

    match outcome {
        Ok(Ok(result)) => Envelope::ok(result).into_response(),
        Ok(Err(e)) => transform_error(&e).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "transform task failed");
            Envelope::err(format!("Transformation error: {}", e)).into_response()
        }
    }
}

fn transform_error(err: &RestylerError) -> Json<Envelope<()>> {
    if err.is_validation() {
        Envelope::err(err.to_string())
    } else {
        tracing::error!(error = %err, "transform failed");
        Envelope::err(format!("Transformation error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use restyler_core::FetchConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    const SOURCE_HTML: &str = "<html><head><style>body{color:red}</style></head>\
                               <body><p style='font-size:20px'>x</p></body></html>";

    fn test_app() -> Router {
        let state = Arc::new(AppState {
            restyler: Restyler::new(),
            fetcher: Fetcher::new(FetchConfig::default()).unwrap(),
        });
        let config = ServerConfig { static_dir: "does-not-exist".into(), ..ServerConfig::default() };
        app(state, &config)
    }

    fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new()).extend_pairs(fields).finish();
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("<form"));
        assert!(page.contains("/transform"));
    }

    #[tokio::test]
    async fn test_missing_static_file() {
        let request = Request::builder().uri("/static/missing.css").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transform_markdown() {
        let (status, body) =
            send(form_request("/transform", &[("source_html", SOURCE_HTML), ("target_content", "# Hi\nHello")])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["content_type"], "markdown");
        assert_eq!(body["processing_strategy"], "Markdown to HTML conversion with syntax highlighting");
        assert_eq!(body["original_content"], "# Hi\nHello");
        assert_eq!(
            body["transformed_html"],
            "<head><style>body{color:red}</style></head><h1 id=\"hi\">Hi</h1>\n<p style=\"font-size:20px\">Hello</p>\n"
        );
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_transform_plain_text() {
        let (_, body) = send(form_request(
            "/transform",
            &[("source_html", SOURCE_HTML), ("target_content", "ALL CAPS TITLE\nSome text")],
        ))
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["content_type"], "plain_text");
        assert_eq!(body["processed_markdown"], "## All Caps Title\nSome text");
    }

    #[tokio::test]
    async fn test_transform_blank_input() {
        let (status, body) =
            send(form_request("/transform", &[("source_html", SOURCE_HTML), ("target_content", "   ")])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Both source HTML and target content are required");
    }

    #[tokio::test]
    async fn test_transform_missing_fields() {
        let (status, body) = send(form_request("/transform", &[])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Both source HTML and target content are required");
    }

    #[tokio::test]
    async fn test_process_source_plain_text() {
        let (_, body) = send(form_request("/process-source", &[("source_text", "GEAR\n• tent\n• stove")])).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["content_type"], "plain_text");
        assert_eq!(body["processed_content"], "## Gear\n- tent\n- stove");
    }

    #[tokio::test]
    async fn test_process_source_markdown_unchanged() {
        let (_, body) = send(form_request("/process-source", &[("source_text", "# Title\n- a\n- b")])).await;
        assert_eq!(body["content_type"], "markdown");
        assert_eq!(body["processed_content"], "# Title\n- a\n- b");
    }

    #[tokio::test]
    async fn test_process_source_empty() {
        let (_, body) = send(form_request("/process-source", &[("source_text", "")])).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Source text is required");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let (status, body) = send(form_request("/fetch-url", &[("url", "not-a-url")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Error fetching URL: Invalid URL"));
        assert!(body.get("html").is_none());
    }

    #[test]
    fn test_transform_error_wraps_faults() {
        let Json(envelope) = transform_error(&RestylerError::InvalidPattern("bad".to_string()));
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("Transformation error: Invalid signal pattern: bad"));
    }
}
