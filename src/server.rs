//! HTTP server for the Sage chat and research endpoints

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::SageError;
use crate::export::{render, ExportFormat, ExportOptions};
use crate::library::{browse, LibraryPage, LibraryRequest};
use crate::sage_engine::SharedSageEngine;
use crate::types::{ResearchPaper, SageRequest, SageRequestHttp};

/// Set on chat responses that carry the fallback body
pub const FALLBACK_HEADER: &str = "x-sage-fallback";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Citation export request
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub query: Option<String>,
    pub format: String,
    #[serde(default)]
    pub include_abstracts: bool,
}

/// Chat handler: POST body or GET query string, OPTIONS answered empty.
///
/// Anything that goes wrong after method dispatch is logged and answered
/// with the fallback body, still 200.
async fn sage_handler(
    State(engine): State<SharedSageEngine>,
    method: Method,
    params: Option<Query<SageRequestHttp>>,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::GET && method != Method::POST {
        warn!("Rejected {} on chat endpoint", method);
        return SageError::MethodNotAllowed.into_response();
    }

    let raw = if method == Method::POST {
        parse_body(&body)
    } else {
        Ok(params.map(|Query(p)| p).unwrap_or_default())
    };

    let result = raw.and_then(|raw| {
        let req = SageRequest::from(raw);
        info!(
            "Received sage request: query='{}', level={}",
            req.query,
            req.experience_level.as_str()
        );
        engine.respond(&req)
    });

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!("Sage request failed, serving fallback: {}", e);
            fallback(&engine)
        }
    }
}

/// Empty body means "no query"; anything else must be a JSON object
fn parse_body(body: &[u8]) -> Result<SageRequestHttp, SageError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SageRequestHttp::default());
    }
    serde_json::from_slice(body).map_err(|e| SageError::InvalidBody(e.to_string()))
}

fn fallback(engine: &SharedSageEngine) -> Response {
    (
        [(FALLBACK_HEADER, "true")],
        Json(engine.fallback_response()),
    )
        .into_response()
}

/// Panic hook for the chat route: same fallback as any other failure
pub(crate) fn panic_fallback(
    engine: SharedSageEngine,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |err: Box<dyn Any + Send + 'static>| {
        let detail = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        error!("Sage handler panicked, serving fallback: {}", detail);
        fallback(&engine)
    }
}

/// Papers for an optional query: matched set, or the whole corpus
fn papers_for_query(engine: &SharedSageEngine, query: Option<&str>) -> (String, Vec<ResearchPaper>) {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let q = q.to_lowercase();
            let papers = engine.research().papers_for(&q);
            (q, papers)
        }
        None => (String::new(), engine.research().all()),
    }
}

async fn library_handler(
    State(engine): State<SharedSageEngine>,
    payload: Result<Json<LibraryRequest>, JsonRejection>,
) -> Result<Json<LibraryPage>, SageError> {
    let Json(req) = payload?;
    let (_, papers) = papers_for_query(&engine, req.query.as_deref());
    let page = browse(papers, &req);
    info!(
        "Library page {}/{}: {} of {} papers",
        page.page,
        page.total_pages,
        page.papers.len(),
        page.total
    );
    Ok(Json(page))
}

async fn export_handler(
    State(engine): State<SharedSageEngine>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, SageError> {
    let Json(req) = payload?;
    let format: ExportFormat = req.format.parse()?;
    let (query, papers) = papers_for_query(&engine, req.query.as_deref());
    let body = render(
        format,
        &query,
        &papers,
        ExportOptions {
            include_abstracts: req.include_abstracts,
        },
    )?;

    info!("Exported {} papers as {:?}", papers.len(), format);

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"sage-research.{}\"", format.extension()),
            ),
        ],
        body,
    )
        .into_response())
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "sage".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn cors_from_config(origins: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let raw = origins.trim();
    if raw.is_empty() || raw == "*" {
        return base.allow_origin(AnyOrigin);
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        warn!("No valid CORS origins parsed; allowing any origin");
        return base.allow_origin(AnyOrigin);
    }

    base.allow_origin(AllowOrigin::list(allowed))
}

/// Create and configure the HTTP router
pub fn create_router(engine: SharedSageEngine, config: &Config) -> Router {
    let chat = any(sage_handler).layer(CatchPanicLayer::custom(panic_fallback(engine.clone())));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sage", chat)
        .route("/api/research/library", post(library_handler))
        .route("/api/research/export", post(export_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_from_config(&config.cors_allowed_origins))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: SharedSageEngine, config: &Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    info!("Starting Sage server on {}", addr);

    let app = create_router(engine, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchStrategy;
    use crate::explanation::template_for;
    use crate::intent::IntentCategory;
    use crate::sage_engine::SageEngine;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(SageEngine::new_simple(MatchStrategy::Intent), &Config::default())
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Bytes) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_sleep_query() {
        let (status, headers, bytes) =
            send(app(), post_json("/api/sage", r#"{"query":"I can't sleep, what helps?"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(FALLBACK_HEADER).is_none());

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["explanation"], template_for(IntentCategory::Sleep));
        assert_eq!(json["response"], json["explanation"]);
        let products = json["products"].as_array().unwrap();
        assert!(!products.is_empty() && products.len() <= 3);
        for p in products {
            let sleepy = p["effects"].as_array().unwrap().iter().any(|e| e == "sleep");
            assert!(sleepy || p["strain_type"] == "indica", "{}", p["name"]);
        }
        assert!(json["educational_resources"]["research_studies"]["papers"].is_array());
        assert_eq!(json["suggestions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_json_gets_fallback_200() {
        let (status, headers, bytes) = send(app(), post_json("/api/sage", "{not json")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(FALLBACK_HEADER).unwrap(), "true");

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["products"].as_array().unwrap().len(), 2);
        assert!(json["explanation"].as_str().unwrap().starts_with("Welcome to Premo Cannabis"));
    }

    #[tokio::test]
    async fn test_empty_post_uses_default_query() {
        let (status, _, bytes) = send(app(), post_json("/api/sage", "")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["explanation"], template_for(IntentCategory::Default));
        assert_eq!(json["educational_summary"]["query"], "popular products");
    }

    #[tokio::test]
    async fn test_get_with_query_string() {
        let req = Request::builder()
            .method("GET")
            .uri("/api/sage?query=what%20helps%20with%20energy%20and%20focus%3F&experience_level=new")
            .body(Body::empty())
            .unwrap();
        let (status, _, bytes) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let explanation = json["explanation"].as_str().unwrap();
        assert!(explanation.starts_with("Since you're new"));
        assert!(explanation.ends_with(template_for(IntentCategory::Energy)));
        assert_eq!(json["educational_resources"]["educational_level"], "new");
    }

    #[tokio::test]
    async fn test_options_returns_empty_with_cors() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/sage")
            .header("origin", "https://shop.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let (status, headers, bytes) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bytes.is_empty());
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        let methods = headers.get("access-control-allow-methods").unwrap().to_str().unwrap();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let req = Request::builder()
            .method("DELETE")
            .uri("/api/sage")
            .body(Body::empty())
            .unwrap();
        let (status, _, bytes) = send(app(), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_overlong_query_falls_back() {
        let engine = SageEngine::new(
            crate::catalog::Catalog::premo(),
            crate::research::ResearchCorpus::mock(),
            MatchStrategy::Intent,
            8,
        )
        .unwrap();
        let app = create_router(engine, &Config::default());
        let (status, headers, _) =
            send(app, post_json("/api/sage", r#"{"query":"a very long question"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(FALLBACK_HEADER).unwrap(), "true");
    }

    #[tokio::test]
    async fn test_panic_becomes_fallback() {
        let engine = SageEngine::new_simple(MatchStrategy::Intent);
        async fn boom() -> &'static str {
            panic!("boom")
        }
        let app = Router::new().route(
            "/boom",
            get(boom).layer(CatchPanicLayer::custom(panic_fallback(engine))),
        );
        let req = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let (status, headers, bytes) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(FALLBACK_HEADER).unwrap(), "true");
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["products"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_library_endpoint() {
        let (status, _, bytes) = send(
            app(),
            post_json("/api/research/library", r#"{"category":"reviews","per_page":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["per_page"], 1);
        assert_eq!(json["papers"].as_array().unwrap().len(), 1);
        assert_eq!(json["total_pages"], json["total"]);
    }

    #[tokio::test]
    async fn test_export_endpoint() {
        let (status, headers, bytes) = send(
            app(),
            post_json("/api/research/export", r#"{"query":"sleep","format":"bibtex"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("content-type").unwrap(), "application/x-bibtex");
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text.matches("@article{").count(), 3);

        let (status, _, bytes) = send(
            app(),
            post_json("/api/research/export", r#"{"format":"pdf"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["details"].as_str().unwrap().contains("pdf"));
    }

    #[tokio::test]
    async fn test_research_endpoints_reject_bad_bodies_as_json() {
        let no_content_type = Request::builder()
            .method("POST")
            .uri("/api/research/export")
            .body(Body::from(r#"{"format":"ris"}"#))
            .unwrap();
        let cases = [
            no_content_type,
            post_json("/api/research/export", r#"{"query":"sleep"}"#),
            post_json("/api/research/library", r#"{"sort_by":"popularity"}"#),
            post_json("/api/research/library", r#"{"category":"edibles"}"#),
            post_json("/api/research/library", "{not json"),
        ];
        for req in cases {
            let uri = req.uri().to_string();
            let (status, _, bytes) = send(app(), req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["error"], "Bad Request");
            assert!(json["details"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body"));
        }
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/sage")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    }

    fn app_with_origins(origins: &str) -> Router {
        let config = Config {
            cors_allowed_origins: origins.into(),
            ..Default::default()
        };
        create_router(SageEngine::new_simple(MatchStrategy::Intent), &config)
    }

    #[tokio::test]
    async fn test_cors_origin_list() {
        let app = app_with_origins("https://a.example, https://b.example");

        let (_, headers, _) = send(app.clone(), preflight("https://b.example")).await;
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://b.example"
        );

        let (_, headers, _) = send(app.clone(), preflight("https://evil.example")).await;
        assert!(headers.get("access-control-allow-origin").is_none());

        let req = Request::builder()
            .method("POST")
            .uri("/api/sage")
            .header("origin", "https://a.example")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query":"calm"}"#))
            .unwrap();
        let (status, headers, _) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_cors_invalid_list_allows_any_origin() {
        let app = app_with_origins("bad\norigin, ,");
        let (_, headers, _) = send(app, preflight("https://shop.example.com")).await;
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, bytes) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["service"], "sage");
    }
}
