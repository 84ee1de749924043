//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size check, route matching
//! by path and method, error conversion and access logging.

use super::{categories, products, read_body};
use crate::config::AppState;
use crate::error::{ApiError, Resource};
use crate::http::{empty_response, json_response, text_response};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const PRODUCTS: &str = "/api/produk";
const PRODUCT_ITEM: &str = "/api/produk/";
const CATEGORIES: &str = "/api/kategori";
const CATEGORY_ITEM: &str = "/api/kategori/";

const WELCOME: &str = "Selamat Datang!";
const COLLECTION_METHODS: &str = "GET, POST";
const ITEM_METHODS: &str = "GET, PUT, DELETE";

/// Route a request path resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Health,
    Collection(Resource),
    Item(Resource, &'a str),
    Welcome,
}

impl<'a> Route<'a> {
    /// Exact paths win over item prefixes; everything else is the welcome page
    fn resolve(path: &'a str) -> Self {
        match path {
            "/health" => Self::Health,
            PRODUCTS => Self::Collection(Resource::Product),
            CATEGORIES => Self::Collection(Resource::Category),
            _ => {
                if let Some(segment) = path.strip_prefix(PRODUCT_ITEM) {
                    Self::Item(Resource::Product, segment)
                } else if let Some(segment) = path.strip_prefix(CATEGORY_ITEM) {
                    Self::Item(Resource::Category, segment)
                } else {
                    Self::Welcome
                }
            }
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let access_log = state.cached_access_log.load(Ordering::Relaxed);
    let mut entry = access_log.then(|| start_entry(&req, remote_addr));

    let mut response = route_request(req, &state)
        .await
        .unwrap_or_else(ApiError::into_response);

    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, name);
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn start_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::start(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version()).trim_start_matches("HTTP/").to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}

/// Dispatch a request to its handler
async fn route_request<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_body_size(&req, state.config.http.max_body_size)?;

    let (parts, body) = req.into_parts();
    let method = parts.method;
    let strict = state.config.http.strict_methods;

    match Route::resolve(parts.uri.path()) {
        Route::Health => Ok(json_response(
            StatusCode::OK,
            &serde_json::json!({ "status": "OK", "message": "API Running" }),
        )),
        Route::Welcome => Ok(text_response(StatusCode::OK, WELCOME)),
        Route::Collection(resource) => match method {
            Method::GET => Ok(match resource {
                Resource::Product => products::list(state),
                Resource::Category => categories::list(state),
            }),
            Method::POST => {
                let body = read_body(body, state.config.http.max_body_size).await?;
                match resource {
                    Resource::Product => products::create(state, &body),
                    Resource::Category => categories::create(state, &body),
                }
            }
            _ => unsupported_method(resource, COLLECTION_METHODS, strict),
        },
        Route::Item(resource, segment) => match method {
            Method::GET => match resource {
                Resource::Product => products::get(state, segment),
                Resource::Category => categories::get(state, segment),
            },
            Method::PUT => {
                let body = read_body(body, state.config.http.max_body_size).await?;
                match resource {
                    Resource::Product => products::update(state, segment, &body),
                    Resource::Category => categories::update(state, segment, &body),
                }
            }
            Method::DELETE => match resource {
                Resource::Product => products::delete(state, segment),
                Resource::Category => categories::delete(state, segment),
            },
            _ => unsupported_method(resource, ITEM_METHODS, strict),
        },
    }
}

/// 405 for a known route, except product routes in legacy mode which answer
/// with an empty 200
fn unsupported_method(
    resource: Resource,
    allow: &'static str,
    strict: bool,
) -> Result<Response<Full<Bytes>>, ApiError> {
    if !strict && resource == Resource::Product {
        return Ok(empty_response());
    }
    Err(ApiError::MethodNotAllowed { allow })
}

/// Reject a declared Content-Length above the limit before reading the body
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Result<(), ApiError> {
    let Some(content_length) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(());
    };
    match content_length.to_str().ok().map(str::parse::<u64>) {
        Some(Ok(size)) if size > max_body_size => Err(ApiError::PayloadTooLarge),
        Some(Ok(_)) => Ok(()),
        _ => {
            logger::log_warning("Invalid Content-Length header, skipping size check");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::{body_json, body_text, test_config};
    use serde_json::json;

    fn state(seed: bool) -> Arc<AppState> {
        Arc::new(AppState::new(&test_config(seed)))
    }

    fn legacy_state() -> Arc<AppState> {
        let mut config = test_config(true);
        config.http.strict_methods = false;
        Arc::new(AppState::new(&config))
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        path: &str,
        body: &str,
    ) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        handle_request(req, Arc::clone(state), addr).await.unwrap()
    }

    #[test]
    fn test_route_resolution() {
        assert_eq!(Route::resolve("/health"), Route::Health);
        assert_eq!(Route::resolve("/api/produk"), Route::Collection(Resource::Product));
        assert_eq!(Route::resolve("/api/kategori"), Route::Collection(Resource::Category));
        assert_eq!(Route::resolve("/api/produk/7"), Route::Item(Resource::Product, "7"));
        assert_eq!(Route::resolve("/api/produk/"), Route::Item(Resource::Product, ""));
        assert_eq!(
            Route::resolve("/api/kategori/1/x"),
            Route::Item(Resource::Category, "1/x")
        );
        assert_eq!(Route::resolve("/"), Route::Welcome);
        assert_eq!(Route::resolve("/healthz"), Route::Welcome);
        assert_eq!(Route::resolve("/api/produkx"), Route::Welcome);
    }

    #[tokio::test]
    async fn test_welcome_and_health() {
        let state = state(true);
        let response = send(&state, Method::GET, "/", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["server"], "toko-api/test");
        assert_eq!(body_text(response).await, "Selamat Datang!");

        let response = send(&state, Method::GET, "/health", "").await;
        assert_eq!(
            body_json(response).await,
            json!({"status": "OK", "message": "API Running"})
        );
    }

    #[tokio::test]
    async fn test_create_then_get_resolved() {
        let state = state(false);
        state.categories.create(crate::model::Category::new(0, "Makanan"));
        state.categories.create(crate::model::Category::new(0, "Minuman"));

        let response = send(
            &state,
            Method::POST,
            "/api/produk",
            r#"{"nama":"Kopi","harga":10000,"stok":5,"kategori_id":2}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], 1);

        let response = send(&state, Method::GET, "/api/produk/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"id": 1, "nama": "Kopi", "harga": 10000, "stok": 5, "kategori": "Minuman"})
        );
    }

    #[tokio::test]
    async fn test_missing_product() {
        let state = state(true);
        let response = send(&state, Method::GET, "/api/produk/999", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Produk belum ada\n");
    }

    #[tokio::test]
    async fn test_bad_id_and_body() {
        let state = state(true);
        let response = send(&state, Method::DELETE, "/api/produk/abc", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid Produk ID\n");

        let response = send(&state, Method::POST, "/api/kategori", "[").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid request\n");
    }

    #[tokio::test]
    async fn test_delete_category_then_get() {
        let state = state(true);
        let response = send(&state, Method::DELETE, "/api/kategori/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": "sukses delete"}));

        let response = send(&state, Method::GET, "/api/kategori/1", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Kategori belum ada\n");
    }

    #[tokio::test]
    async fn test_get_then_put_same_fields_is_noop() {
        let state = state(true);
        let before = body_json(send(&state, Method::GET, "/api/produk", "").await).await;
        let response = send(
            &state,
            Method::PUT,
            "/api/produk/2",
            r#"{"id":999,"nama":"Mie Goreng Ayam Geprek","harga":25000,"stok":8,"kategori_id":1}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], 2);
        let after = body_json(send(&state, Method::GET, "/api/produk", "").await).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_strict_method_not_allowed() {
        let state = state(true);
        for path in ["/api/produk", "/api/produk/1", "/api/kategori", "/api/kategori/1"] {
            let response = send(&state, Method::PATCH, path, "").await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
        }
        let response = send(&state, Method::PATCH, "/api/produk/1", "").await;
        assert_eq!(response.headers()["allow"], "GET, PUT, DELETE");
        assert_eq!(body_text(response).await, "Method not allowed\n");
    }

    #[tokio::test]
    async fn test_legacy_method_handling() {
        let state = legacy_state();
        let response = send(&state, Method::PATCH, "/api/produk/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");

        let response = send(&state, Method::DELETE, "/api/produk", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&state, Method::PATCH, "/api/kategori/1", "").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(state.products.len(), 3);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let state = state(true);
        let big = format!(r#"{{"nama":"{}"}}"#, "x".repeat(2048));
        let response = send(&state, Method::POST, "/api/kategori", &big).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(state.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_declared_length_rejected_before_read() {
        let state = state(true);
        let req = Request::builder()
            .method(Method::PUT)
            .uri("/api/kategori/1")
            .header(CONTENT_LENGTH, "4096")
            .body(Full::new(Bytes::from_static(b"{}")))
            .unwrap();
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let response = handle_request(req, Arc::clone(&state), addr).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_null_field_creates_with_zero_value() {
        let state = state(true);
        let response = send(
            &state,
            Method::POST,
            "/api/produk",
            r#"{"nama":null,"harga":5,"stok":1,"kategori_id":1}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"id": 4, "nama": "", "harga": 5, "stok": 1, "kategori_id": 1})
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_id() {
        let state = state(true);
        let response = send(&state, Method::GET, "/api/produk/%31", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["nama"], "Mie Goreng Sambal Ijo");

        let response = send(&state, Method::DELETE, "/api/kategori/%32", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_id_reuse_through_http() {
        let state = state(true);
        send(&state, Method::DELETE, "/api/produk/1", "").await;
        let response = send(&state, Method::POST, "/api/produk", r#"{"nama":"Teh Tarik"}"#).await;
        // two products remain, so the new one gets id 3 alongside "Es Teh"
        assert_eq!(body_json(response).await["id"], 3);
        let response = send(&state, Method::GET, "/api/produk/3", "").await;
        assert_eq!(body_json(response).await["nama"], "Es Teh");
    }
}
