//! Route table
//!
//! Quote routes are declared in match-priority order. The literal
//! `/quotes/quote/random` path comes before the `/quotes/:id` captures and
//! static segments always win over captures, so `quote` is never read as an
//! id. Every declared path carries a method fallback, so an undeclared method
//! on a declared path is answered like an unknown path.

use crate::handlers;
use crate::metrics::track_requests;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

fn route(method_router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    method_router.fallback(handlers::not_found)
}

/// Quote CRUD routes, relative to the API prefix
pub fn quote_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quotes",
            route(get(handlers::list_quotes).post(handlers::create_quote)),
        )
        .route("/quotes/quote/random", route(get(handlers::random_quote)))
        .route(
            "/quotes/:id",
            route(
                get(handlers::get_quote)
                    .put(handlers::update_quote)
                    .delete(handlers::delete_quote),
            ),
        )
}

/// Build the full application: quote routes under `api_prefix`, health and
/// metrics endpoints, the catch-all, and middleware.
pub fn app(state: AppState, api_prefix: &str) -> Router {
    let router = Router::new()
        .route("/health/live", route(get(handlers::health_live)))
        .route("/health/ready", route(get(handlers::health_ready)))
        .route("/metrics", route(get(handlers::metrics)));

    let router = if api_prefix.is_empty() || api_prefix == "/" {
        router.merge(quote_routes())
    } else {
        router.nest(api_prefix, quote_routes())
    };

    router
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(track_requests)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use quotes_core::{MemoryStore, NewQuote, Quote, QuoteId, QuoteStore, StoreError};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Memory store that counts calls to its mutating operations
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        creates: AtomicUsize,
        updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl QuoteStore for CountingStore {
        async fn list_quotes(&self) -> quotes_core::Result<Vec<Quote>> {
            self.inner.list_quotes().await
        }

        async fn get_quote(&self, id: QuoteId) -> quotes_core::Result<Option<Quote>> {
            self.inner.get_quote(id).await
        }

        async fn create_quote(&self, new_quote: NewQuote) -> quotes_core::Result<Quote> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create_quote(new_quote).await
        }

        async fn update_quote(&self, quote: &Quote) -> quotes_core::Result<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_quote(quote).await
        }

        async fn delete_quote(&self, id: QuoteId) -> quotes_core::Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_quote(id).await
        }

        async fn random_quote(&self) -> quotes_core::Result<Option<Quote>> {
            self.inner.random_quote().await
        }
    }

    /// Store whose every operation fails
    struct BrokenStore;

    fn broken() -> StoreError {
        std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into()
    }

    #[async_trait]
    impl QuoteStore for BrokenStore {
        async fn list_quotes(&self) -> quotes_core::Result<Vec<Quote>> {
            Err(broken())
        }

        async fn get_quote(&self, _id: QuoteId) -> quotes_core::Result<Option<Quote>> {
            Err(broken())
        }

        async fn create_quote(&self, _new_quote: NewQuote) -> quotes_core::Result<Quote> {
            Err(broken())
        }

        async fn update_quote(&self, _quote: &Quote) -> quotes_core::Result<()> {
            Err(broken())
        }

        async fn delete_quote(&self, _id: QuoteId) -> quotes_core::Result<()> {
            Err(broken())
        }

        async fn random_quote(&self) -> quotes_core::Result<Option<Quote>> {
            Err(broken())
        }
    }

    fn test_app(store: Arc<dyn QuoteStore>) -> Router {
        app(AppState::new(store), "/api")
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Option<Value>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).unwrap())
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let app = test_app(Arc::new(MemoryStore::new()));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/quotes",
            Some(json!({"quote": "Premature optimization is the root of all evil.", "author": "Donald Knuth"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = body.unwrap();
        assert_eq!(created["quote"], "Premature optimization is the root of all evil.");
        assert_eq!(created["author"], "Donald Knuth");
        let id = created["id"].as_u64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/quotes/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_requires_both_fields() {
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        for payload in [
            json!({"author": "Anonymous"}),
            json!({"quote": "Orphaned words"}),
            json!({"quote": "", "author": "Anonymous"}),
            json!({"quote": 42, "author": "Anonymous"}),
            json!([]),
        ] {
            let (status, body) = send(&app, Method::POST, "/api/quotes", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.unwrap()["message"], "Quote and author required");
        }

        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
        assert!(store.list_quotes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_json_content_type() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, Method::POST, "/api/quotes", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap()["message"], "Quote and author required");
    }

    #[tokio::test]
    async fn test_create_with_empty_json_body() {
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        for body in ["", "  \n"] {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/api/quotes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();

            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["message"], "Quote and author required");
        }

        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_with_empty_json_body() {
        let store = Arc::new(CountingStore::default());
        let quote = store
            .create_quote(NewQuote {
                quote: "Q1".to_string(),
                author: "A1".to_string(),
            })
            .await
            .unwrap();
        let app = test_app(store.clone());

        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/api/quotes/{}", quote.id))
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Quote and author required");
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_with_malformed_json() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/quotes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_quote() {
        let app = test_app(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, Method::GET, "/api/quotes/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "Quote not found.");

        let (status, body) = send(&app, Method::GET, "/api/quotes/not-a-number", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "Quote not found.");
    }

    #[tokio::test]
    async fn test_update_existing_quote() {
        let store = Arc::new(MemoryStore::new());
        let quote = store
            .create_quote(NewQuote {
                quote: "Q1".to_string(),
                author: "A1".to_string(),
            })
            .await
            .unwrap();
        let app = test_app(store);
        let uri = format!("/api/quotes/{}", quote.id);

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({"quote": "Q2", "author": "A2"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_none());

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.unwrap(),
            json!({"id": quote.id.get(), "quote": "Q2", "author": "A2"})
        );
    }

    #[tokio::test]
    async fn test_update_missing_quote() {
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/quotes/12",
            Some(json!({"quote": "Q2", "author": "A2"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "Quote Not Found");
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
        assert!(store.list_quotes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_both_fields() {
        let store = Arc::new(CountingStore::default());
        let quote = store
            .create_quote(NewQuote {
                quote: "Q1".to_string(),
                author: "A1".to_string(),
            })
            .await
            .unwrap();
        let app = test_app(store.clone());

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/quotes/{}", quote.id),
            Some(json!({"quote": "Q2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap()["message"], "Quote and author required");
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
        assert_eq!(store.get_quote(quote.id).await.unwrap(), Some(quote));
    }

    #[tokio::test]
    async fn test_delete_existing_then_get() {
        let store = Arc::new(MemoryStore::new());
        let quote = store
            .create_quote(NewQuote {
                quote: "Q".to_string(),
                author: "A".to_string(),
            })
            .await
            .unwrap();
        let app = test_app(store);
        let uri = format!("/api/quotes/{}", quote.id);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_none());

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_quote_skips_store_delete() {
        let store = Arc::new(CountingStore::default());
        let app = test_app(store.clone());

        let (status, body) = send(&app, Method::DELETE, "/api/quotes/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "Quote Not Found");
        assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_random_route_is_not_an_id() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..3 {
            store
                .create_quote(NewQuote {
                    quote: format!("quote {}", i),
                    author: "anon".to_string(),
                })
                .await
                .unwrap();
        }
        let app = test_app(store);

        let (_, all) = send(&app, Method::GET, "/api/quotes", None).await;
        let all = all.unwrap();
        let ids: Vec<u64> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids.len(), 3);

        let (status, body) = send(&app, Method::GET, "/api/quotes/quote/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ids.contains(&body.unwrap()["id"].as_u64().unwrap()));

        let (status, body) = send(&app, Method::GET, "/api/quotes/quote", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "Quote not found.");
    }

    #[tokio::test]
    async fn test_random_on_empty_store() {
        let app = test_app(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, Method::GET, "/api/quotes/quote/random", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.unwrap()["message"], "No quotes available");
    }

    #[tokio::test]
    async fn test_unmatched_routes() {
        let app = test_app(Arc::new(MemoryStore::new()));

        for (method, uri) in [
            (Method::GET, "/nothing/here"),
            (Method::GET, "/api/authors"),
            (Method::GET, "/quotes"),
            (Method::PATCH, "/api/quotes"),
            (Method::POST, "/api/quotes/1"),
            (Method::DELETE, "/api/quotes/quote/random"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            let body = body.unwrap();
            assert_eq!(body["error"]["message"], "Not Found");
            assert_eq!(body["message"], "Not Found");
        }
    }

    #[tokio::test]
    async fn test_store_failures_use_uniform_contract() {
        let app = test_app(Arc::new(BrokenStore));
        let payload = Some(json!({"quote": "Q", "author": "A"}));

        for (method, uri, body) in [
            (Method::GET, "/api/quotes", None),
            (Method::GET, "/api/quotes/1", None),
            (Method::POST, "/api/quotes", payload.clone()),
            (Method::PUT, "/api/quotes/1", payload),
            (Method::DELETE, "/api/quotes/1", None),
            (Method::GET, "/api/quotes/quote/random", None),
        ] {
            let (status, json) = send(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            let json = json.unwrap();
            assert_eq!(json["message"], "IO error: disk on fire");
            assert_eq!(json["error"]["message"], "IO error: disk on fire");
        }
    }

    #[tokio::test]
    async fn test_health_ready_reports_count() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_quote(NewQuote {
                quote: "Q".to_string(),
                author: "A".to_string(),
            })
            .await
            .unwrap();
        let app = test_app(store);

        let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["quoteCount"], 1);
    }

    #[tokio::test]
    async fn test_health_ready_with_broken_store() {
        let app = test_app(Arc::new(BrokenStore));
        let (status, _) = send(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = send(&app, Method::GET, "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_prefix_merges_routes() {
        let app = app(AppState::new(Arc::new(MemoryStore::new())), "/");
        let (status, body) = send(&app, Method::GET, "/quotes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!([]));
    }
}
