//! HTTP request handlers

use crate::api::{HealthResponse, HealthStatus, QuoteInput};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use quotes_core::{Quote, QuoteId};
use tracing::{debug, info, warn};

/// Message for a missing quote on reads
pub const QUOTE_NOT_FOUND: &str = "Quote not found.";

/// Message for a missing quote on writes
pub const QUOTE_NOT_FOUND_WRITE: &str = "Quote Not Found";

/// Message for a create or update body lacking either field
pub const QUOTE_AND_AUTHOR_REQUIRED: &str = "Quote and author required";

/// Message for a random pick from an empty store
pub const NO_QUOTES_AVAILABLE: &str = "No quotes available";

/// Message for the catch-all route
pub const NOT_FOUND: &str = "Not Found";

fn required() -> ApiError {
    ApiError::BadRequest(QUOTE_AND_AUTHOR_REQUIRED.to_string())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Decode a quote body. A request without a JSON content type or with a
/// blank body reads as `{}`, and well-formed JSON of the wrong shape counts
/// as missing fields.
fn read_input(headers: &HeaderMap, body: &Bytes) -> ApiResult<QuoteInput> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QuoteInput::default());
    }

    match Json::<QuoteInput>::from_bytes(body) {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::JsonDataError(_)) => Err(required()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// Look up a quote by its raw path segment. Segments that are not a valid
/// id cannot name a stored quote.
async fn find_quote(state: &AppState, raw_id: &str) -> ApiResult<Option<Quote>> {
    match raw_id.parse::<QuoteId>() {
        Ok(id) => Ok(state.store.get_quote(id).await?),
        Err(_) => {
            debug!("Path segment {:?} is not a quote id", raw_id);
            Ok(None)
        }
    }
}

/// GET /quotes
pub async fn list_quotes(State(state): State<AppState>) -> ApiResult<Json<Vec<Quote>>> {
    let quotes = state.store.list_quotes().await?;
    debug!("Listing {} quotes", quotes.len());
    Ok(Json(quotes))
}

/// GET /quotes/:id
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Quote>> {
    find_quote(&state, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(QUOTE_NOT_FOUND.to_string()))
}

/// POST /quotes
pub async fn create_quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Quote>)> {
    let new_quote = read_input(&headers, &body)?
        .validate()
        .map_err(|_| required())?;

    let quote = state.store.create_quote(new_quote).await?;
    info!("Created quote {} by {}", quote.id, quote.author);

    Ok((StatusCode::CREATED, Json(quote)))
}

/// PUT /quotes/:id
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let input = read_input(&headers, &body)?;

    let mut quote = find_quote(&state, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(QUOTE_NOT_FOUND_WRITE.to_string()))?;

    quote.apply(input.validate().map_err(|_| required())?);
    state.store.update_quote(&quote).await?;
    info!("Updated quote {}", quote.id);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /quotes/:id
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let quote = find_quote(&state, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(QUOTE_NOT_FOUND_WRITE.to_string()))?;

    state.store.delete_quote(quote.id).await?;
    info!("Deleted quote {}", quote.id);

    Ok(StatusCode::NO_CONTENT)
}

/// GET /quotes/quote/random
pub async fn random_quote(State(state): State<AppState>) -> ApiResult<Json<Quote>> {
    state
        .store
        .random_quote()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NO_QUOTES_AVAILABLE.to_string()))
}

/// Catch-all for unmatched method and path combinations
pub async fn not_found() -> ApiError {
    ApiError::NotFound(NOT_FOUND.to_string())
}

/// Health check - liveness probe
pub async fn health_live(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        quote_count: None,
    })
}

/// Health check - readiness probe
pub async fn health_ready(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    match state.store.count().await {
        Ok(count) => {
            crate::metrics::update_quote_count(count);
            Ok(Json(HealthResponse {
                status: HealthStatus::Healthy,
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_seconds: state.uptime_seconds(),
                quote_count: Some(count),
            }))
        }
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            Err(ApiError::ServiceUnavailable("Store not ready".to_string()))
        }
    }
}

/// Prometheus metrics endpoint
pub async fn metrics() -> String {
    crate::metrics::get_prometheus_metrics()
}
