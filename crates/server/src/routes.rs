//! HTTP surface of the gemstone catalog webhook.
//!
//! Endpoints:
//! - `GET  /`                      — service info and product count
//! - `POST /webhook`               — dialog platform fulfillment endpoint
//! - `GET  /stone-types`           — distinct category labels, sorted
//! - `GET  /products/{stoneType}`  — exact case-insensitive category lookup
//! - `GET  /search/{query}`        — exact + partial search diagnostics

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gemhook_core::catalog::{Catalog, Product};
use gemhook_core::config::WebhookConfig;
use gemhook_core::fulfillment::{
    self, FormatterSettings, WebhookReply, FALLBACK_TITLE,
};
use gemhook_core::matcher;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Number of entries the search endpoint returns at most.
const SEARCH_RESULT_CAP: usize = 10;
/// Number of category suggestions offered on a "not found" reply.
const SUGGESTION_COUNT: usize = 3;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    formatter: FormatterSettings,
    expected_tag: String,
}

pub fn router(catalog: Arc<Catalog>, webhook: &WebhookConfig) -> Router {
    let state = AppState {
        catalog,
        formatter: FormatterSettings {
            strategy: webhook.display,
            site_base_url: webhook.site_base_url.clone(),
            placeholder_image: webhook.placeholder_image.clone(),
        },
        expected_tag: webhook.expected_tag.clone(),
    };

    Router::new()
        .route("/", get(service_info))
        .route("/webhook", post(webhook_handler))
        .route("/stone-types", get(stone_types))
        .route("/products/{stone_type}", get(products_by_type))
        .route("/search/{query}", get(search_catalog))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Explicit webhook request schema. Every level is optional and defaulted
/// here so the matching logic never probes for missing fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    pub fulfillment_info: FulfillmentInfo,
    pub session_info: SessionInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FulfillmentInfo {
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub parameters: SessionParameters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionParameters {
    pub stone_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub total_products: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoneTypesResponse {
    pub stone_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub exact_matches: usize,
    pub partial_matches: usize,
    pub total_matches: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub stone_type: String,
    pub product_url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Gem Collection Webhook Service".to_string(),
        status: "running".to_string(),
        total_products: state.catalog.len(),
    })
}

async fn webhook_handler(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> (StatusCode, Json<WebhookReply>) {
    // Matching and formatting are pure; a panic here means a malformed
    // catalog entry or a formatter bug. Surface it as the fixed apology
    // rather than a connection reset.
    let reply = std::panic::catch_unwind(AssertUnwindSafe(|| respond(&state, &request)));

    match reply {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            error!(
                event_name = "webhook.request.failed",
                detail = %detail,
                "webhook request processing panicked"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fulfillment::internal_error_reply()))
        }
    }
}

fn respond(state: &AppState, request: &WebhookRequest) -> WebhookReply {
    match request.fulfillment_info.tag.as_deref() {
        Some(tag) if tag == state.expected_tag => {}
        other => {
            warn!(
                event_name = "webhook.tag.mismatch",
                received_tag = other.unwrap_or("<missing>"),
                "webhook called with an unexpected routing tag"
            );
            return fulfillment::tag_mismatch_reply();
        }
    }

    let query = request
        .session_info
        .parameters
        .stone_name
        .as_deref()
        .map(matcher::normalize_query)
        .filter(|query| !query.is_empty());

    let Some(query) = query else {
        return fulfillment::prompt_reply();
    };

    let matched = matcher::match_stone(&state.catalog, &query);
    if matched.is_empty() {
        info!(
            event_name = "webhook.match.empty",
            query = %query,
            "no products matched the query"
        );
        return fulfillment::not_found_reply(
            &query,
            &state.catalog.sample_stone_types(SUGGESTION_COUNT),
        );
    }

    info!(
        event_name = "webhook.match.found",
        query = %query,
        quality = ?matched.quality,
        matches = matched.len(),
        "catalog match complete"
    );
    fulfillment::matched_reply(&state.formatter, &query, &matched)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

async fn stone_types(State(state): State<AppState>) -> Json<StoneTypesResponse> {
    Json(StoneTypesResponse { stone_types: state.catalog.stone_types() })
}

async fn products_by_type(
    Path(stone_type): Path<String>,
    State(state): State<AppState>,
) -> Json<ProductsResponse> {
    let query = matcher::normalize_query(&stone_type);
    let products: Vec<Product> = state
        .catalog
        .products()
        .iter()
        .filter(|product| product.stone_type.to_lowercase() == query)
        .cloned()
        .collect();
    let count = products.len();

    Json(ProductsResponse { products, count })
}

async fn search_catalog(
    Path(query): Path<String>,
    State(state): State<AppState>,
) -> Json<SearchResponse> {
    let query = matcher::normalize_query(&query);
    let outcome = matcher::search(&state.catalog, &query);

    let results: Vec<SearchResult> = outcome
        .combined
        .iter()
        .take(SEARCH_RESULT_CAP)
        .map(|product| SearchResult {
            title: product.title.clone().unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            stone_type: product.stone_type.clone(),
            product_url: product
                .product_url
                .clone()
                .unwrap_or_else(|| state.formatter.site_base_url.clone()),
        })
        .collect();

    let exact_matches = outcome.exact.len();
    let total_matches = outcome.combined.len();

    Json(SearchResponse {
        query,
        exact_matches,
        // Partial hits that are not already exact hits.
        partial_matches: total_matches - exact_matches,
        total_matches,
        results,
    })
}
