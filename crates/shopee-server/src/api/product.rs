use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use shopee_core::ScrapeRequest;

use super::{AppState, ErrorEnvelope};

const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// `GET /shopee?storeId=..&dealId=..`
///
/// Returns the upstream JSON untouched, 400 for bad parameters (without
/// calling the scraper), or 500 once every scrape attempt has failed.
pub(super) async fn get_product(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ErrorEnvelope> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "unparseable query string");
        Vec::new()
    });

    let request = ScrapeRequest::from_query_pairs(&pairs).map_err(|e| {
        tracing::info!(error = %e, "rejected product lookup");
        ErrorEnvelope::new(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    tracing::info!(
        store_id = %request.store_id,
        deal_id = %request.deal_id,
        "product lookup"
    );

    let body = state
        .fetcher
        .fetch_product(&request.store_id, &request.deal_id)
        .await
        .map_err(|e| {
            let message = e.to_string();
            let message = if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            ErrorEnvelope::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        })?;

    Ok(Json(body))
}
