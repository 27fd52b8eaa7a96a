use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{AppState, error::AppResult, extract::AppQuery};

use super::model::{
    KeywordSearchQuery, LocalSearchQuery, LocalSearchResponse, MAX_SEARCH_RESULTS, PLACES,
    ReverseQuery, search_places,
};

#[axum::debug_handler]
pub async fn search_local_places(
    AppQuery(query): AppQuery<LocalSearchQuery>,
) -> impl IntoResponse {
    let results = search_places(PLACES, &query.q, MAX_SEARCH_RESULTS)
        .into_iter()
        .copied()
        .collect();

    (
        StatusCode::OK,
        Json(LocalSearchResponse { ok: true, results }),
    )
}

/// Kakao keyword search passthrough. Backs both `/api/local/search` and
/// `/api/kakao/search`.
#[axum::debug_handler]
pub async fn search_keyword(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<KeywordSearchQuery>,
) -> AppResult<Json<Value>> {
    if query.query.trim().is_empty() {
        return Ok(Json(json!({ "documents": [] })));
    }

    let body = state.kakao.search_keyword(&query.upstream_params()).await?;
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn reverse_geocode(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ReverseQuery>,
) -> AppResult<Json<Value>> {
    let body = state.kakao.coord_to_address(&query.x, &query.y).await?;
    Ok(Json(body))
}
