use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    extract::AppQuery,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{Store, StoreQuery, rank_stores};

#[axum::debug_handler]
pub async fn list_stores(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StoreQuery>,
) -> impl IntoResponse {
    match Store::find_active(&state.pool, query.category.as_deref(), query.mood.as_deref()).await
    {
        Ok(stores) => (
            StatusCode::OK,
            success_to_api_response(rank_stores(stores, query.origin(), query.limit())),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(e.to_string()),
        ),
    }
}

#[axum::debug_handler]
pub async fn get_store(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match Store::find_by_id(&state.pool, &id).await {
        Ok(Some(store)) => (StatusCode::OK, success_to_api_response(store)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(e.to_string()),
        ),
    }
}
