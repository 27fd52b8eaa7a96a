use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    extract::AppJson,
    middleware::{OptionalUser, RequireAdmin},
    utils::{error_to_api_response, ok_response, success_to_api_response},
};

use super::model::{CreateReservationRequest, Reservation};

#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    AppJson(req): AppJson<CreateReservationRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate().map_err(AppError::BadRequest)?;

    // a user cookie from another deployment can carry a non-uuid subject
    let user_id = user.and_then(|claims| Uuid::parse_str(&claims.sub).ok());
    let reservation = Reservation::create(&state.pool, req, user_id).await?;
    tracing::info!(
        "reservation {} created for store {}",
        reservation.id,
        reservation.store_id
    );

    Ok((StatusCode::CREATED, success_to_api_response(reservation)))
}

#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> impl IntoResponse {
    match Reservation::list_all(&state.pool).await {
        Ok(reservations) => (StatusCode::OK, success_to_api_response(reservations)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(e.to_string()),
        ),
    }
}

/// A missing id and a database failure both answer 500.
#[axum::debug_handler]
pub async fn delete_reservation(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    // no row can carry an id that is not a uuid
    let id = Uuid::parse_str(&id).map_err(|_| AppError::Database(sqlx::Error::RowNotFound))?;

    Reservation::delete(&state.pool, id).await?;
    tracing::info!("reservation {} deleted", id);

    Ok((StatusCode::OK, ok_response()))
}
