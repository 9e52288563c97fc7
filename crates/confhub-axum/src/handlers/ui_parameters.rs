//! UI preference handlers - the fixed-schema record.

use axum::Json;
use axum::extract::State;
use confhub_core::{UiParameters, UiParametersUpdate};

use crate::error::HttpError;
use crate::extract::UserId;
use crate::state::AppState;

/// Get the user's UI preferences, creating defaults on first access.
pub async fn get(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<UiParameters>, HttpError> {
    Ok(Json(state.config.get_ui_parameters(&user_id).await?))
}

/// Merge the fields present in the body into the user's UI preferences.
pub async fn update(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(update): Json<UiParametersUpdate>,
) -> Result<Json<UiParameters>, HttpError> {
    Ok(Json(state.config.update_ui_parameters(&user_id, &update).await?))
}
