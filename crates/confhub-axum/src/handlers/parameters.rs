//! Parameter handlers - open-schema reads and writes.
//!
//! Each operation exists in two shapes: on the user's flat scope, and on a
//! named application scope taken from the path.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use confhub_core::{Parameter, Scope};

use crate::dto::NamesQuery;
use crate::error::HttpError;
use crate::extract::{ParamValue, UserId};
use crate::state::AppState;

async fn list_scope(
    state: &AppState,
    scope: &Scope,
    query: &NamesQuery,
) -> Result<Json<Vec<Parameter>>, HttpError> {
    Ok(Json(state.config.get_many(scope, &query.names()).await?))
}

async fn get_scope(state: &AppState, scope: &Scope, name: &str) -> Result<Response, HttpError> {
    Ok(match state.config.get(scope, name).await? {
        Some(param) => Json(param).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// List the user's flat parameters, optionally filtered by `?names=`.
pub async fn list(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<NamesQuery>,
) -> Result<Json<Vec<Parameter>>, HttpError> {
    list_scope(&state, &Scope::user(user_id), &query).await
}

/// Get one flat parameter; 204 when it was never written.
pub async fn get(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(name): Path<String>,
) -> Result<Response, HttpError> {
    get_scope(&state, &Scope::user(user_id), &name).await
}

/// Update one flat parameter from a `{name, value}` body.
pub async fn update(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(param): Json<Parameter>,
) -> Result<Json<Parameter>, HttpError> {
    let scope = Scope::user(user_id);
    Ok(Json(state.config.update(&scope, &param.name, &param.value).await?))
}

/// Update one flat parameter named in the path, value in `?value=`.
pub async fn update_named(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(name): Path<String>,
    ParamValue(value): ParamValue,
) -> Result<Json<Parameter>, HttpError> {
    let scope = Scope::user(user_id);
    Ok(Json(state.config.update(&scope, &name, &value).await?))
}

/// Update a batch of flat parameters.
pub async fn update_many(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(params): Json<Vec<Parameter>>,
) -> Result<Json<Vec<Parameter>>, HttpError> {
    let scope = Scope::user(user_id);
    Ok(Json(state.config.update_many(&scope, &params).await?))
}

/// List an application's parameters, optionally filtered by `?names=`.
pub async fn list_app(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(app_name): Path<String>,
    Query(query): Query<NamesQuery>,
) -> Result<Json<Vec<Parameter>>, HttpError> {
    list_scope(&state, &Scope::app(user_id, app_name), &query).await
}

/// Get one application parameter; 204 when it was never written.
pub async fn get_app(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((app_name, name)): Path<(String, String)>,
) -> Result<Response, HttpError> {
    get_scope(&state, &Scope::app(user_id, app_name), &name).await
}

/// Update one application parameter from a `{name, value}` body.
pub async fn update_app(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(app_name): Path<String>,
    Json(param): Json<Parameter>,
) -> Result<Json<Parameter>, HttpError> {
    let scope = Scope::app(user_id, app_name);
    Ok(Json(state.config.update(&scope, &param.name, &param.value).await?))
}

/// Update one application parameter named in the path, value in `?value=`.
pub async fn update_app_named(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path((app_name, name)): Path<(String, String)>,
    ParamValue(value): ParamValue,
) -> Result<Json<Parameter>, HttpError> {
    let scope = Scope::app(user_id, app_name);
    Ok(Json(state.config.update(&scope, &name, &value).await?))
}

/// Update a batch of application parameters.
pub async fn update_app_many(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(app_name): Path<String>,
    Json(params): Json<Vec<Parameter>>,
) -> Result<Json<Vec<Parameter>>, HttpError> {
    let scope = Scope::app(user_id, app_name);
    Ok(Json(state.config.update_many(&scope, &params).await?))
}
