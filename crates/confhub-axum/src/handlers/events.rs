//! Change event stream (SSE).

use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::dto::EventsQuery;
use crate::state::AppState;

/// Stream change events, optionally only those of `?userId=`.
pub async fn stream(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    state.notifier.clone().subscribe(query.user_id)
}
