//! Request extractors shared by handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::dto::ValueQuery;
use crate::error::HttpError;

/// Name of the mandatory identity header (`userId` on the wire).
pub const USER_ID_HEADER: &str = "userid";

/// Caller identity taken from the `userId` header.
///
/// The value is opaque and used verbatim as the scope's user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| HttpError::BadRequest("missing userId header".to_string()))?;

        let user_id = value
            .to_str()
            .map_err(|_| HttpError::BadRequest("userId header is not valid text".to_string()))?;

        if user_id.is_empty() {
            return Err(HttpError::BadRequest("userId header is empty".to_string()));
        }

        Ok(Self(user_id.to_string()))
    }
}

/// New parameter value taken from the `?value=` query string.
///
/// A missing value is rejected with the JSON error body used by every other
/// route rather than axum's plain-text rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ParamValue {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ValueQuery>::from_request_parts(parts, state).await?;
        Ok(Self(query.value))
    }
}
