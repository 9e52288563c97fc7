//! Change notification events.
//!
//! One event is published per logical write: a single-parameter update, a
//! batch update, or a UI preference update. Events carry metadata only; the
//! new values are not included so consumers re-read what they need.
//!
//! # Wire Format
//!
//! Events serialize to the header-like metadata shape consumed downstream:
//!
//! ```json
//! { "userId": "u1", "appName": "study", "parameterName": "k1" }
//! { "userId": "u1", "parameterNames": ["k1", "k2"] }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::Scope;

/// Metadata header carrying the user identity.
pub const HEADER_USER_ID: &str = "userId";
/// Metadata header carrying the application name, absent for the flat scope.
pub const HEADER_APP_NAME: &str = "appName";
/// Metadata header naming the single changed parameter.
pub const HEADER_PARAMETER_NAME: &str = "parameterName";
/// Metadata header listing every changed parameter of a batch.
pub const HEADER_PARAMETER_NAMES: &str = "parameterNames";

/// Names of the parameters touched by one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangedParameters {
    /// A single-parameter update.
    #[serde(rename = "parameterName")]
    Single(String),
    /// A batch update, listed even when the batch holds one name.
    #[serde(rename = "parameterNames")]
    Many(Vec<String>),
}

/// Notification that parameters of a scope were durably written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterChangeEvent {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(flatten)]
    pub changed: ChangedParameters,
}

impl ParameterChangeEvent {
    /// Event for a single updated parameter.
    pub fn single(scope: &Scope, name: impl Into<String>) -> Self {
        Self {
            user_id: scope.user_id.clone(),
            app_name: scope.app_name.clone(),
            changed: ChangedParameters::Single(name.into()),
        }
    }

    /// Event for a batch of updated parameters.
    pub fn many(scope: &Scope, names: Vec<String>) -> Self {
        Self {
            user_id: scope.user_id.clone(),
            app_name: scope.app_name.clone(),
            changed: ChangedParameters::Many(names),
        }
    }

    /// The scope the event refers to.
    pub fn scope(&self) -> Scope {
        Scope {
            user_id: self.user_id.clone(),
            app_name: self.app_name.clone(),
        }
    }

    /// Header pairs for transports that carry metadata as message headers.
    ///
    /// A batch is joined with commas under [`HEADER_PARAMETER_NAMES`].
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![(HEADER_USER_ID, self.user_id.clone())];
        if let Some(ref app) = self.app_name {
            headers.push((HEADER_APP_NAME, app.clone()));
        }
        match &self.changed {
            ChangedParameters::Single(name) => headers.push((HEADER_PARAMETER_NAME, name.clone())),
            ChangedParameters::Many(names) => {
                headers.push((HEADER_PARAMETER_NAMES, names.join(",")));
            }
        }
        headers
    }
}
