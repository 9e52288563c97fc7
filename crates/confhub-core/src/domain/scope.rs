//! Identity scope under which parameters are grouped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Owner of a parameter set.
///
/// A scope is a user identity plus an optional application name. The flat
/// per-user scope (`app_name == None`) is distinct from every named
/// application, including one named `"common"` or `""`. Both components are
/// opaque and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

impl Scope {
    /// Flat scope holding the user's parameters outside of any application.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            app_name: None,
        }
    }

    /// Scope of one named application for a user.
    pub fn app(user_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            app_name: Some(app_name.into()),
        }
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.app_name {
            Some(app) => write!(f, "{}/{}", self.user_id, app),
            None => f.write_str(&self.user_id),
        }
    }
}
