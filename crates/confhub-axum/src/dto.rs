//! Query-string DTOs for the parameter routes.

use serde::Deserialize;

/// `?names=a,b` filter on listings.
#[derive(Debug, Default, Deserialize)]
pub struct NamesQuery {
    pub names: Option<String>,
}

impl NamesQuery {
    /// Requested names; empty when no filter was given.
    pub fn names(&self) -> Vec<String> {
        self.names
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `?value=v` on single-parameter updates.
#[derive(Debug, Deserialize)]
pub struct ValueQuery {
    pub value: String,
}

/// `?userId=u` restricting the event stream to one user.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}
