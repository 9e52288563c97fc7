//! Domain types for the parameter store.
//!
//! These are pure domain types with no infrastructure dependencies.
//! Storage adapters and HTTP handlers convert to and from them.

mod parameter;
mod scope;
mod ui_parameters;

pub use parameter::Parameter;
pub use scope::Scope;
pub use ui_parameters::{UI_PARAMETER_DEFAULTS, UiParameters, UiParametersUpdate};
