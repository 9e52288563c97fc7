//! HTTP handlers, one module per resource.

pub mod events;
pub mod parameters;
pub mod ui_parameters;
