#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod memory;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Parameter, Scope, UI_PARAMETER_DEFAULTS, UiParameters, UiParametersUpdate};
pub use events::{ChangedParameters, ParameterChangeEvent};
pub use memory::InMemoryParameterRepository;
pub use ports::{
    ChangeNotifier, CoreError, NoopNotifier, NotifierError, ParameterRepository, RepositoryError,
};
pub use services::ConfigService;

