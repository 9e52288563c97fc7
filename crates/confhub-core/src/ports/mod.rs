//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - No broker or HTTP transport details
//! - Reads signal absence with `Option`/empty `Vec`, never with an error

pub mod change_notifier;
pub mod parameter_repository;

use thiserror::Error;

pub use change_notifier::{ChangeNotifier, NoopNotifier, NotifierError};
pub use parameter_repository::ParameterRepository;

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
/// Absence is reported as an empty result, never as an error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backing store unreachable, or the operation failed or timed out.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters should map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
