/// Domain module containing core business logic and data types
///
/// This module defines the habit counter entity, the non-empty name wrapper,
/// and the closed error taxonomy shared by the domain and storage layers.

pub mod counter;
pub mod text;

// Re-export public types for easy access
pub use counter::*;
pub use text::*;

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during domain operations
///
/// Every failure in the domain layer is a value of this closed set; nothing
/// here is thrown or fatal. `StoreFailure` carries the underlying storage
/// error as an opaque, shareable cause so snapshots holding error entries
/// stay cheap to clone.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("habit name must not be empty")]
    EmptyName,

    #[error("store is already populated")]
    StoreAlreadyPopulated,

    #[error("store failure: {0}")]
    StoreFailure(Arc<dyn std::error::Error + Send + Sync>),

    #[error("habit id must be positive")]
    IdMustBePositive,

    #[error("number of days must not be negative")]
    DaysMustBeNonNegative,

    #[error("timestamp could not be resolved to a local date-time")]
    TimestampConversionFailure,

    #[error("habit was already increased today")]
    AlreadyIncreasedToday,
}

impl DomainError {
    /// Wrap an arbitrary storage-layer error as an opaque store failure
    pub fn store_failure(cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::StoreFailure(Arc::new(cause))
    }
}
