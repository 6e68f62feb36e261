// src/engine/error.rs

use thiserror::Error;

use crate::repository::StoreError;

/// Failures of exam composition and scoring.
///
/// Stale answer references are not represented: the scorer skips them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing profile or an empty question bank.
    #[error("{0}")]
    NotFound(String),

    /// Input the engine refuses to work with (missing major, bad answer letter).
    #[error("{0}")]
    Validation(String),

    /// The bank cannot supply enough questions for a bucket.
    #[error("insufficient question bank for {bucket}: needed {needed}, have {available}")]
    InsufficientPool {
        bucket: String,
        needed: usize,
        available: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Missing question count for `InsufficientPool`, `None` otherwise.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            EngineError::InsufficientPool {
                needed, available, ..
            } => Some(needed.saturating_sub(*available)),
            _ => None,
        }
    }
}
