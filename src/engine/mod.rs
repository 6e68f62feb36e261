// src/engine/mod.rs

//! Exam composition and scoring.
//!
//! `composer` builds an attempt for a profile from the question bank;
//! `scorer` grades a submission. Both are stateless and talk to storage only
//! through the traits in `crate::repository`.

pub mod classify;
pub mod composer;
pub mod difficulty;
pub mod error;
pub mod labels;
pub mod quota;
pub mod sampler;
pub mod scorer;

pub use composer::compose_exam;
pub use error::EngineError;
pub use scorer::score_exam;
