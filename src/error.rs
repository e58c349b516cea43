//! Error types for the score parser.
//!
//! The IOL core never propagates an error (spec §7): absence is always
//! `None`/`false`/an empty container. The only fallible boundary in this
//! crate is turning caller-supplied text or floats into an exact [`crate::score::Score`].

use thiserror::Error;

/// Failure parsing a caller-supplied score representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreParseError {
    #[error("score is not a valid decimal number")]
    InvalidFormat,
    #[error("score is NaN or otherwise not finite")]
    NotFinite,
}
