//! Error type for contract violations.
//!
//! Blocked movement and failed pushes are ordinary outcomes and are reported
//! as `Ok(false)`; only malformed input and stale handles end up here.

use thiserror::Error;

use crate::utils::allocator::SolidId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolidError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown solid {0}")]
    UnknownSolid(SolidId),
}

pub type Result<T> = std::result::Result<T, SolidError>;

pub(crate) fn ensure_finite(what: &str, x: f32, y: f32) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(SolidError::InvalidArgument(format!(
            "{what} must be finite, got ({x}, {y})"
        )))
    }
}
