//! Workspace result alias.

use crate::errors::ErrorEnvelope;

/// Result type used across crate boundaries.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;
