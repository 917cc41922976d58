//! Mathlang prelude.

/// Result type in Mathlang.
pub type Result<T> = std::result::Result<T, Box<crate::error::Error>>;
