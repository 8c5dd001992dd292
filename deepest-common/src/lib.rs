//! Common types and utilities shared across the deepest-text crates.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`DeepestError`] and [`Result`]: Shared error handling
//! - [`OutputFormat`]: how the binary renders a scan result
//!
//! ```rust
//! use deepest_common::{DeepestError, OutputFormat};
//!
//! assert_eq!(OutputFormat::default(), OutputFormat::Text);
//! let err = DeepestError::Fetch("network error: refused".into());
//! assert_eq!(err.to_string(), "Fetch error: network error: refused");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Preferred output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The deepest text (or the malformed sentinel) on one line.
    #[default]
    Text,
    /// One JSON object with the URL, outcome and recorded depth.
    Json,
}

/// Error types used across the workspace.
#[derive(thiserror::Error, Debug)]
pub enum DeepestError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The page could not be read: bad URL, transport failure, or a status
    /// other than 200.
    #[error("Fetch error: {0}")]
    Fetch(String),
}

/// Convenient alias for results that use [`DeepestError`].
pub type Result<T> = std::result::Result<T, DeepestError>;
