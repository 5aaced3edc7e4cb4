//! Configuration Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source could not be read or had the wrong shape.
    #[display("could not load configuration")]
    Load,
    /// Configuration loaded but a value is out of range.
    #[display("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
