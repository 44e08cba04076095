//! Errors shared by every figpolish crate.

use thiserror::Error;

pub type FpResult<T> = Result<T, FpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FpError {
    /// A computed size or factor came out NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A structural rule of the scene does not hold.
    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
