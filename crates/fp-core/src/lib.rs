//! fp-core: stable foundation for figpolish.
//!
//! Contains:
//! - ids (compact typed IDs for containers, panels and plot elements)
//! - numeric (finite checks and step rounding for scaled sizes)
//! - color (RGB triples and the shading math used by styling)
//! - error (shared error types)

pub mod color;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use color::Rgb;
pub use error::{FpError, FpResult};
pub use ids::*;
pub use numeric::*;
