//! fp-app: application service layer for figpolish.
//!
//! This crate sits between the front-end and the library crates and provides:
//! - The beautify orchestrator (config resolution, traversal, scaling,
//!   styling, legends, panel labels, export hand-off)
//! - Verbosity-gated run reporting
//! - Scene file I/O
//!
//! Front-ends depend on this crate instead of driving fp-engine directly.

pub mod beautify;
pub mod error;
pub mod export;
pub mod log;
pub mod scene_io;

pub use beautify::{
    BeautifyReport, BeautifyRequest, PanelReport, Target, beautify, beautify_current,
    click_legend_entry,
};
pub use error::{AppError, AppResult};
pub use export::{
    DryRunExporter, ExportRequest, Exporter, default_filename, open_with_default_viewer,
};
pub use log::Verbosity;
pub use scene_io::{load_scene, save_scene};
