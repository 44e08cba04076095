//! Verbosity-gated reporting for a beautify run.
//!
//! The engine crates log through `tracing` at debug/trace level. What the user
//! asked to hear about a run (resolution warnings, skipped subtrees, the
//! summary line) goes through [`Verbosity`], taken from the resolved
//! `verbosity` field.

use std::fmt::Display;

use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing is reported.
    Silent,
    /// Warnings and the run summary.
    #[default]
    Normal,
    /// Everything, including per-panel detail.
    Trace,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Normal,
            _ => Verbosity::Trace,
        }
    }

    pub fn reports_warnings(self) -> bool {
        self >= Verbosity::Normal
    }

    pub fn reports_detail(self) -> bool {
        self >= Verbosity::Trace
    }

    pub fn warn(self, message: impl Display) {
        if self.reports_warnings() {
            warn!("{message}");
        }
    }

    pub fn info(self, message: impl Display) {
        if self.reports_warnings() {
            info!("{message}");
        }
    }

    pub fn detail(self, message: impl Display) {
        if self.reports_detail() {
            debug!("{message}");
        }
    }

    /// Report each item of `items` as a warning prefixed with `context`.
    pub fn warn_all<I>(self, context: &str, items: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for item in items {
            self.warn(format_args!("{context}: {item}"));
        }
    }
}
