//! Error types for styling and legend interaction.

use fp_core::{ElementId, FpError, PanelId};
use thiserror::Error;

pub type StyleResult<T> = Result<T, StyleError>;

/// A styling step that could not be applied.
///
/// Element-level errors are collected in the styling outcome; they never stop
/// the rest of the panel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StyleError {
    #[error(transparent)]
    Core(#[from] FpError),

    #[error("Palette has no colors")]
    EmptyPalette,

    #[error("No {what} styles to cycle through")]
    EmptyCycle { what: &'static str },

    #[error("Element {element} ({kind}) has an invalid color")]
    InvalidColor {
        element: ElementId,
        kind: &'static str,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LegendError {
    #[error("Panel {panel} has no legend")]
    NoLegend { panel: PanelId },

    #[error("Legend entry {index} out of range (legend has {len} entries)")]
    EntryOutOfRange { index: usize, len: usize },

    #[error("Legend entry refers to missing element {element}")]
    MissingElement { element: ElementId },
}
