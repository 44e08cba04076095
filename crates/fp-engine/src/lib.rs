//! fp-engine: the styling core of figpolish.
//!
//! - [`scale`]: density → scale factor
//! - [`walker`]: panel enumeration and density grouping over a container tree
//! - [`stylist`]: per-panel and per-element styling
//! - [`legend`]: legend visibility, rebuilding and the interactive click state machine

pub mod error;
pub mod legend;
pub mod scale;
pub mod stylist;
pub mod walker;

pub use error::{LegendError, StyleError, StyleResult};
pub use legend::{
    ClickOutcome, LegendState, column_count, on_entry_click, should_show, sync_legend,
};
pub use scale::{EXTRAPOLATION_EXPONENT, NEIGHBOR_TOLERANCE, scale_factor};
pub use stylist::{
    ScaledSizes, StyleOutcome, apply_panel_label, panel_label_text, statistic, style_panel,
};
pub use walker::{
    DensityGroup, Enumeration, GroupId, GroupKind, PanelEntry, TraversalWarning,
    enumerate_explicit, enumerate_panels,
};
