//! fp-scene: in-memory scene graph for figpolish.
//!
//! Provides:
//! - Containers (windows, tabs, tiled grids) and panels in an id-addressed arena
//! - Plot element variants, legends and legend interaction state
//! - Incremental scene builder with structural validation
//!
//! # Example
//!
//! ```
//! use fp_scene::{ElementKind, PanelKind, SceneBuilder};
//!
//! let mut builder = SceneBuilder::new();
//! let window = builder.add_window("Figure 1");
//! let grid = builder.add_grid(window, "layout", 1, 2);
//! let left = builder.add_panel(grid, PanelKind::Cartesian);
//! builder.add_element(left, "signal", ElementKind::line());
//! let scene = builder.build().unwrap();
//!
//! assert_eq!(scene.panels().count(), 1);
//! assert_eq!(scene.current(), Some(window));
//! ```

pub mod builder;
pub mod element;
pub mod error;
pub mod legend;
pub mod panel;
pub mod scene;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::SceneBuilder;
pub use element::{
    BarProps, ElementKind, ErrorBarProps, FontWeight, Interpreter, LineStyleKind, MarkerKind,
    PlotElement, ScatterProps, SeriesProps, SurfaceProps, TextProps,
};
pub use error::SceneError;
pub use legend::{Legend, LegendEntry, LegendInteractionState, LegendLocation};
pub use panel::{
    AxesLayer, AxesStyle, ColorAxis, Corner, CornerText, Panel, PanelKind, TickDirection,
};
pub use scene::{Container, ContainerKind, Scene};
