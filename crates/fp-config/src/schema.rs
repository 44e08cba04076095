//! Configuration schema definitions.

use fp_core::{FpError, FpResult, Rgb};
use fp_scene::{
    AxesLayer, Corner, FontWeight, Interpreter, LegendLocation, LineStyleKind, MarkerKind,
    TickDirection,
};
use serde::{Deserialize, Serialize};

/// The full styling configuration.
///
/// Every field is required when deserializing: the resolver always builds the
/// record from a complete default record, never from a partial map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigRecord {
    pub style_preset: String,

    // Typography
    pub font_name: String,
    pub base_font_size: f64,
    pub title_scale: f64,
    pub label_scale: f64,
    pub legend_font_scale: f64,
    pub global_scale_factor: f64,
    pub min_font_size: f64,
    pub title_font_weight: FontWeight,
    pub label_font_weight: FontWeight,
    pub interpreter: Interpreter,

    // Lines and markers
    pub plot_line_width: f64,
    pub axis_to_plot_linewidth_ratio: f64,
    pub min_line_width: f64,
    pub marker_size: f64,
    pub min_marker_size: f64,
    pub errorbar_cap_ratio: f64,
    /// Keep the observed cap formula (unscaled marker size x ratio x scale).
    pub errorbar_legacy_cap_scaling: bool,
    pub fill_markers: bool,
    pub scatter_face_alpha: f64,
    pub bar_edge_darken: f64,
    pub surface_edge_alpha: f64,

    // Color and cycling
    pub color_palette: PaletteName,
    pub custom_color_palette: Vec<Rgb>,
    pub cycle_marker_styles: CycleMode,
    pub cycle_line_styles: CycleMode,
    pub marker_cycle_threshold: u32,
    pub marker_styles: Vec<MarkerKind>,
    pub line_style_order: Vec<LineStyleKind>,
    pub axis_color: Rgb,
    pub text_color: Rgb,
    pub figure_background_color: Rgb,
    pub axes_background_color: Rgb,

    // Axes
    pub grid_density: GridDensity,
    pub minor_ticks: bool,
    pub box_style: BoxStyle,
    pub tick_direction: TickDirection,
    pub axes_layer: AxesLayer,
    pub style_colorbars: bool,
    pub style_polar_axes: bool,

    // Legend
    pub legend_location: LegendLocation,
    pub legend_reverse_order: bool,
    pub smart_legend_display: bool,
    pub force_single_legend_entry: bool,
    pub legend_box: bool,
    /// 0 picks a column count from the entry count.
    pub legend_num_columns: u32,
    pub interactive_legend: bool,
    pub legend_fade_alpha: f64,
    pub legend_fade_color: Rgb,

    // Density scaling: `[density, factor]` control points
    pub density_scaling: Vec<(u32, f64)>,
    pub min_scale_factor: f64,
    pub max_scale_factor: f64,

    // Traversal
    pub exclude_tags: Vec<String>,

    // Logging: 0 = silent, 1 = warnings/info, 2 = detailed trace
    pub verbosity: u8,

    pub export_settings: ExportSettings,
    pub overlay_settings: OverlaySettings,
    pub panel_labeling: PanelLabeling,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            style_preset: "default".to_string(),
            font_name: "Helvetica".to_string(),
            base_font_size: 11.0,
            title_scale: 1.2,
            label_scale: 1.1,
            legend_font_scale: 0.9,
            global_scale_factor: 1.0,
            min_font_size: 6.0,
            title_font_weight: FontWeight::Bold,
            label_font_weight: FontWeight::Normal,
            interpreter: Interpreter::Tex,
            plot_line_width: 1.5,
            axis_to_plot_linewidth_ratio: 0.5,
            min_line_width: 0.75,
            marker_size: 6.0,
            min_marker_size: 3.0,
            errorbar_cap_ratio: 1.0,
            errorbar_legacy_cap_scaling: true,
            fill_markers: false,
            scatter_face_alpha: 0.7,
            bar_edge_darken: 0.3,
            surface_edge_alpha: 0.3,
            color_palette: PaletteName::Tab10,
            custom_color_palette: Vec::new(),
            cycle_marker_styles: CycleMode::Auto,
            cycle_line_styles: CycleMode::Off,
            marker_cycle_threshold: 7,
            marker_styles: vec![
                MarkerKind::Circle,
                MarkerKind::Square,
                MarkerKind::TriangleUp,
                MarkerKind::Diamond,
                MarkerKind::TriangleDown,
                MarkerKind::Cross,
                MarkerKind::Plus,
            ],
            line_style_order: vec![
                LineStyleKind::Solid,
                LineStyleKind::Dashed,
                LineStyleKind::Dotted,
                LineStyleKind::DashDot,
            ],
            axis_color: Rgb::new(0.15, 0.15, 0.15),
            text_color: Rgb::new(0.1, 0.1, 0.1),
            figure_background_color: Rgb::WHITE,
            axes_background_color: Rgb::WHITE,
            grid_density: GridDensity::Normal,
            minor_ticks: true,
            box_style: BoxStyle::On,
            tick_direction: TickDirection::In,
            axes_layer: AxesLayer::Top,
            style_colorbars: true,
            style_polar_axes: true,
            legend_location: LegendLocation::Best,
            legend_reverse_order: false,
            smart_legend_display: true,
            force_single_legend_entry: false,
            legend_box: true,
            legend_num_columns: 0,
            interactive_legend: true,
            legend_fade_alpha: 0.25,
            legend_fade_color: Rgb::new(0.6, 0.6, 0.6),
            density_scaling: vec![
                (1, 1.0),
                (2, 0.95),
                (4, 0.85),
                (6, 0.8),
                (9, 0.75),
                (12, 0.7),
                (16, 0.65),
            ],
            min_scale_factor: 0.5,
            max_scale_factor: 1.2,
            exclude_tags: vec![
                "legend_internal".to_string(),
                "colorbar_internal".to_string(),
                "fp_ignore".to_string(),
            ],
            verbosity: 1,
            export_settings: ExportSettings::default(),
            overlay_settings: OverlaySettings::default(),
            panel_labeling: PanelLabeling::default(),
        }
    }
}

impl ConfigRecord {
    /// The density scaling table with its bounds.
    pub fn scaling_table(&self) -> FpResult<ScalingTable> {
        ScalingTable::new(
            self.density_scaling.clone(),
            self.min_scale_factor,
            self.max_scale_factor,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteName {
    Lines,
    Tab10,
    OkabeIto,
    Viridis,
    Grayscale,
    Custom,
}

/// Marker/line-style cycling: forced on, forced off, or on above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleMode {
    Auto,
    On,
    Off,
}

impl CycleMode {
    /// Whether cycling applies to a panel with `candidates` legend candidates.
    pub fn is_active(self, candidates: usize, threshold: u32) -> bool {
        match self {
            CycleMode::On => true,
            CycleMode::Off => false,
            CycleMode::Auto => candidates > threshold as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridDensity {
    /// Major and minor grid lines.
    Normal,
    MajorOnly,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxStyle {
    On,
    Off,
    /// No box, and the top/right axis lines are hidden.
    LeftBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Tiff,
    Pdf,
    Eps,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Tiff => "tif",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Eps => "eps",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn is_raster(self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Jpeg | ExportFormat::Tiff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSettings {
    pub enabled: bool,
    /// Base name without extension; empty picks a timestamped name.
    pub filename: String,
    pub output_dir: String,
    pub format: ExportFormat,
    /// Raster resolution in dots per inch.
    pub resolution: u32,
    pub open_after_export: bool,
    pub transparent_background: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: String::new(),
            output_dir: ".".to_string(),
            format: ExportFormat::Png,
            resolution: 300,
            open_after_export: false,
            transparent_background: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Std,
    Min,
    Max,
    Median,
    Count,
}

impl Statistic {
    pub fn label(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Median => "median",
            Statistic::Count => "n",
        }
    }
}

/// Statistics text box drawn inside each panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlaySettings {
    pub enabled: bool,
    pub statistics: Vec<Statistic>,
    pub position: Corner,
    pub font_scale: f64,
    pub precision: u32,
    pub background_alpha: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            statistics: vec![Statistic::Mean, Statistic::Std],
            position: Corner::Northeast,
            font_scale: 0.8,
            precision: 2,
            background_alpha: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelStyle {
    #[serde(rename = "a")]
    Lower,
    #[serde(rename = "(a)")]
    LowerParen,
    #[serde(rename = "A")]
    Upper,
    #[serde(rename = "(A)")]
    UpperParen,
    #[serde(rename = "i")]
    Roman,
}

/// Sequential `a`, `b`, ... labels in panel corners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelLabeling {
    pub enabled: bool,
    pub style: LabelStyle,
    pub position: Corner,
    pub font_scale: f64,
    pub font_weight: FontWeight,
}

impl Default for PanelLabeling {
    fn default() -> Self {
        Self {
            enabled: false,
            style: LabelStyle::LowerParen,
            position: Corner::Northwest,
            font_scale: 1.2,
            font_weight: FontWeight::Bold,
        }
    }
}

/// Sparse density → factor control points with output bounds.
///
/// Points are sorted by density, densities are unique and positive, and
/// factors never increase with density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingTable {
    points: Vec<(u32, f64)>,
    min_factor: f64,
    max_factor: f64,
}

impl ScalingTable {
    pub fn new(mut points: Vec<(u32, f64)>, min_factor: f64, max_factor: f64) -> FpResult<Self> {
        if points.is_empty() {
            return Err(FpError::InvalidArg {
                what: "scaling table needs at least one control point",
            });
        }
        if !(min_factor.is_finite() && max_factor.is_finite())
            || min_factor <= 0.0
            || min_factor > max_factor
        {
            return Err(FpError::InvalidArg {
                what: "scale bounds must satisfy 0 < min <= max",
            });
        }
        points.sort_by_key(|(d, _)| *d);
        for (d, f) in &points {
            if *d == 0 || !f.is_finite() || *f <= 0.0 {
                return Err(FpError::InvalidArg {
                    what: "control points need density >= 1 and a positive factor",
                });
            }
        }
        for pair in points.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(FpError::InvalidArg {
                    what: "control point densities must be unique",
                });
            }
            if pair[1].1 > pair[0].1 {
                return Err(FpError::InvalidArg {
                    what: "control point factors must not increase with density",
                });
            }
        }
        Ok(Self {
            points,
            min_factor,
            max_factor,
        })
    }

    /// A table that never scales (factor 1 at every density).
    pub fn identity() -> Self {
        Self {
            points: vec![(1, 1.0)],
            min_factor: 1.0,
            max_factor: 1.0,
        }
    }

    pub fn points(&self) -> &[(u32, f64)] {
        &self.points
    }

    pub fn min_factor(&self) -> f64 {
        self.min_factor
    }

    pub fn max_factor(&self) -> f64 {
        self.max_factor
    }
}
