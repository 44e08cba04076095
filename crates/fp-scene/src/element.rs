//! Plot elements: the drawable children of a panel.

use fp_core::{ElementId, Rgb};
use serde::{Deserialize, Serialize};

/// Stroke pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStyleKind {
    #[serde(rename = "-")]
    Solid,
    #[serde(rename = "--")]
    Dashed,
    #[serde(rename = ":")]
    Dotted,
    #[serde(rename = "-.")]
    DashDot,
    #[serde(rename = "none")]
    None,
}

/// Marker glyph drawn at each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "o")]
    Circle,
    #[serde(rename = "s")]
    Square,
    #[serde(rename = "d")]
    Diamond,
    #[serde(rename = "^")]
    TriangleUp,
    #[serde(rename = "v")]
    TriangleDown,
    #[serde(rename = "x")]
    Cross,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = ".")]
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpreter {
    #[default]
    Tex,
    Latex,
    None,
}

/// Line or polar trace properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesProps {
    pub color: Rgb,
    pub line_width: f64,
    pub line_style: LineStyleKind,
    pub marker: MarkerKind,
    pub marker_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_face: Option<Rgb>,
    #[serde(default)]
    pub y_data: Vec<f64>,
}

impl Default for SeriesProps {
    fn default() -> Self {
        Self {
            color: Rgb::new(0.0, 0.447, 0.741),
            line_width: 0.5,
            line_style: LineStyleKind::Solid,
            marker: MarkerKind::None,
            marker_size: 6.0,
            marker_face: None,
            y_data: Vec::new(),
        }
    }
}

/// Scatter properties. `size` is the marker area in points squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterProps {
    pub size: f64,
    pub marker: MarkerKind,
    pub face_color: Rgb,
    pub face_alpha: f64,
    pub edge_color: Rgb,
    pub line_width: f64,
    #[serde(default)]
    pub y_data: Vec<f64>,
}

impl Default for ScatterProps {
    fn default() -> Self {
        Self {
            size: 36.0,
            marker: MarkerKind::Circle,
            face_color: Rgb::new(0.0, 0.447, 0.741),
            face_alpha: 1.0,
            edge_color: Rgb::new(0.0, 0.447, 0.741),
            line_width: 0.5,
            y_data: Vec::new(),
        }
    }
}

/// Bar and histogram properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarProps {
    pub face_color: Rgb,
    pub edge_color: Rgb,
    pub line_width: f64,
    #[serde(default)]
    pub y_data: Vec<f64>,
}

impl Default for BarProps {
    fn default() -> Self {
        Self {
            face_color: Rgb::new(0.0, 0.447, 0.741),
            edge_color: Rgb::BLACK,
            line_width: 0.5,
            y_data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBarProps {
    pub color: Rgb,
    pub line_width: f64,
    pub line_style: LineStyleKind,
    pub cap_size: f64,
    pub marker: MarkerKind,
    pub marker_size: f64,
    #[serde(default)]
    pub y_data: Vec<f64>,
}

impl Default for ErrorBarProps {
    fn default() -> Self {
        Self {
            color: Rgb::new(0.0, 0.447, 0.741),
            line_width: 0.5,
            line_style: LineStyleKind::Solid,
            cap_size: 6.0,
            marker: MarkerKind::None,
            marker_size: 6.0,
            y_data: Vec::new(),
        }
    }
}

/// Surface (mesh) properties. Face colors come from the colormap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceProps {
    pub edge_color: Rgb,
    pub edge_alpha: f64,
    pub face_alpha: f64,
    pub line_width: f64,
}

impl Default for SurfaceProps {
    fn default() -> Self {
        Self {
            edge_color: Rgb::BLACK,
            edge_alpha: 1.0,
            face_alpha: 1.0,
            line_width: 0.5,
        }
    }
}

/// A text run: titles, axis labels and free annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    pub text: String,
    pub font_size: f64,
    #[serde(default)]
    pub font_name: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub interpreter: Interpreter,
    pub color: Rgb,
}

impl TextProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 10.0,
            font_name: String::new(),
            font_weight: FontWeight::Normal,
            interpreter: Interpreter::Tex,
            color: Rgb::new(0.15, 0.15, 0.15),
        }
    }
}

/// Closed set of element variants a panel may hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementKind {
    Line(SeriesProps),
    Polar(SeriesProps),
    Scatter(ScatterProps),
    Bar(BarProps),
    Histogram(BarProps),
    ErrorBar(ErrorBarProps),
    Surface(SurfaceProps),
    Annotation(TextProps),
}

impl ElementKind {
    pub fn line() -> Self {
        Self::Line(SeriesProps::default())
    }

    pub fn polar() -> Self {
        Self::Polar(SeriesProps::default())
    }

    pub fn scatter() -> Self {
        Self::Scatter(ScatterProps::default())
    }

    pub fn bar() -> Self {
        Self::Bar(BarProps::default())
    }

    pub fn histogram() -> Self {
        Self::Histogram(BarProps::default())
    }

    pub fn error_bar() -> Self {
        Self::ErrorBar(ErrorBarProps::default())
    }

    pub fn surface() -> Self {
        Self::Surface(SurfaceProps::default())
    }

    pub fn annotation(text: impl Into<String>) -> Self {
        Self::Annotation(TextProps::new(text))
    }

    /// Whether the variant draws data (and may therefore appear in a legend).
    pub fn is_plottable(&self) -> bool {
        !matches!(self, Self::Annotation(_))
    }

    /// Short human name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Polar(_) => "polar",
            Self::Scatter(_) => "scatter",
            Self::Bar(_) => "bar",
            Self::Histogram(_) => "histogram",
            Self::ErrorBar(_) => "errorbar",
            Self::Surface(_) => "surface",
            Self::Annotation(_) => "annotation",
        }
    }

    /// Dependent-axis samples, when the variant carries any.
    pub fn y_data(&self) -> Option<&[f64]> {
        match self {
            Self::Line(p) | Self::Polar(p) => Some(&p.y_data),
            Self::Scatter(p) => Some(&p.y_data),
            Self::Bar(p) | Self::Histogram(p) => Some(&p.y_data),
            Self::ErrorBar(p) => Some(&p.y_data),
            Self::Surface(_) | Self::Annotation(_) => None,
        }
    }

    /// Attach y samples to a data-carrying variant; no-op otherwise.
    pub fn with_y_data(mut self, data: Vec<f64>) -> Self {
        match &mut self {
            Self::Line(p) | Self::Polar(p) => p.y_data = data,
            Self::Scatter(p) => p.y_data = data,
            Self::Bar(p) | Self::Histogram(p) => p.y_data = data,
            Self::ErrorBar(p) => p.y_data = data,
            Self::Surface(_) | Self::Annotation(_) => {}
        }
        self
    }

    /// Representative color for legend icons.
    pub fn icon_color(&self) -> Option<Rgb> {
        match self {
            Self::Line(p) | Self::Polar(p) => Some(p.color),
            Self::Scatter(p) => Some(p.face_color),
            Self::Bar(p) | Self::Histogram(p) => Some(p.face_color),
            Self::ErrorBar(p) => Some(p.color),
            Self::Surface(p) => Some(p.edge_color),
            Self::Annotation(_) => None,
        }
    }
}

/// One child of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotElement {
    pub id: ElementId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Explicit request for a legend icon even without a display name.
    #[serde(default)]
    pub legend_icon: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub kind: ElementKind,
}

fn default_visible() -> bool {
    true
}

impl PlotElement {
    pub fn new(id: ElementId, display_name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            visible: true,
            legend_icon: false,
            tags: Vec::new(),
            kind,
        }
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    /// Visible, plottable, and either named or flagged for a legend icon.
    pub fn is_legend_candidate(&self) -> bool {
        self.visible
            && self.kind.is_plottable()
            && (!self.display_name.trim().is_empty() || self.legend_icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::Id;

    #[test]
    fn candidate_rules() {
        let mut e = PlotElement::new(Id::from_index(0), "", ElementKind::line());
        assert!(!e.is_legend_candidate());
        e.legend_icon = true;
        assert!(e.is_legend_candidate());
        e.visible = false;
        assert!(!e.is_legend_candidate());

        let note = PlotElement::new(Id::from_index(1), "note", ElementKind::annotation("hi"));
        assert!(!note.is_legend_candidate());
    }

    #[test]
    fn y_data_only_on_data_variants() {
        let line = ElementKind::line().with_y_data(vec![1.0, 2.0]);
        assert_eq!(line.y_data(), Some(&[1.0, 2.0][..]));
        let surf = ElementKind::surface().with_y_data(vec![1.0]);
        assert!(surf.y_data().is_none());
    }

    #[test]
    fn marker_serializes_as_glyph() {
        let json = serde_json::to_string(&MarkerKind::TriangleUp).unwrap();
        assert_eq!(json, "\"^\"");
        let style: LineStyleKind = serde_json::from_str("\"-.\"").unwrap();
        assert_eq!(style, LineStyleKind::DashDot);
    }
}
