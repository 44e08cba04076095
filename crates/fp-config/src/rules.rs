//! Declarative per-field validation rules.
//!
//! Each rule checks one value of the merged configuration map and returns its
//! canonical form, or a reason string when the value is unusable.

use fp_core::Rgb;
use fp_scene::{
    AxesLayer, Corner, FontWeight, Interpreter, LegendLocation, LineStyleKind, MarkerKind,
    TickDirection,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};

use crate::schema::{
    BoxStyle, ExportFormat, GridDensity, LabelStyle, PaletteName, Statistic,
};

pub type Canonicalize = fn(&Value) -> Result<Value, String>;

#[derive(Clone, Copy)]
pub enum Rule {
    /// Finite number within `min..=max`.
    Number { min: f64, max: f64 },
    /// Whole number within `min..=max`.
    Integer { min: i64, max: i64 },
    Bool,
    Text { allow_empty: bool },
    TextList,
    Color,
    ColorList,
    /// `true`, `false` or `"auto"`.
    Cycle,
    /// `[[density, factor], ...]` or `{density: factor}`.
    ScalingPoints,
    Typed(Canonicalize),
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Number { min, max } => write!(f, "Number({min}..={max})"),
            Rule::Integer { min, max } => write!(f, "Integer({min}..={max})"),
            Rule::Bool => f.write_str("Bool"),
            Rule::Text { allow_empty } => write!(f, "Text(allow_empty={allow_empty})"),
            Rule::TextList => f.write_str("TextList"),
            Rule::Color => f.write_str("Color"),
            Rule::ColorList => f.write_str("ColorList"),
            Rule::Cycle => f.write_str("Cycle"),
            Rule::ScalingPoints => f.write_str("ScalingPoints"),
            Rule::Typed(_) => f.write_str("Typed"),
        }
    }
}

/// A rule bound to a dotted field path (`export_settings.resolution`).
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub rule: Rule,
}

const fn field(path: &'static str, rule: Rule) -> FieldRule {
    FieldRule { path, rule }
}

const fn number(min: f64, max: f64) -> Rule {
    Rule::Number { min, max }
}

const fn integer(min: i64, max: i64) -> Rule {
    Rule::Integer { min, max }
}

const UNIT: Rule = number(0.0, 1.0);

/// The rule table, one entry per leaf field of `ConfigRecord`.
pub fn field_rules() -> Vec<FieldRule> {
    vec![
        field("style_preset", Rule::Text { allow_empty: false }),
        field("font_name", Rule::Text { allow_empty: false }),
        field("base_font_size", number(4.0, 72.0)),
        field("title_scale", number(0.5, 3.0)),
        field("label_scale", number(0.5, 3.0)),
        field("legend_font_scale", number(0.3, 3.0)),
        field("global_scale_factor", number(0.1, 5.0)),
        field("min_font_size", number(1.0, 40.0)),
        field("title_font_weight", Rule::Typed(typed::<FontWeight>)),
        field("label_font_weight", Rule::Typed(typed::<FontWeight>)),
        field("interpreter", Rule::Typed(typed::<Interpreter>)),
        field("plot_line_width", number(0.1, 10.0)),
        field("axis_to_plot_linewidth_ratio", number(0.1, 2.0)),
        field("min_line_width", number(0.1, 5.0)),
        field("marker_size", number(1.0, 50.0)),
        field("min_marker_size", number(1.0, 20.0)),
        field("errorbar_cap_ratio", number(0.0, 10.0)),
        field("errorbar_legacy_cap_scaling", Rule::Bool),
        field("fill_markers", Rule::Bool),
        field("scatter_face_alpha", UNIT),
        field("bar_edge_darken", UNIT),
        field("surface_edge_alpha", UNIT),
        field("color_palette", Rule::Typed(typed::<PaletteName>)),
        field("custom_color_palette", Rule::ColorList),
        field("cycle_marker_styles", Rule::Cycle),
        field("cycle_line_styles", Rule::Cycle),
        field("marker_cycle_threshold", integer(0, 100)),
        field("marker_styles", Rule::Typed(typed_list::<MarkerKind>)),
        field("line_style_order", Rule::Typed(typed_list::<LineStyleKind>)),
        field("axis_color", Rule::Color),
        field("text_color", Rule::Color),
        field("figure_background_color", Rule::Color),
        field("axes_background_color", Rule::Color),
        field("grid_density", Rule::Typed(typed::<GridDensity>)),
        field("minor_ticks", Rule::Bool),
        field("box_style", Rule::Typed(typed::<BoxStyle>)),
        field("tick_direction", Rule::Typed(typed::<TickDirection>)),
        field("axes_layer", Rule::Typed(typed::<AxesLayer>)),
        field("style_colorbars", Rule::Bool),
        field("style_polar_axes", Rule::Bool),
        field("legend_location", Rule::Typed(typed::<LegendLocation>)),
        field("legend_reverse_order", Rule::Bool),
        field("smart_legend_display", Rule::Bool),
        field("force_single_legend_entry", Rule::Bool),
        field("legend_box", Rule::Bool),
        field("legend_num_columns", integer(0, 10)),
        field("interactive_legend", Rule::Bool),
        field("legend_fade_alpha", UNIT),
        field("legend_fade_color", Rule::Color),
        field("density_scaling", Rule::ScalingPoints),
        field("min_scale_factor", number(0.01, 5.0)),
        field("max_scale_factor", number(0.01, 5.0)),
        field("exclude_tags", Rule::TextList),
        field("verbosity", integer(0, 2)),
        field("export_settings.enabled", Rule::Bool),
        field("export_settings.filename", Rule::Text { allow_empty: true }),
        field("export_settings.output_dir", Rule::Text { allow_empty: false }),
        field("export_settings.format", Rule::Typed(export_format)),
        field("export_settings.resolution", integer(72, 1200)),
        field("export_settings.open_after_export", Rule::Bool),
        field("export_settings.transparent_background", Rule::Bool),
        field("overlay_settings.enabled", Rule::Bool),
        field("overlay_settings.statistics", Rule::Typed(typed_list::<Statistic>)),
        field("overlay_settings.position", Rule::Typed(typed::<Corner>)),
        field("overlay_settings.font_scale", number(0.3, 3.0)),
        field("overlay_settings.precision", integer(0, 8)),
        field("overlay_settings.background_alpha", UNIT),
        field("panel_labeling.enabled", Rule::Bool),
        field("panel_labeling.style", Rule::Typed(typed::<LabelStyle>)),
        field("panel_labeling.position", Rule::Typed(typed::<Corner>)),
        field("panel_labeling.font_scale", number(0.3, 3.0)),
        field("panel_labeling.font_weight", Rule::Typed(typed::<FontWeight>)),
    ]
}

impl Rule {
    /// Validate `value` and return its canonical form.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        match *self {
            Rule::Number { min, max } => {
                let v = as_number(value)?;
                if !(min..=max).contains(&v) {
                    return Err(format!("expected a number in {min}..={max}"));
                }
                Ok(canonical_number(v))
            }
            Rule::Integer { min, max } => {
                let v = as_number(value)?;
                if v.fract() != 0.0 {
                    return Err("expected a whole number".to_string());
                }
                let v = v as i64;
                if !(min..=max).contains(&v) {
                    return Err(format!("expected an integer in {min}..={max}"));
                }
                Ok(Value::from(v))
            }
            Rule::Bool => as_bool(value).map(Value::Bool),
            Rule::Text { allow_empty } => match value {
                Value::String(s) if allow_empty || !s.trim().is_empty() => {
                    Ok(Value::String(s.trim().to_string()))
                }
                Value::String(_) => Err("expected a non-empty string".to_string()),
                _ => Err("expected a string".to_string()),
            },
            Rule::TextList => {
                let items = value.as_array().ok_or("expected a list of strings")?;
                items
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(|s| Value::String(s.to_string()))
                            .ok_or_else(|| "expected a list of strings".to_string())
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Rule::Color => parse_color(value).map(color_value),
            Rule::ColorList => {
                let items = value.as_array().ok_or("expected a list of colors")?;
                items
                    .iter()
                    .map(|v| parse_color(v).map(color_value))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Rule::Cycle => match value {
                Value::Bool(true) => Ok(Value::from("on")),
                Value::Bool(false) => Ok(Value::from("off")),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "auto" => Ok(Value::from("auto")),
                    "on" | "true" => Ok(Value::from("on")),
                    "off" | "false" => Ok(Value::from("off")),
                    _ => Err("expected true, false or \"auto\"".to_string()),
                },
                _ => Err("expected true, false or \"auto\"".to_string()),
            },
            Rule::ScalingPoints => parse_scaling_points(value),
            Rule::Typed(canonicalize) => canonicalize(value),
        }
    }
}

/// Accept any spelling serde accepts for `T`, then retry with the string
/// trimmed and lower-cased.
pub fn typed<T: DeserializeOwned + Serialize>(value: &Value) -> Result<Value, String> {
    let parsed = serde_json::from_value::<T>(value.clone()).or_else(|err| match value {
        Value::String(s) => {
            serde_json::from_value::<T>(Value::String(s.trim().to_ascii_lowercase()))
                .map_err(|_| err.to_string())
        }
        _ => Err(err.to_string()),
    })?;
    serde_json::to_value(parsed).map_err(|e| e.to_string())
}

/// Non-empty list whose items each pass [`typed`].
pub fn typed_list<T: DeserializeOwned + Serialize>(value: &Value) -> Result<Value, String> {
    let items = value.as_array().ok_or("expected a list")?;
    if items.is_empty() {
        return Err("expected a non-empty list".to_string());
    }
    items
        .iter()
        .map(typed::<T>)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn export_format(value: &Value) -> Result<Value, String> {
    match value.as_str().map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if s == "jpg" => Ok(Value::from("jpeg")),
        Some(s) if s == "tif" => Ok(Value::from("tiff")),
        _ => typed::<ExportFormat>(value),
    }
}

fn as_number(value: &Value) -> Result<f64, String> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err("expected a finite number".to_string()),
    }
}

/// Integral floats become integers.
fn canonical_number(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        Value::from(v as i64)
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

fn as_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => Ok(true),
            "false" | "off" | "no" => Ok(false),
            _ => Err("expected a boolean".to_string()),
        },
        _ => Err("expected a boolean".to_string()),
    }
}

/// `[r, g, b]` in 0..1 or 0..255, `#rrggbb`, or a basic color name.
pub fn parse_color(value: &Value) -> Result<Rgb, String> {
    match value {
        Value::String(s) => Rgb::from_hex(s)
            .or_else(|| Rgb::named(s))
            .ok_or_else(|| format!("unrecognized color '{s}'")),
        Value::Array(items) if items.len() == 3 => {
            let mut channels = [0.0; 3];
            for (slot, item) in channels.iter_mut().zip(items) {
                *slot = as_number(item).map_err(|_| "color channels must be numbers".to_string())?;
            }
            let max = channels.iter().copied().fold(0.0, f64::max);
            if channels.iter().any(|c| *c < 0.0) || max > 255.0 {
                return Err("color channels out of range".to_string());
            }
            let rgb = if max > 1.0 {
                Rgb::new(channels[0] / 255.0, channels[1] / 255.0, channels[2] / 255.0)
            } else {
                Rgb::new(channels[0], channels[1], channels[2])
            };
            Ok(rgb)
        }
        _ => Err("expected [r, g, b], #rrggbb or a color name".to_string()),
    }
}

fn color_value(rgb: Rgb) -> Value {
    Value::Array(rgb.to_array().into_iter().map(canonical_number).collect())
}

fn parse_scaling_points(value: &Value) -> Result<Value, String> {
    let mut points: Vec<(u32, f64)> = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([d, f]) => Ok((density(d)?, factor(f)?)),
                _ => Err("expected [density, factor] pairs".to_string()),
            })
            .collect::<Result<_, _>>()?,
        Value::Object(map) => map
            .iter()
            .map(|(d, f)| {
                let d = d
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| format!("density key '{d}' is not a whole number"))?;
                Ok((density(&Value::from(d))?, factor(f)?))
            })
            .collect::<Result<_, String>>()?,
        _ => return Err("expected a list of [density, factor] pairs".to_string()),
    };
    if points.is_empty() {
        return Err("expected at least one control point".to_string());
    }
    points.sort_by_key(|(d, _)| *d);
    Ok(Value::Array(
        points
            .into_iter()
            .map(|(d, f)| Value::Array(vec![Value::from(d), canonical_number(f)]))
            .collect(),
    ))
}

fn density(value: &Value) -> Result<u32, String> {
    let v = as_number(value)?;
    if v < 1.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err("densities must be whole numbers >= 1".to_string());
    }
    Ok(v as u32)
}

fn factor(value: &Value) -> Result<f64, String> {
    let v = as_number(value)?;
    if v <= 0.0 {
        return Err("factors must be positive".to_string());
    }
    Ok(v)
}
