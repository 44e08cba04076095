//! Built-in style presets.
//!
//! A preset is a fixed list of top-level overrides applied on top of the
//! defaults and below user overrides. Values go through the same field rules
//! as user input.

use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePreset {
    Default,
    Publication,
    PresentationLight,
    PresentationDark,
    Minimalist,
}

impl StylePreset {
    pub const ALL: [StylePreset; 5] = [
        StylePreset::Default,
        StylePreset::Publication,
        StylePreset::PresentationLight,
        StylePreset::PresentationDark,
        StylePreset::Minimalist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StylePreset::Default => "default",
            StylePreset::Publication => "publication",
            StylePreset::PresentationLight => "presentation_light",
            StylePreset::PresentationDark => "presentation_dark",
            StylePreset::Minimalist => "minimalist",
        }
    }

    /// Case-insensitive lookup; `-` and spaces are accepted for `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|p| p.name() == key)
    }

    pub fn description(self) -> &'static str {
        match self {
            StylePreset::Default => "balanced defaults for on-screen figures",
            StylePreset::Publication => "compact journal figures with the classic line colors",
            StylePreset::PresentationLight => "large type and thick lines on a light background",
            StylePreset::PresentationDark => "large type and thick lines on a dark background",
            StylePreset::Minimalist => "no grid, open axes, grayscale",
        }
    }

    pub fn overrides(self) -> Vec<(&'static str, Value)> {
        match self {
            StylePreset::Default => Vec::new(),
            StylePreset::Publication => vec![
                ("font_name", json!("Times New Roman")),
                ("base_font_size", json!(10)),
                ("plot_line_width", json!(1.0)),
                ("marker_size", json!(5)),
                ("color_palette", json!("lines")),
                ("grid_density", json!("major_only")),
                ("minor_ticks", json!(false)),
                ("legend_box", json!(false)),
                ("smart_legend_display", json!(true)),
                ("interactive_legend", json!(false)),
            ],
            StylePreset::PresentationLight => vec![
                ("base_font_size", json!(16)),
                ("title_scale", json!(1.3)),
                ("plot_line_width", json!(2.5)),
                ("marker_size", json!(9)),
                ("color_palette", json!("tab10")),
                ("grid_density", json!("major_only")),
                ("axis_color", json!([0.2, 0.2, 0.2])),
            ],
            StylePreset::PresentationDark => vec![
                ("base_font_size", json!(16)),
                ("title_scale", json!(1.3)),
                ("plot_line_width", json!(2.5)),
                ("marker_size", json!(9)),
                ("color_palette", json!("okabe_ito")),
                ("grid_density", json!("major_only")),
                ("figure_background_color", json!([0.12, 0.12, 0.14])),
                ("axes_background_color", json!([0.16, 0.16, 0.18])),
                ("axis_color", json!([0.85, 0.85, 0.85])),
                ("text_color", json!([0.95, 0.95, 0.95])),
                ("legend_fade_color", json!([0.4, 0.4, 0.4])),
            ],
            StylePreset::Minimalist => vec![
                ("grid_density", json!("none")),
                ("minor_ticks", json!(false)),
                ("box_style", json!("left-bottom")),
                ("tick_direction", json!("out")),
                ("color_palette", json!("grayscale")),
                ("legend_box", json!(false)),
                ("cycle_line_styles", json!(true)),
            ],
        }
    }
}
