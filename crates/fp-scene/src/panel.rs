//! Panels: a single plotting region with its axes, labels and children.

use fp_core::{ElementId, PanelId, Rgb};
use serde::{Deserialize, Serialize};

use crate::element::{PlotElement, TextProps};
use crate::legend::Legend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    #[default]
    Cartesian,
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickDirection {
    #[default]
    In,
    Out,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxesLayer {
    #[default]
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    #[default]
    Northwest,
    Northeast,
    Southwest,
    Southeast,
}

/// Axis rulers, grid and background of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesStyle {
    pub font_size: f64,
    #[serde(default)]
    pub font_name: String,
    pub line_width: f64,
    pub color: Rgb,
    pub background: Rgb,
    pub grid_major: bool,
    pub grid_minor: bool,
    pub minor_ticks: bool,
    pub box_visible: bool,
    /// Top and right axis lines.
    pub secondary_axes_visible: bool,
    pub tick_direction: TickDirection,
    pub layer: AxesLayer,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            font_name: String::new(),
            line_width: 0.5,
            color: Rgb::new(0.15, 0.15, 0.15),
            background: Rgb::WHITE,
            grid_major: false,
            grid_minor: false,
            minor_ticks: false,
            box_visible: true,
            secondary_axes_visible: true,
            tick_direction: TickDirection::In,
            layer: AxesLayer::Bottom,
        }
    }
}

/// Colorbar attached to a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    pub font_size: f64,
    pub line_width: f64,
    pub color: Rgb,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for ColorAxis {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            line_width: 0.5,
            color: Rgb::new(0.15, 0.15, 0.15),
            tags: Vec::new(),
        }
    }
}

/// Text pinned to a panel corner (statistics overlay, panel label).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerText {
    pub text: String,
    pub corner: Corner,
    pub style: TextProps,
    pub background_alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    #[serde(default)]
    pub kind: PanelKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub axes: AxesStyle,
    #[serde(default)]
    pub title: TextProps,
    #[serde(default)]
    pub x_label: TextProps,
    #[serde(default)]
    pub y_label: TextProps,
    /// Children in creation order.
    #[serde(default)]
    pub elements: Vec<PlotElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_axis: Option<ColorAxis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<CornerText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_label: Option<CornerText>,
}

impl Panel {
    pub fn new(id: PanelId, kind: PanelKind) -> Self {
        Self {
            id,
            kind,
            tags: Vec::new(),
            axes: AxesStyle::default(),
            title: TextProps::default(),
            x_label: TextProps::default(),
            y_label: TextProps::default(),
            elements: Vec::new(),
            legend: None,
            color_axis: None,
            overlay: None,
            panel_label: None,
        }
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    pub fn element(&self, id: ElementId) -> Option<&PlotElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut PlotElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Elements that currently qualify for a legend entry, in creation order.
    pub fn legend_candidates(&self) -> impl Iterator<Item = &PlotElement> {
        self.elements.iter().filter(|e| e.is_legend_candidate())
    }
}
