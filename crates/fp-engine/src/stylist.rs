//! Per-panel styling.

use fp_config::{BoxStyle, GridDensity, LabelStyle, ResolvedConfig, Statistic};
use fp_core::{ElementId, Rgb, ensure_finite, round_to_step, scaled_with_floor};
use fp_scene::{
    CornerText, ElementKind, LineStyleKind, MarkerKind, Panel, PanelKind, PlotElement, TextProps,
};
use tracing::debug;

use crate::error::{StyleError, StyleResult};

/// Line widths round to this step.
const LINE_WIDTH_STEP: f64 = 0.1;

/// Every scaled size a panel needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSizes {
    pub font: f64,
    pub title_font: f64,
    pub label_font: f64,
    pub legend_font: f64,
    pub plot_line_width: f64,
    pub axis_line_width: f64,
    pub marker_size: f64,
    pub cap_size: f64,
}

impl ScaledSizes {
    pub fn compute(config: &ResolvedConfig, scale: f64) -> StyleResult<Self> {
        let scale = ensure_finite(scale, "scale factor")?;
        if scale <= 0.0 {
            return Err(fp_core::FpError::InvalidArg {
                what: "scale factor must be positive",
            }
            .into());
        }
        let r = &config.record;
        let base = config.derived.effective_base_font_size;
        let font = |factor: f64| scaled_with_floor(base * factor, scale, 1.0, r.min_font_size);
        let width = |w: f64| scaled_with_floor(w, scale, LINE_WIDTH_STEP, r.min_line_width);
        let marker_size = scaled_with_floor(r.marker_size, scale, 1.0, r.min_marker_size);
        let cap_size = if r.errorbar_legacy_cap_scaling {
            r.marker_size * r.errorbar_cap_ratio * scale
        } else {
            marker_size * r.errorbar_cap_ratio
        };
        Ok(Self {
            font: font(1.0),
            title_font: font(r.title_scale),
            label_font: font(r.label_scale),
            legend_font: font(r.legend_font_scale),
            plot_line_width: width(r.plot_line_width),
            axis_line_width: width(config.derived.axis_line_width),
            marker_size,
            cap_size: ensure_finite(cap_size, "error bar cap size")?,
        })
    }
}

/// What styling one panel produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOutcome {
    /// Legend candidates in palette-assignment order.
    pub candidates: Vec<ElementId>,
    pub failures: Vec<(ElementId, StyleError)>,
    pub marker_cycling: bool,
    pub line_cycling: bool,
}

/// Style assigned to the n-th legend candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Assignment {
    color: Rgb,
    marker: Option<MarkerKind>,
    line_style: Option<LineStyleKind>,
}

/// Apply the resolved configuration to `panel` at `scale`.
///
/// Element failures are collected in the outcome; the remaining elements are
/// still styled. Only an unusable scale factor fails the whole panel.
pub fn style_panel(
    panel: &mut Panel,
    config: &ResolvedConfig,
    scale: f64,
) -> StyleResult<StyleOutcome> {
    let sizes = ScaledSizes::compute(config, scale)?;
    let r = &config.record;
    debug!(panel = %panel.id, scale, ?sizes, "styling panel");

    if panel.kind != PanelKind::Polar || r.style_polar_axes {
        style_axes(panel, config, &sizes);
    }
    style_labels(panel, config, &sizes);
    if r.style_colorbars {
        if let Some(axis) = panel.color_axis.as_mut() {
            if !axis.tags.iter().any(|t| r.exclude_tags.contains(t)) {
                axis.font_size = sizes.font;
                axis.line_width = sizes.axis_line_width;
                axis.color = r.axis_color;
            }
        }
    }

    let order = assignment_order(panel, config);
    let candidate_count = order
        .iter()
        .filter(|&&i| panel.elements[i].is_legend_candidate())
        .count();
    let mut outcome = StyleOutcome {
        marker_cycling: r
            .cycle_marker_styles
            .is_active(candidate_count, r.marker_cycle_threshold),
        line_cycling: r
            .cycle_line_styles
            .is_active(candidate_count, r.marker_cycle_threshold),
        ..StyleOutcome::default()
    };

    for i in order {
        let element = &mut panel.elements[i];
        let assignment = if element.is_legend_candidate() {
            let n = outcome.candidates.len();
            outcome.candidates.push(element.id);
            match assign(n, config, &outcome) {
                Ok(a) => Some(a),
                Err(err) => {
                    record_failure(&mut outcome, element, err);
                    continue;
                }
            }
        } else {
            None
        };
        if let Err(err) = style_element(element, assignment, config, &sizes) {
            record_failure(&mut outcome, element, err);
        }
    }

    apply_overlay(panel, config, &sizes, &outcome.candidates);
    Ok(outcome)
}

/// Indices of the elements to style, in assignment order, with excluded
/// elements removed.
fn assignment_order(panel: &Panel, config: &ResolvedConfig) -> Vec<usize> {
    let exclude = &config.record.exclude_tags;
    let mut order: Vec<usize> = panel
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.has_any_tag(exclude))
        .map(|(i, _)| i)
        .collect();
    if config.record.legend_reverse_order {
        order.reverse();
    }
    order
}

/// Palette color, marker and line style for the candidate at 0-based `n`.
fn assign(n: usize, config: &ResolvedConfig, outcome: &StyleOutcome) -> StyleResult<Assignment> {
    let r = &config.record;
    let palette = &config.derived.palette;
    let color = *palette
        .get(n % palette.len().max(1))
        .ok_or(StyleError::EmptyPalette)?;
    let marker = if outcome.marker_cycling {
        let styles = &r.marker_styles;
        Some(
            *styles
                .get(n % styles.len().max(1))
                .ok_or(StyleError::EmptyCycle { what: "marker" })?,
        )
    } else {
        None
    };
    let line_style = if outcome.line_cycling {
        let styles = &r.line_style_order;
        Some(
            *styles
                .get(n % styles.len().max(1))
                .ok_or(StyleError::EmptyCycle { what: "line" })?,
        )
    } else {
        None
    };
    Ok(Assignment {
        color,
        marker,
        line_style,
    })
}

fn record_failure(outcome: &mut StyleOutcome, element: &PlotElement, err: StyleError) {
    debug!(element = %element.id, kind = element.kind.label(), "styling failed: {err}");
    outcome.failures.push((element.id, err));
}

fn style_axes(panel: &mut Panel, config: &ResolvedConfig, sizes: &ScaledSizes) {
    let r = &config.record;
    let axes = &mut panel.axes;
    axes.font_size = sizes.font;
    axes.font_name = r.font_name.clone();
    axes.line_width = sizes.axis_line_width;
    axes.color = r.axis_color;
    axes.background = r.axes_background_color;
    (axes.grid_major, axes.grid_minor) = match r.grid_density {
        GridDensity::Normal => (true, true),
        GridDensity::MajorOnly => (true, false),
        GridDensity::None => (false, false),
    };
    axes.minor_ticks = r.minor_ticks;
    axes.box_visible = r.box_style == BoxStyle::On;
    axes.secondary_axes_visible = r.box_style != BoxStyle::LeftBottom;
    axes.tick_direction = r.tick_direction;
    axes.layer = r.axes_layer;
}

fn style_labels(panel: &mut Panel, config: &ResolvedConfig, sizes: &ScaledSizes) {
    let r = &config.record;
    let apply = |text: &mut TextProps, size: f64, weight| {
        text.font_size = size;
        text.font_name = r.font_name.clone();
        text.font_weight = weight;
        text.interpreter = r.interpreter;
        text.color = r.text_color;
    };
    apply(&mut panel.title, sizes.title_font, r.title_font_weight);
    apply(&mut panel.x_label, sizes.label_font, r.label_font_weight);
    apply(&mut panel.y_label, sizes.label_font, r.label_font_weight);
}

/// Variant dispatch. An element whose color is unusable is left untouched.
fn style_element(
    element: &mut PlotElement,
    assignment: Option<Assignment>,
    config: &ResolvedConfig,
    sizes: &ScaledSizes,
) -> StyleResult<()> {
    let r = &config.record;
    let invalid = StyleError::InvalidColor {
        element: element.id,
        kind: element.kind.label(),
    };
    let color = assignment
        .map(|a| a.color)
        .or_else(|| element.kind.icon_color())
        .filter(|c| c.is_valid());
    let marker = assignment.and_then(|a| a.marker);
    let line_style = assignment.and_then(|a| a.line_style);

    match &mut element.kind {
        ElementKind::Line(p) | ElementKind::Polar(p) => {
            let color = color.ok_or(invalid)?;
            p.color = color;
            p.line_width = sizes.plot_line_width;
            p.marker_size = sizes.marker_size;
            if let Some(m) = marker {
                p.marker = m;
            }
            if let Some(ls) = line_style {
                p.line_style = ls;
            }
            p.marker_face = (r.fill_markers && p.marker != MarkerKind::None).then_some(color);
        }
        ElementKind::Scatter(p) => {
            let face = color.ok_or(invalid)?;
            p.size = sizes.marker_size * sizes.marker_size;
            p.face_color = face;
            p.edge_color = face;
            p.face_alpha = r.scatter_face_alpha;
            p.line_width = sizes.axis_line_width;
            if let Some(m) = marker {
                p.marker = m;
            }
        }
        ElementKind::Bar(p) | ElementKind::Histogram(p) => {
            let face = color.ok_or(invalid)?;
            p.face_color = face;
            p.edge_color = face.darken(r.bar_edge_darken);
            p.line_width = sizes.axis_line_width;
        }
        ElementKind::ErrorBar(p) => {
            let color = color.ok_or(invalid)?;
            p.color = color;
            p.line_width = sizes.plot_line_width;
            p.marker_size = sizes.marker_size;
            p.cap_size = sizes.cap_size;
            if let Some(m) = marker {
                p.marker = m;
            }
            if let Some(ls) = line_style {
                p.line_style = ls;
            }
        }
        // Surfaces keep their colormap; an assigned color is dropped.
        ElementKind::Surface(p) => {
            p.line_width = sizes.axis_line_width;
            p.edge_alpha = r.surface_edge_alpha;
        }
        ElementKind::Annotation(t) => {
            t.font_size = sizes.label_font;
            t.font_name = r.font_name.clone();
            t.interpreter = r.interpreter;
            t.color = r.text_color;
        }
    }
    Ok(())
}

fn apply_overlay(
    panel: &mut Panel,
    config: &ResolvedConfig,
    sizes: &ScaledSizes,
    candidates: &[ElementId],
) {
    let settings = &config.record.overlay_settings;
    if !settings.enabled {
        panel.overlay = None;
        return;
    }
    let data = candidates
        .iter()
        .filter_map(|id| panel.element(*id))
        .find_map(|e| e.kind.y_data().filter(|d| d.iter().any(|v| v.is_finite())));
    let Some(data) = data else {
        panel.overlay = None;
        return;
    };
    let text = settings
        .statistics
        .iter()
        .map(|&stat| {
            let value = statistic(stat, data);
            match stat {
                Statistic::Count => format!("{} = {}", stat.label(), value as usize),
                _ => format!(
                    "{} = {:.*}",
                    stat.label(),
                    settings.precision as usize,
                    value
                ),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let r = &config.record;
    panel.overlay = Some(CornerText {
        text,
        corner: settings.position,
        style: TextProps {
            text: String::new(),
            font_size: round_to_step(sizes.font * settings.font_scale, 1.0).max(r.min_font_size),
            font_name: r.font_name.clone(),
            font_weight: fp_scene::FontWeight::Normal,
            interpreter: fp_scene::Interpreter::None,
            color: r.text_color,
        },
        background_alpha: settings.background_alpha,
    });
}

/// Summary statistic over the finite samples of `data`.
pub fn statistic(stat: Statistic, data: &[f64]) -> f64 {
    let mut values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let n = values.len();
    if n == 0 {
        return match stat {
            Statistic::Count => 0.0,
            _ => f64::NAN,
        };
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    match stat {
        Statistic::Mean => mean,
        Statistic::Std if n < 2 => 0.0,
        Statistic::Std => {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        }
        Statistic::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Statistic::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Statistic::Median => {
            values.sort_by(f64::total_cmp);
            if n % 2 == 1 {
                values[n / 2]
            } else {
                (values[n / 2 - 1] + values[n / 2]) / 2.0
            }
        }
        Statistic::Count => n as f64,
    }
}

/// Put the `ordinal`-th (0-based) panel label on `panel`, or clear it when
/// labeling is off.
pub fn apply_panel_label(panel: &mut Panel, config: &ResolvedConfig, scale: f64, ordinal: usize) {
    let r = &config.record;
    let labeling = &r.panel_labeling;
    if !labeling.enabled {
        panel.panel_label = None;
        return;
    }
    let base = config.derived.effective_base_font_size * labeling.font_scale;
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    panel.panel_label = Some(CornerText {
        text: panel_label_text(labeling.style, ordinal),
        corner: labeling.position,
        style: TextProps {
            text: String::new(),
            font_size: scaled_with_floor(base, scale, 1.0, r.min_font_size),
            font_name: r.font_name.clone(),
            font_weight: labeling.font_weight,
            interpreter: fp_scene::Interpreter::None,
            color: r.text_color,
        },
        background_alpha: 0.0,
    });
}

/// `a, b, ..., z, aa, ab, ...` or lower-case roman numerals.
pub fn panel_label_text(style: LabelStyle, ordinal: usize) -> String {
    match style {
        LabelStyle::Lower => letters(ordinal),
        LabelStyle::LowerParen => format!("({})", letters(ordinal)),
        LabelStyle::Upper => letters(ordinal).to_ascii_uppercase(),
        LabelStyle::UpperParen => format!("({})", letters(ordinal).to_ascii_uppercase()),
        LabelStyle::Roman => roman(ordinal + 1),
    }
}

fn letters(ordinal: usize) -> String {
    let mut n = ordinal + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}
