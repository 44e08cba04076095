//! Legend visibility, rebuilding, and click handling.
//!
//! A legend is deleted and recreated from the current candidate list on every
//! styling pass. Its [`LegendInteractionState`] survives the rebuild only when
//! the snapshot still names exactly the new entries.
//!
//! Known limitation: the snapshot is not reconciled when the host changes
//! element visibility behind the legend's back; the next rebuild simply starts
//! from a fresh state.

use fp_config::ResolvedConfig;
use fp_core::{ElementId, Rgb};
use fp_scene::{Legend, LegendEntry, LegendInteractionState, LegendLocation, Panel, PlotElement};
use tracing::{debug, trace};

use crate::error::LegendError;
use crate::stylist::ScaledSizes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendState {
    Hidden,
    ShownStatic,
    ShownInteractive,
}

impl LegendState {
    pub fn of(panel: &Panel) -> Self {
        match &panel.legend {
            None => LegendState::Hidden,
            Some(l) if l.is_interactive() => LegendState::ShownInteractive,
            Some(_) => LegendState::ShownStatic,
        }
    }
}

/// Result of a click on a legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The legend is static; nothing changed.
    Ignored,
    Toggled { element: ElementId, visible: bool },
    Isolated { element: ElementId },
    /// Isolation ended and the snapshot was restored.
    Restored,
}

/// Whether a panel with `candidates` legend candidates shows a legend.
pub fn should_show(candidates: usize, config: &ResolvedConfig) -> bool {
    let r = &config.record;
    if candidates == 0 || r.legend_location == LegendLocation::None {
        return false;
    }
    if !r.smart_legend_display {
        return true;
    }
    candidates > 1 || r.force_single_legend_entry
}

/// Column count; 0 in the configuration means one column up to five entries.
pub fn column_count(configured: u32, entries: usize) -> u32 {
    match configured {
        0 if entries <= 5 => 1,
        0 => 2,
        n => n,
    }
}

/// Rebuild the legend of `panel` from `candidates` (in assignment order).
pub fn sync_legend(
    panel: &mut Panel,
    candidates: &[ElementId],
    config: &ResolvedConfig,
    sizes: &ScaledSizes,
) -> LegendState {
    let r = &config.record;
    let previous = panel.legend.take().and_then(|l| l.interaction);

    if !should_show(candidates.len(), config) {
        trace!(panel = %panel.id, candidates = candidates.len(), "legend hidden");
        return LegendState::Hidden;
    }

    let entries: Vec<LegendEntry> = candidates
        .iter()
        .filter_map(|id| panel.element(*id))
        .map(|e| LegendEntry {
            element: e.id,
            label: e.display_name.clone(),
            label_color: r.text_color,
            icon_alpha: 1.0,
            icon_color: e.kind.icon_color(),
        })
        .collect();

    let mut legend = Legend::new(entries);
    legend.location = r.legend_location;
    legend.font_size = sizes.legend_font;
    legend.font_name = r.font_name.clone();
    legend.box_visible = r.legend_box;
    legend.num_columns = column_count(r.legend_num_columns, legend.entries.len());
    legend.text_color = r.text_color;
    legend.fade_color = r.legend_fade_color;
    legend.fade_alpha = r.legend_fade_alpha;

    let state = if r.interactive_legend {
        let interaction = previous
            .filter(|s| s.matches_entries(&legend.entries))
            .unwrap_or_default();
        legend.interaction = Some(interaction);
        refresh_appearance(&mut legend, &panel.elements);
        LegendState::ShownInteractive
    } else {
        LegendState::ShownStatic
    };
    debug!(panel = %panel.id, entries = legend.entries.len(), ?state, "legend rebuilt");
    panel.legend = Some(legend);
    state
}

/// Handle a click on entry `index` of the panel's legend.
///
/// With `modifier` the clicked element is isolated (or, if it already is,
/// the pre-isolation visibility is restored). A plain click ends any
/// isolation and toggles the clicked element.
pub fn on_entry_click(
    panel: &mut Panel,
    index: usize,
    modifier: bool,
) -> Result<ClickOutcome, LegendError> {
    let panel_id = panel.id;
    let Panel {
        legend, elements, ..
    } = panel;
    let legend = legend
        .as_mut()
        .ok_or(LegendError::NoLegend { panel: panel_id })?;
    let Some(state) = legend.interaction.as_mut() else {
        trace!(panel = %panel_id, index, "click on static legend ignored");
        return Ok(ClickOutcome::Ignored);
    };
    let clicked = legend
        .entries
        .get(index)
        .ok_or(LegendError::EntryOutOfRange {
            index,
            len: legend.entries.len(),
        })?
        .element;
    for entry in &legend.entries {
        if !elements.iter().any(|e| e.id == entry.element) {
            return Err(LegendError::MissingElement {
                element: entry.element,
            });
        }
    }
    let entry_ids: Vec<ElementId> = legend.entries.iter().map(|e| e.element).collect();

    let outcome = if modifier {
        if state.isolated == Some(clicked) {
            restore(state, elements);
            ClickOutcome::Restored
        } else {
            if state.snapshot.is_none() {
                state.snapshot = Some(
                    entry_ids
                        .iter()
                        .map(|&id| (id, is_visible(&*elements, id)))
                        .collect(),
                );
            }
            for &id in &entry_ids {
                set_visible(elements, id, id == clicked);
            }
            state.isolated = Some(clicked);
            ClickOutcome::Isolated { element: clicked }
        }
    } else {
        if state.isolated.is_some() {
            restore(state, elements);
        }
        let visible = !is_visible(elements, clicked);
        set_visible(elements, clicked, visible);
        state.set_snapshot_visibility(clicked, visible);
        ClickOutcome::Toggled {
            element: clicked,
            visible,
        }
    };

    debug!(panel = %panel_id, index, modifier, ?outcome, "legend click");
    refresh_appearance(legend, elements);
    Ok(outcome)
}

fn restore(state: &mut LegendInteractionState, elements: &mut [PlotElement]) {
    if let Some(snapshot) = state.snapshot.take() {
        for (id, visible) in snapshot {
            set_visible(elements, id, visible);
        }
    }
    state.isolated = None;
}

fn is_visible(elements: &[PlotElement], id: ElementId) -> bool {
    elements.iter().any(|e| e.id == id && e.visible)
}

fn set_visible(elements: &mut [PlotElement], id: ElementId, visible: bool) {
    if let Some(e) = elements.iter_mut().find(|e| e.id == id) {
        e.visible = visible;
    }
}

/// Fade entries whose element is hidden.
fn refresh_appearance(legend: &mut Legend, elements: &[PlotElement]) {
    let (text, fade, alpha) = (legend.text_color, legend.fade_color, legend.fade_alpha);
    for entry in &mut legend.entries {
        let Some(element) = elements.iter().find(|e| e.id == entry.element) else {
            continue;
        };
        let icon: Option<Rgb> = element.kind.icon_color();
        if element.visible {
            entry.label_color = text;
            entry.icon_alpha = 1.0;
            entry.icon_color = icon;
        } else {
            entry.label_color = fade;
            entry.icon_alpha = alpha;
            entry.icon_color = icon.map(|c| c.blend(fade, 0.5));
        }
    }
}
