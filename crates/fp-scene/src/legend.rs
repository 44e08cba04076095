//! Legends and their interaction state.

use fp_core::{ElementId, Rgb};
use serde::{Deserialize, Serialize};

/// Where a legend is anchored relative to its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLocation {
    #[default]
    Best,
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    NortheastOutside,
    EastOutside,
    SouthOutside,
    /// Never show a legend.
    None,
}

/// One row of a legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub element: ElementId,
    pub label: String,
    pub label_color: Rgb,
    /// Icon opacity; below 1.0 when the element is hidden.
    pub icon_alpha: f64,
    /// Icon color, blended toward the fade color when hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<Rgb>,
}

/// Transient click-handling state of an interactive legend.
///
/// `snapshot` holds each entry's visibility as it was before isolation,
/// keyed by element and in entry order. `isolated` names the element that
/// is currently shown alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendInteractionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Vec<(ElementId, bool)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolated: Option<ElementId>,
}

impl LegendInteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the snapshot (if any) names exactly `entries`, in order, and
    /// the isolated element is one of them.
    pub fn matches_entries(&self, entries: &[LegendEntry]) -> bool {
        let snapshot_ok = match &self.snapshot {
            None => true,
            Some(snap) => {
                snap.len() == entries.len()
                    && snap.iter().zip(entries).all(|((id, _), e)| *id == e.element)
            }
        };
        let isolated_ok = match self.isolated {
            None => true,
            Some(id) => entries.iter().any(|e| e.element == id),
        };
        snapshot_ok && isolated_ok
    }

    /// Overwrite the snapshot entry of `element`, if a snapshot exists.
    pub fn set_snapshot_visibility(&mut self, element: ElementId, visible: bool) {
        if let Some(snap) = self.snapshot.as_mut() {
            if let Some(slot) = snap.iter_mut().find(|(id, _)| *id == element) {
                slot.1 = visible;
            }
        }
    }
}

/// A panel's legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    #[serde(default)]
    pub location: LegendLocation,
    pub font_size: f64,
    #[serde(default)]
    pub font_name: String,
    #[serde(default = "default_true")]
    pub box_visible: bool,
    #[serde(default = "default_columns")]
    pub num_columns: u32,
    pub text_color: Rgb,
    pub fade_color: Rgb,
    pub fade_alpha: f64,
    /// Present only on interactive legends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<LegendInteractionState>,
}

fn default_true() -> bool {
    true
}

fn default_columns() -> u32 {
    1
}

impl Legend {
    /// A plain static legend over `entries`.
    pub fn new(entries: Vec<LegendEntry>) -> Self {
        Self {
            entries,
            location: LegendLocation::Best,
            font_size: 9.0,
            font_name: String::new(),
            box_visible: true,
            num_columns: 1,
            text_color: Rgb::new(0.15, 0.15, 0.15),
            fade_color: Rgb::new(0.6, 0.6, 0.6),
            fade_alpha: 0.3,
            interaction: None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interaction.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_core::Id;

    fn entry(i: u32) -> LegendEntry {
        LegendEntry {
            element: Id::from_index(i),
            label: format!("e{i}"),
            label_color: Rgb::BLACK,
            icon_alpha: 1.0,
            icon_color: None,
        }
    }

    #[test]
    fn empty_state_matches_anything() {
        let state = LegendInteractionState::new();
        assert!(state.matches_entries(&[entry(0), entry(1)]));
        assert!(state.matches_entries(&[]));
    }

    #[test]
    fn stale_snapshot_detected() {
        let state = LegendInteractionState {
            snapshot: Some(vec![(Id::from_index(0), true), (Id::from_index(1), false)]),
            isolated: None,
        };
        assert!(state.matches_entries(&[entry(0), entry(1)]));
        assert!(!state.matches_entries(&[entry(1), entry(0)]));
        assert!(!state.matches_entries(&[entry(0)]));
    }

    #[test]
    fn snapshot_entry_update() {
        let mut state = LegendInteractionState {
            snapshot: Some(vec![(Id::from_index(3), true)]),
            isolated: None,
        };
        state.set_snapshot_visibility(Id::from_index(3), false);
        state.set_snapshot_visibility(Id::from_index(4), true);
        assert_eq!(state.snapshot, Some(vec![(Id::from_index(3), false)]));
    }
}
