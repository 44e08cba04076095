//! Core scene data structures.

use fp_core::{ContainerId, FpResult, PanelId, Rgb};
use serde::{Deserialize, Serialize};

use crate::panel::Panel;
use crate::validate;

/// What sort of container a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerKind {
    /// A top-level window.
    Window,
    /// One tab of a tabbed window; an independent layout scope.
    Tab,
    /// A tiled grid of `rows x cols` cells.
    TiledGrid { rows: u32, cols: u32 },
}

impl ContainerKind {
    pub fn is_tiled_grid(&self) -> bool {
        matches!(self, Self::TiledGrid { .. })
    }

    /// Number of cells a grid declares (0 for other kinds).
    pub fn declared_cells(&self) -> usize {
        match self {
            Self::TiledGrid { rows, cols } => (*rows as usize) * (*cols as usize),
            _ => 0,
        }
    }
}

/// A window, tab or tiled grid.
///
/// A container owns child containers and panels; ownership is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub kind: ContainerKind,
    #[serde(default)]
    pub children: Vec<ContainerId>,
    #[serde(default)]
    pub panels: Vec<PanelId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
}

/// The scene: every container and panel of the host, addressed by id.
///
/// Slots are `None` once the host deletes the object; references to a deleted
/// slot are left dangling on purpose, exactly as a stale handle would be.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub(crate) containers: Vec<Option<Container>>,
    pub(crate) panels: Vec<Option<Panel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) current: Option<ContainerId>,
}

impl Scene {
    /// Check every structural invariant (used after deserialization).
    pub fn validate(&self) -> FpResult<()> {
        validate::validate_scene(self)
    }

    /// Live containers.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter().flatten()
    }

    /// Live panels.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().flatten()
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.slot())?.as_ref()
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(id.slot())?.as_mut()
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.slot())?.as_ref()
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id.slot())?.as_mut()
    }

    /// The container implicitly targeted when no target is given.
    pub fn current(&self) -> Option<ContainerId> {
        self.current.filter(|id| self.container(*id).is_some())
    }

    pub fn set_current(&mut self, id: Option<ContainerId>) {
        self.current = id;
    }

    /// Delete a container together with every container and panel it owns.
    ///
    /// Its parent keeps the (now dangling) reference.
    pub fn remove_container(&mut self, id: ContainerId) -> Option<Container> {
        let removed = self.containers.get_mut(id.slot())?.take()?;
        let mut pending: Vec<ContainerId> = removed.children.clone();
        for &panel in &removed.panels {
            self.remove_panel(panel);
        }
        while let Some(child) = pending.pop() {
            let Some(slot) = self.containers.get_mut(child.slot()) else {
                continue;
            };
            if let Some(c) = slot.take() {
                pending.extend(c.children);
                for panel in c.panels {
                    self.remove_panel(panel);
                }
            }
        }
        Some(removed)
    }

    /// Delete a panel; its owner keeps the (now dangling) reference.
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Panel> {
        self.panels.get_mut(id.slot())?.take()
    }

    /// The container that lists `panel` among its panels.
    pub fn owner_of(&self, panel: PanelId) -> Option<ContainerId> {
        self.containers()
            .find(|c| c.panels.contains(&panel))
            .map(|c| c.id)
    }

    /// The container that lists `child` among its children.
    pub fn parent_of(&self, child: ContainerId) -> Option<ContainerId> {
        self.containers()
            .find(|c| c.children.contains(&child))
            .map(|c| c.id)
    }

    /// Climb from `id` to the container that has no parent.
    pub fn top_level(&self, mut id: ContainerId) -> ContainerId {
        for _ in 0..self.containers.len() {
            match self.parent_of(id) {
                Some(parent) => id = parent,
                None => break,
            }
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_cells() {
        assert_eq!(ContainerKind::TiledGrid { rows: 2, cols: 3 }.declared_cells(), 6);
        assert_eq!(ContainerKind::Window.declared_cells(), 0);
    }

    #[test]
    fn empty_scene_has_no_current() {
        let scene = Scene::default();
        assert!(scene.current().is_none());
        assert_eq!(scene.containers().count(), 0);
    }
}
