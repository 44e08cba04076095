//! Panel enumeration over a container tree.
//!
//! Traversal is depth-first. At each container level:
//!
//! 1. every tiled grid that is a direct child forms one density group of its
//!    own panels, sized by the larger of the panels found and its declared
//!    cell count;
//! 2. the container's own panels (when it is not itself a grid) form a second
//!    group sized by their count;
//! 3. children are walked the same way. Tabs are ordinary children here, so a
//!    group never spans two tabs.
//!
//! A processed-set guarantees each panel is emitted once even when the
//! container tree lists it twice.

use std::collections::HashSet;

use fp_core::{ContainerId, PanelId};
use fp_scene::{Container, Scene};
use tracing::{debug, trace};

pub type GroupId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Panels of one tiled grid.
    TiledGrid,
    /// Panels owned directly by a window or tab.
    Loose,
    /// A caller-supplied panel list.
    Explicit,
}

/// Panels that share one scale factor.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGroup {
    pub id: GroupId,
    pub kind: GroupKind,
    pub container: Option<ContainerId>,
    /// Panel count used for scaling (may exceed `panels.len()` for grids).
    pub density: usize,
    pub panels: Vec<PanelId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelEntry {
    pub panel: PanelId,
    pub group: GroupId,
}

/// A reference skipped during traversal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraversalWarning {
    #[error("Container {parent} lists missing child container {child}; subtree skipped")]
    DanglingContainer {
        parent: ContainerId,
        child: ContainerId,
    },

    #[error("Container {container} lists missing panel {panel}; skipped")]
    DanglingPanel {
        container: ContainerId,
        panel: PanelId,
    },

    #[error("Panel {panel} requested but not in the scene; skipped")]
    MissingPanel { panel: PanelId },

    #[error("Container {container} reached twice; second visit skipped")]
    Revisited { container: ContainerId },
}

/// Result of a traversal: one entry per panel, in visit order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    pub groups: Vec<DensityGroup>,
    pub entries: Vec<PanelEntry>,
    pub warnings: Vec<TraversalWarning>,
}

impl Enumeration {
    pub fn group(&self, id: GroupId) -> Option<&DensityGroup> {
        self.groups.get(id)
    }

    pub fn panels(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.entries.iter().map(|e| e.panel)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enumerate every styleable panel under `root`.
///
/// Panels and containers carrying any of `exclude_tags` are skipped, as are
/// dangling references (with a warning).
pub fn enumerate_panels(
    scene: &Scene,
    root: ContainerId,
    exclude_tags: &[String],
) -> Enumeration {
    let mut walker = Walker::new(scene, exclude_tags);
    match scene.container(root) {
        Some(_) => walker.walk(root),
        None => debug!(%root, "root container missing; nothing to enumerate"),
    }
    walker.out
}

/// Treat `panels` as one density group sized by the number of usable panels.
pub fn enumerate_explicit(
    scene: &Scene,
    panels: &[PanelId],
    exclude_tags: &[String],
) -> Enumeration {
    let mut walker = Walker::new(scene, exclude_tags);
    let mut found = Vec::new();
    for &id in panels {
        match scene.panel(id) {
            None => walker.warn(TraversalWarning::MissingPanel { panel: id }),
            Some(p) if p.has_any_tag(exclude_tags) => trace!(panel = %id, "excluded by tag"),
            Some(_) => {
                if walker.processed.insert(id) {
                    found.push(id);
                }
            }
        }
    }
    let density = found.len();
    walker.push_group(GroupKind::Explicit, None, density, found);
    walker.out
}

struct Walker<'a> {
    scene: &'a Scene,
    exclude: &'a [String],
    processed: HashSet<PanelId>,
    visited: HashSet<ContainerId>,
    grids: HashSet<ContainerId>,
    out: Enumeration,
}

impl<'a> Walker<'a> {
    fn new(scene: &'a Scene, exclude: &'a [String]) -> Self {
        Self {
            scene,
            exclude,
            processed: HashSet::new(),
            visited: HashSet::new(),
            grids: HashSet::new(),
            out: Enumeration::default(),
        }
    }

    fn walk(&mut self, id: ContainerId) {
        if !self.visited.insert(id) {
            self.warn(TraversalWarning::Revisited { container: id });
            return;
        }
        let scene = self.scene;
        let Some(container) = scene.container(id) else {
            return;
        };
        if container.tags.iter().any(|t| self.exclude.contains(t)) {
            trace!(container = %id, "excluded by tag");
            return;
        }

        // A grid reached as the walk root has no parent to collect it.
        if container.kind.is_tiled_grid() {
            self.collect_grid(container);
        }

        let mut live_children = Vec::with_capacity(container.children.len());
        for &child in &container.children {
            match scene.container(child) {
                None => self.warn(TraversalWarning::DanglingContainer { parent: id, child }),
                Some(c) => live_children.push(c),
            }
        }

        for child in &live_children {
            let excluded = child.tags.iter().any(|t| self.exclude.contains(t));
            if child.kind.is_tiled_grid() && !excluded {
                self.collect_grid(child);
            }
        }

        if !container.kind.is_tiled_grid() {
            let panels = self.collect_owned(container);
            let density = panels.len();
            self.push_group(GroupKind::Loose, Some(id), density, panels);
        }

        for child in live_children {
            self.walk(child.id);
        }
    }

    fn collect_grid(&mut self, grid: &Container) {
        if !self.grids.insert(grid.id) {
            return;
        }
        let panels = self.collect_owned(grid);
        let density = panels.len().max(grid.kind.declared_cells());
        self.push_group(GroupKind::TiledGrid, Some(grid.id), density, panels);
    }

    /// Unprocessed, non-excluded panels directly owned by `container`.
    fn collect_owned(&mut self, container: &Container) -> Vec<PanelId> {
        let mut found = Vec::new();
        for &pid in &container.panels {
            match self.scene.panel(pid) {
                None => self.warn(TraversalWarning::DanglingPanel {
                    container: container.id,
                    panel: pid,
                }),
                Some(p) if p.has_any_tag(self.exclude) => trace!(panel = %pid, "excluded by tag"),
                Some(_) => {
                    if self.processed.insert(pid) {
                        found.push(pid);
                    }
                }
            }
        }
        found
    }

    fn push_group(
        &mut self,
        kind: GroupKind,
        container: Option<ContainerId>,
        density: usize,
        panels: Vec<PanelId>,
    ) {
        if panels.is_empty() {
            return;
        }
        let id = self.out.groups.len();
        debug!(group = id, ?kind, density, panels = panels.len(), "density group");
        self.out
            .entries
            .extend(panels.iter().map(|&panel| PanelEntry { panel, group: id }));
        self.out.groups.push(DensityGroup {
            id,
            kind,
            container,
            density,
            panels,
        });
    }

    fn warn(&mut self, warning: TraversalWarning) {
        debug!("{warning}");
        self.out.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_scene::{ElementKind, PanelKind, SceneBuilder};

    fn no_tags() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn grid_plus_loose_panels_counted_once() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let g = b.add_grid(w, "grid", 2, 2);
        for _ in 0..3 {
            b.add_panel(g, PanelKind::Cartesian);
        }
        b.add_panel(w, PanelKind::Cartesian);
        b.add_panel(w, PanelKind::Cartesian);
        let scene = b.build().unwrap();

        let out = enumerate_panels(&scene, w, &no_tags());
        assert_eq!(out.entries.len(), 5);
        let unique: HashSet<_> = out.panels().collect();
        assert_eq!(unique.len(), 5);

        assert_eq!(out.groups.len(), 2);
        assert_eq!(out.groups[0].kind, GroupKind::TiledGrid);
        assert_eq!(out.groups[0].density, 4);
        assert_eq!(out.groups[0].panels.len(), 3);
        assert_eq!(out.groups[1].kind, GroupKind::Loose);
        assert_eq!(out.groups[1].density, 2);
    }

    #[test]
    fn tabs_group_independently() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let t1 = b.add_tab(w, "one");
        let t2 = b.add_tab(w, "two");
        b.add_panel(t1, PanelKind::Cartesian);
        b.add_panel(t2, PanelKind::Cartesian);
        b.add_panel(t2, PanelKind::Polar);
        let scene = b.build().unwrap();

        let out = enumerate_panels(&scene, w, &no_tags());
        let densities: Vec<_> = out.groups.iter().map(|g| (g.container, g.density)).collect();
        assert_eq!(densities, vec![(Some(t1), 1), (Some(t2), 2)]);
    }

    #[test]
    fn nested_grids_form_their_own_groups() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let outer = b.add_grid(w, "outer", 1, 2);
        let inner = b.add_grid(outer, "inner", 3, 3);
        b.add_panel(outer, PanelKind::Cartesian);
        b.add_panel(inner, PanelKind::Cartesian);
        let scene = b.build().unwrap();

        let out = enumerate_panels(&scene, w, &no_tags());
        assert_eq!(out.entries.len(), 2);
        let densities: Vec<_> = out.groups.iter().map(|g| (g.container, g.density)).collect();
        assert_eq!(densities, vec![(Some(outer), 2), (Some(inner), 9)]);
    }

    #[test]
    fn grid_root_is_its_own_group() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let g = b.add_grid(w, "grid", 1, 3);
        b.add_panel(g, PanelKind::Cartesian);
        let scene = b.build().unwrap();

        let out = enumerate_panels(&scene, g, &no_tags());
        assert_eq!(out.groups.len(), 1);
        assert_eq!(out.groups[0].density, 3);
    }

    #[test]
    fn excluded_panels_and_containers_skipped() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let keep = b.add_panel(w, PanelKind::Cartesian);
        let skip = b.add_panel(w, PanelKind::Cartesian);
        b.tag_panel(skip, "fp_ignore");
        let tab = b.add_tab(w, "hidden");
        b.tag_container(tab, "fp_ignore");
        b.add_panel(tab, PanelKind::Cartesian);
        let scene = b.build().unwrap();

        let out = enumerate_panels(&scene, w, &["fp_ignore".to_string()]);
        assert_eq!(out.panels().collect::<Vec<_>>(), vec![keep]);
        assert_eq!(out.groups[0].density, 1);
    }

    #[test]
    fn empty_container_is_noop() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let scene = b.build().unwrap();
        let out = enumerate_panels(&scene, w, &no_tags());
        assert!(out.is_empty());
        assert!(out.groups.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn dangling_references_warn_and_continue() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let t = b.add_tab(w, "gone");
        b.add_panel(t, PanelKind::Cartesian);
        let lost = b.add_panel(w, PanelKind::Cartesian);
        let kept = b.add_panel(w, PanelKind::Cartesian);
        b.add_element(kept, "x", ElementKind::line());
        let mut scene = b.build().unwrap();
        scene.remove_container(t);
        scene.remove_panel(lost);

        let out = enumerate_panels(&scene, w, &no_tags());
        assert_eq!(out.panels().collect::<Vec<_>>(), vec![kept]);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn grid_with_deleted_panel_warns_once() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let g = b.add_grid(w, "grid", 1, 3);
        let gone = b.add_panel(g, PanelKind::Cartesian);
        b.add_panel(g, PanelKind::Cartesian);
        let mut scene = b.build().unwrap();
        scene.remove_panel(gone);

        let out = enumerate_panels(&scene, w, &no_tags());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.groups.len(), 1);
        assert_eq!(out.groups[0].density, 3);
    }

    #[test]
    fn explicit_list_is_one_group() {
        let mut b = SceneBuilder::new();
        let w = b.add_window("w");
        let a = b.add_panel(w, PanelKind::Cartesian);
        let c = b.add_panel(w, PanelKind::Cartesian);
        let scene = b.build().unwrap();

        let out = enumerate_explicit(&scene, &[a, c, a, PanelId::from_index(9)], &no_tags());
        assert_eq!(out.groups.len(), 1);
        assert_eq!(out.groups[0].kind, GroupKind::Explicit);
        assert_eq!(out.groups[0].density, 2);
        assert_eq!(out.warnings.len(), 1);
    }
}
