//! Scene validation logic.

use std::collections::{HashMap, HashSet};

use fp_core::{ContainerId, FpResult, PanelId};

use crate::error::SceneError;
use crate::panel::Panel;
use crate::scene::{Container, Scene};

pub(crate) fn validate_scene(scene: &Scene) -> FpResult<()> {
    validate_structure(&scene.containers, &scene.panels)
}

/// Validate slot ids, references, exclusive ownership and acyclicity.
///
/// References to a slot that exists but is empty are deleted handles and are
/// tolerated; references past the end of the arena are errors.
pub(crate) fn validate_structure(
    containers: &[Option<Container>],
    panels: &[Option<Panel>],
) -> FpResult<()> {
    // Ids must match their storage slots
    for (slot, container) in containers.iter().enumerate() {
        if let Some(c) = container {
            if c.id.slot() != slot {
                return Err(SceneError::SlotMismatch {
                    what: "Container",
                    id: c.id,
                    slot,
                }
                .into());
            }
        }
    }
    for (slot, panel) in panels.iter().enumerate() {
        if let Some(p) = panel {
            if p.id.slot() != slot {
                return Err(SceneError::SlotMismatch {
                    what: "Panel",
                    id: p.id,
                    slot,
                }
                .into());
            }
        }
    }

    let mut parents: HashMap<ContainerId, usize> = HashMap::new();
    let mut owners: HashMap<PanelId, usize> = HashMap::new();

    for c in containers.iter().flatten() {
        for &child in &c.children {
            if child.slot() >= containers.len() {
                return Err(SceneError::InvalidContainerRef {
                    parent: c.id,
                    child,
                }
                .into());
            }
            *parents.entry(child).or_default() += 1;
        }
        for &panel in &c.panels {
            if panel.slot() >= panels.len() {
                return Err(SceneError::InvalidPanelRef {
                    container: c.id,
                    panel,
                }
                .into());
            }
            *owners.entry(panel).or_default() += 1;
        }
    }

    // A container has at most one parent
    for (&container, &count) in &parents {
        if count > 1 {
            return Err(SceneError::MultipleParents {
                container,
                parents: count,
            }
            .into());
        }
    }

    // Every live panel has exactly one owner
    for p in panels.iter().flatten() {
        let count = owners.get(&p.id).copied().unwrap_or(0);
        if count != 1 {
            return Err(SceneError::PanelOwnership {
                panel: p.id,
                owners: count,
            }
            .into());
        }
    }

    validate_acyclic(containers, &parents)?;
    validate_elements(panels)?;

    Ok(())
}

/// With single parents guaranteed, a cycle exists iff some live container is
/// unreachable from the parentless roots.
fn validate_acyclic(
    containers: &[Option<Container>],
    parents: &HashMap<ContainerId, usize>,
) -> FpResult<()> {
    let mut reached: HashSet<ContainerId> = HashSet::new();
    let mut stack: Vec<ContainerId> = containers
        .iter()
        .flatten()
        .filter(|c| !parents.contains_key(&c.id))
        .map(|c| c.id)
        .collect();

    while let Some(id) = stack.pop() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(Some(c)) = containers.get(id.slot()) {
            stack.extend(c.children.iter().copied());
        }
    }

    for c in containers.iter().flatten() {
        if !reached.contains(&c.id) {
            return Err(SceneError::ContainerCycle { container: c.id }.into());
        }
    }
    Ok(())
}

fn validate_elements(panels: &[Option<Panel>]) -> FpResult<()> {
    let mut seen = HashSet::new();
    for p in panels.iter().flatten() {
        for e in &p.elements {
            if !seen.insert(e.id) {
                return Err(SceneError::DuplicateElement { element: e.id }.into());
            }
        }
        if let Some(legend) = &p.legend {
            for entry in &legend.entries {
                if p.element(entry.element).is_none() {
                    return Err(SceneError::DanglingLegendEntry {
                        panel: p.id,
                        element: entry.element,
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelKind;
    use crate::scene::ContainerKind;
    use fp_core::Id;

    fn container(i: u32, kind: ContainerKind) -> Container {
        Container {
            id: Id::from_index(i),
            name: format!("C{i}"),
            kind,
            children: vec![],
            panels: vec![],
            tags: vec![],
            background: None,
        }
    }

    #[test]
    fn validate_empty_scene() {
        assert!(validate_structure(&[], &[]).is_ok());
    }

    #[test]
    fn orphan_panel_rejected() {
        let containers = vec![Some(container(0, ContainerKind::Window))];
        let panels = vec![Some(Panel::new(Id::from_index(0), PanelKind::Cartesian))];
        let result = validate_structure(&containers, &panels);
        assert!(matches!(
            result.unwrap_err(),
            fp_core::FpError::Invariant { .. }
        ));
    }

    #[test]
    fn shared_panel_rejected() {
        let mut a = container(0, ContainerKind::Window);
        let mut b = container(1, ContainerKind::Tab);
        a.children.push(Id::from_index(1));
        a.panels.push(Id::from_index(0));
        b.panels.push(Id::from_index(0));
        let panels = vec![Some(Panel::new(Id::from_index(0), PanelKind::Cartesian))];
        assert!(validate_structure(&[Some(a), Some(b)], &panels).is_err());
    }

    #[test]
    fn cycle_rejected() {
        let mut root = container(0, ContainerKind::Window);
        let mut a = container(1, ContainerKind::Tab);
        let mut b = container(2, ContainerKind::TiledGrid { rows: 1, cols: 1 });
        root.children.clear();
        a.children.push(Id::from_index(2));
        b.children.push(Id::from_index(1));
        assert!(validate_structure(&[Some(root), Some(a), Some(b)], &[]).is_err());
    }

    #[test]
    fn deleted_slot_reference_tolerated() {
        let mut root = container(0, ContainerKind::Window);
        root.children.push(Id::from_index(1));
        assert!(validate_structure(&[Some(root), None], &[]).is_ok());
    }

    #[test]
    fn out_of_range_reference_rejected() {
        let mut root = container(0, ContainerKind::Window);
        root.children.push(Id::from_index(9));
        assert!(validate_structure(&[Some(root)], &[]).is_err());
    }
}
