//! Scene-specific error types.

use fp_core::{ContainerId, ElementId, FpError, Id, PanelId};

/// Scene construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A container lists a child container that doesn't exist.
    InvalidContainerRef {
        parent: ContainerId,
        child: ContainerId,
    },

    /// A container lists a panel that doesn't exist.
    InvalidPanelRef {
        container: ContainerId,
        panel: PanelId,
    },

    /// An element was attached to a panel that doesn't exist.
    InvalidElementOwner { element: ElementId, panel: PanelId },

    /// An object's id doesn't match its storage slot.
    SlotMismatch {
        what: &'static str,
        id: Id,
        slot: usize,
    },

    /// A panel is owned by zero or several containers (expected exactly 1).
    PanelOwnership { panel: PanelId, owners: usize },

    /// A container is listed as child by several parents.
    MultipleParents { container: ContainerId, parents: usize },

    /// A container is its own ancestor.
    ContainerCycle { container: ContainerId },

    /// Two elements share an id.
    DuplicateElement { element: ElementId },

    /// A legend entry references an element outside its panel.
    DanglingLegendEntry { panel: PanelId, element: ElementId },

    /// ID not found in the scene.
    IdNotFound { what: &'static str },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::InvalidContainerRef { parent, child } => {
                write!(
                    f,
                    "Container {} refers to non-existent child container {}",
                    parent, child
                )
            }
            SceneError::InvalidPanelRef { container, panel } => {
                write!(
                    f,
                    "Container {} refers to non-existent panel {}",
                    container, panel
                )
            }
            SceneError::InvalidElementOwner { element, panel } => {
                write!(
                    f,
                    "Element {} was attached to non-existent panel {}",
                    element, panel
                )
            }
            SceneError::SlotMismatch { what, id, slot } => {
                write!(f, "{} {} is stored in slot {}", what, id, slot)
            }
            SceneError::PanelOwnership { panel, owners } => {
                write!(
                    f,
                    "Panel {} is owned by {} containers (expected 1)",
                    panel, owners
                )
            }
            SceneError::MultipleParents { container, parents } => {
                write!(
                    f,
                    "Container {} has {} parents (expected at most 1)",
                    container, parents
                )
            }
            SceneError::ContainerCycle { container } => {
                write!(f, "Container {} is its own ancestor", container)
            }
            SceneError::DuplicateElement { element } => {
                write!(f, "Element id {} is used more than once", element)
            }
            SceneError::DanglingLegendEntry { panel, element } => {
                write!(
                    f,
                    "Legend of panel {} references element {} that the panel doesn't own",
                    panel, element
                )
            }
            SceneError::IdNotFound { what } => {
                write!(f, "{} not found in scene", what)
            }
        }
    }
}

impl std::error::Error for SceneError {}

impl From<SceneError> for FpError {
    fn from(err: SceneError) -> Self {
        FpError::Invariant {
            what: err.to_string(),
        }
    }
}
