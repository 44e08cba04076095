//! Incremental scene builder.

use fp_core::{ContainerId, ElementId, FpResult, PanelId, Rgb};

use crate::element::{ElementKind, PlotElement, TextProps};
use crate::error::SceneError;
use crate::legend::{Legend, LegendEntry};
use crate::panel::{ColorAxis, Panel, PanelKind};
use crate::scene::{Container, ContainerKind, Scene};
use crate::validate;

/// Builder for constructing a scene incrementally.
///
/// Use `add_window`, `add_tab`, `add_grid`, `add_panel` and `add_element` to
/// describe the host's object tree, then call `build()` to validate it.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    containers: Vec<Container>,
    panels: Vec<Panel>,
    next_element_id: u32,
    current: Option<ContainerId>,
    errors: Vec<SceneError>,
}

impl SceneBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level window. The first window becomes the current one.
    pub fn add_window(&mut self, name: impl Into<String>) -> ContainerId {
        let id = self.push_container(name.into(), ContainerKind::Window);
        if self.current.is_none() {
            self.current = Some(id);
        }
        id
    }

    /// Add a tab under `parent`.
    pub fn add_tab(&mut self, parent: ContainerId, name: impl Into<String>) -> ContainerId {
        self.add_container(parent, name, ContainerKind::Tab)
    }

    /// Add a `rows x cols` tiled grid under `parent`.
    pub fn add_grid(
        &mut self,
        parent: ContainerId,
        name: impl Into<String>,
        rows: u32,
        cols: u32,
    ) -> ContainerId {
        self.add_container(parent, name, ContainerKind::TiledGrid { rows, cols })
    }

    /// Add a child container of any kind under `parent`.
    pub fn add_container(
        &mut self,
        parent: ContainerId,
        name: impl Into<String>,
        kind: ContainerKind,
    ) -> ContainerId {
        let id = self.push_container(name.into(), kind);
        match self.containers.get_mut(parent.slot()) {
            Some(p) if p.id != id => p.children.push(id),
            _ => self.errors.push(SceneError::InvalidContainerRef { parent, child: id }),
        }
        id
    }

    /// Add a panel owned by `container`.
    pub fn add_panel(&mut self, container: ContainerId, kind: PanelKind) -> PanelId {
        let id = PanelId::from_index(self.panels.len() as u32);
        self.panels.push(Panel::new(id, kind));
        match self.containers.get_mut(container.slot()) {
            Some(c) => c.panels.push(id),
            None => self.errors.push(SceneError::InvalidPanelRef {
                container,
                panel: id,
            }),
        }
        id
    }

    /// Append an element to `panel` (creation order is preserved).
    pub fn add_element(
        &mut self,
        panel: PanelId,
        display_name: impl Into<String>,
        kind: ElementKind,
    ) -> ElementId {
        let id = ElementId::from_index(self.next_element_id);
        self.next_element_id += 1;
        match self.panels.get_mut(panel.slot()) {
            Some(p) => p.elements.push(PlotElement::new(id, display_name, kind)),
            None => self
                .errors
                .push(SceneError::InvalidElementOwner { element: id, panel }),
        }
        id
    }

    pub fn tag_container(&mut self, id: ContainerId, tag: impl Into<String>) {
        if let Some(c) = self.containers.get_mut(id.slot()) {
            c.tags.push(tag.into());
        }
    }

    pub fn tag_panel(&mut self, id: PanelId, tag: impl Into<String>) {
        if let Some(p) = self.panels.get_mut(id.slot()) {
            p.tags.push(tag.into());
        }
    }

    pub fn tag_element(&mut self, id: ElementId, tag: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.tags.push(tag.into());
        }
    }

    pub fn set_element_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(e) = self.element_mut(id) {
            e.visible = visible;
        }
    }

    pub fn set_legend_icon(&mut self, id: ElementId, legend_icon: bool) {
        if let Some(e) = self.element_mut(id) {
            e.legend_icon = legend_icon;
        }
    }

    pub fn set_title(&mut self, panel: PanelId, text: impl Into<String>) {
        if let Some(p) = self.panels.get_mut(panel.slot()) {
            p.title = TextProps::new(text);
        }
    }

    pub fn set_axis_labels(
        &mut self,
        panel: PanelId,
        x: impl Into<String>,
        y: impl Into<String>,
    ) {
        if let Some(p) = self.panels.get_mut(panel.slot()) {
            p.x_label = TextProps::new(x);
            p.y_label = TextProps::new(y);
        }
    }

    pub fn set_background(&mut self, container: ContainerId, color: Rgb) {
        if let Some(c) = self.containers.get_mut(container.slot()) {
            c.background = Some(color);
        }
    }

    /// Attach a colorbar to `panel`.
    pub fn add_color_axis(&mut self, panel: PanelId) {
        if let Some(p) = self.panels.get_mut(panel.slot()) {
            p.color_axis = Some(ColorAxis::default());
        }
    }

    /// Attach a legend listing the panel's current candidates in creation order.
    pub fn add_legend(&mut self, panel: PanelId) {
        if let Some(p) = self.panels.get_mut(panel.slot()) {
            let entries = p
                .legend_candidates()
                .map(|e| LegendEntry {
                    element: e.id,
                    label: e.display_name.clone(),
                    label_color: Rgb::BLACK,
                    icon_alpha: 1.0,
                    icon_color: e.kind.icon_color(),
                })
                .collect();
            p.legend = Some(Legend::new(entries));
        }
    }

    /// Build and validate the scene.
    pub fn build(self) -> FpResult<Scene> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err.into());
        }

        let containers: Vec<Option<Container>> = self.containers.into_iter().map(Some).collect();
        let panels: Vec<Option<Panel>> = self.panels.into_iter().map(Some).collect();

        validate::validate_structure(&containers, &panels)?;

        Ok(Scene {
            containers,
            panels,
            current: self.current,
        })
    }

    fn push_container(&mut self, name: String, kind: ContainerKind) -> ContainerId {
        let id = ContainerId::from_index(self.containers.len() as u32);
        self.containers.push(Container {
            id,
            name,
            kind,
            children: Vec::new(),
            panels: Vec::new(),
            tags: Vec::new(),
            background: None,
        });
        id
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut PlotElement> {
        self.panels
            .iter_mut()
            .flat_map(|p| p.elements.iter_mut())
            .find(|e| e.id == id)
    }
}
