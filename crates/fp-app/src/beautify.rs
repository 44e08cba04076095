//! Beautify service: resolve, walk, scale, style, legend, label, export.

use std::collections::HashMap;

use chrono::Local;
use fp_config::{ConfigRecord, ConfigWarning, ResolvedConfig, resolve};
use fp_core::{ContainerId, PanelId};
use fp_engine::{
    ClickOutcome, Enumeration, GroupId, LegendState, ScaledSizes, TraversalWarning,
    apply_panel_label, enumerate_explicit, enumerate_panels, on_entry_click, scale_factor,
    style_panel, sync_legend,
};
use fp_scene::Scene;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::export::{ExportRequest, Exporter, open_with_default_viewer};
use crate::log::Verbosity;

/// What to beautify.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// The scene's current container.
    #[default]
    Current,
    Container(ContainerId),
    /// An explicit panel list, styled as one density group.
    Panels(Vec<PanelId>),
}

/// Request to beautify part of a scene.
#[derive(Debug, Clone)]
pub struct BeautifyRequest<'a> {
    pub target: Target,
    /// Preset name; when `None` the `style_preset` override (if any) is used.
    pub preset: Option<&'a str>,
    pub overrides: &'a Value,
}

static NO_OVERRIDES: Value = Value::Null;

impl Default for BeautifyRequest<'_> {
    fn default() -> Self {
        Self {
            target: Target::Current,
            preset: None,
            overrides: &NO_OVERRIDES,
        }
    }
}

/// Per-panel result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelReport {
    pub panel: PanelId,
    pub group: GroupId,
    pub scale: f64,
    /// `None` when the panel could not be styled at all.
    pub legend: Option<LegendState>,
    /// Elements that failed to style.
    pub element_failures: usize,
}

/// Everything a run produced besides the in-place scene changes.
#[derive(Debug, Clone)]
pub struct BeautifyReport {
    pub config: ResolvedConfig,
    pub config_warnings: Vec<ConfigWarning>,
    pub traversal_warnings: Vec<TraversalWarning>,
    pub panels: Vec<PanelReport>,
    /// The export request handed to the exporter, if export was enabled.
    pub export: Option<ExportRequest>,
}

impl BeautifyReport {
    pub fn styled_panels(&self) -> usize {
        self.panels.iter().filter(|p| p.legend.is_some()).count()
    }
}

/// Beautify the scene's current container with default settings.
pub fn beautify_current(scene: &mut Scene) -> AppResult<BeautifyReport> {
    beautify(scene, &BeautifyRequest::default(), None)
}

/// Beautify `request.target` in place.
///
/// Configuration problems, dangling references and styling failures are
/// reported and skipped. The only error is a target that does not exist.
pub fn beautify(
    scene: &mut Scene,
    request: &BeautifyRequest<'_>,
    exporter: Option<&mut dyn Exporter>,
) -> AppResult<BeautifyReport> {
    let (config, config_warnings) =
        resolve(&ConfigRecord::default(), request.preset, request.overrides);
    let verbosity = Verbosity::from_level(config.record.verbosity);
    verbosity.warn_all("config", &config_warnings);
    verbosity.detail(format_args!("using preset '{}'", config.preset()));

    let (root, enumeration) = enumerate_target(scene, &request.target, &config)?;
    verbosity.warn_all("traversal", &enumeration.warnings);

    let scales: HashMap<GroupId, f64> = enumeration
        .groups
        .iter()
        .map(|g| (g.id, scale_factor(g.density, &config.derived.scaling)))
        .collect();
    for group in &enumeration.groups {
        verbosity.detail(format_args!(
            "group {} ({:?}): {} panels at density {}, scale {:.3}",
            group.id,
            group.kind,
            group.panels.len(),
            group.density,
            scales.get(&group.id).copied().unwrap_or(1.0)
        ));
    }

    let mut panels = Vec::with_capacity(enumeration.entries.len());
    let mut ordinal = 0;
    for entry in &enumeration.entries {
        let scale = scales.get(&entry.group).copied().unwrap_or(1.0);
        let mut report = PanelReport {
            panel: entry.panel,
            group: entry.group,
            scale,
            legend: None,
            element_failures: 0,
        };
        let Some(panel) = scene.panel_mut(entry.panel) else {
            verbosity.warn(format_args!("panel {} vanished before styling", entry.panel));
            panels.push(report);
            continue;
        };
        let styled = style_panel(panel, &config, scale)
            .and_then(|outcome| Ok((ScaledSizes::compute(&config, scale)?, outcome)));
        match styled {
            Ok((sizes, outcome)) => {
                report.element_failures = outcome.failures.len();
                for (_, err) in &outcome.failures {
                    verbosity.warn(format_args!("panel {}: {err}", entry.panel));
                }
                report.legend = Some(sync_legend(panel, &outcome.candidates, &config, &sizes));
                apply_panel_label(panel, &config, scale, ordinal);
                ordinal += 1;
                verbosity.detail(format_args!(
                    "panel {}: {} candidates, legend {:?}",
                    entry.panel,
                    outcome.candidates.len(),
                    report.legend
                ));
            }
            Err(err) => verbosity.warn(format_args!("panel {} not styled: {err}", entry.panel)),
        }
        panels.push(report);
    }

    let window = scene.top_level(root);
    if let Some(container) = scene.container_mut(window) {
        container.background = Some(config.record.figure_background_color);
    }

    let export = if config.record.export_settings.enabled {
        run_export(scene, root, &config, exporter, verbosity)
    } else {
        None
    };

    let report = BeautifyReport {
        config,
        config_warnings,
        traversal_warnings: enumeration.warnings,
        panels,
        export,
    };
    verbosity.info(format_args!(
        "beautified {} of {} panels in {} density groups",
        report.styled_panels(),
        report.panels.len(),
        enumeration.groups.len()
    ));
    Ok(report)
}

/// Click legend entry `index` of `panel`.
pub fn click_legend_entry(
    scene: &mut Scene,
    panel: PanelId,
    index: usize,
    modifier: bool,
) -> AppResult<ClickOutcome> {
    let panel = scene
        .panel_mut(panel)
        .ok_or(AppError::PanelNotFound(panel))?;
    Ok(on_entry_click(panel, index, modifier)?)
}

fn enumerate_target(
    scene: &Scene,
    target: &Target,
    config: &ResolvedConfig,
) -> AppResult<(ContainerId, Enumeration)> {
    let exclude = &config.record.exclude_tags;
    match target {
        Target::Current => {
            let root = scene.current().ok_or_else(|| AppError::NoTarget {
                reason: "the scene has no current container".to_string(),
            })?;
            Ok((live_container(scene, root)?, enumerate_panels(scene, root, exclude)))
        }
        Target::Container(id) => {
            let root = live_container(scene, *id)?;
            Ok((root, enumerate_panels(scene, root, exclude)))
        }
        Target::Panels(list) => {
            let root = list
                .iter()
                .filter(|p| scene.panel(**p).is_some())
                .find_map(|p| scene.owner_of(*p))
                .map(|c| scene.top_level(c))
                .ok_or_else(|| AppError::NoTarget {
                    reason: format!("none of the {} listed panels exist", list.len()),
                })?;
            Ok((root, enumerate_explicit(scene, list, exclude)))
        }
    }
}

fn live_container(scene: &Scene, id: ContainerId) -> AppResult<ContainerId> {
    match scene.container(id) {
        Some(_) => Ok(id),
        None => Err(AppError::NoTarget {
            reason: format!("container {id} does not exist"),
        }),
    }
}

fn run_export(
    scene: &Scene,
    root: ContainerId,
    config: &ResolvedConfig,
    exporter: Option<&mut dyn Exporter>,
    verbosity: Verbosity,
) -> Option<ExportRequest> {
    let request = ExportRequest::from_settings(&config.record.export_settings, &Local::now());
    let Some(exporter) = exporter else {
        verbosity.warn("export is enabled but no exporter is available; skipped");
        return None;
    };
    debug!(path = %request.path.display(), "handing off export");
    match exporter.export(scene, root, &request) {
        Ok(()) => {
            verbosity.info(format_args!("exported {}", request.path.display()));
            if request.open_after {
                if let Err(err) = open_with_default_viewer(&request.path) {
                    verbosity.warn(err);
                }
            }
        }
        Err(err) => verbosity.warn(format_args!("export failed: {err}")),
    }
    Some(request)
}
