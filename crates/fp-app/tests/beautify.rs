use std::path::Path;

use fp_app::{
    AppError, AppResult, BeautifyRequest, ExportRequest, Exporter, Target, beautify,
    beautify_current, click_legend_entry, load_scene, save_scene,
};
use fp_config::{ExportFormat, palettes};
use fp_core::{ContainerId, Id, PanelId, Rgb};
use fp_engine::{ClickOutcome, LegendState};
use fp_scene::{ElementKind, MarkerKind, PanelKind, Scene, SceneBuilder};
use serde_json::json;

/// One window holding a 2x2 grid of three-series panels plus a loose panel.
fn figure() -> (Scene, ContainerId, Vec<PanelId>) {
    let mut b = SceneBuilder::new();
    let w = b.add_window("Figure 1");
    let g = b.add_grid(w, "grid", 2, 2);
    let mut panels = Vec::new();
    for _ in 0..4 {
        let p = b.add_panel(g, PanelKind::Cartesian);
        for name in ["alpha", "beta", "gamma"] {
            b.add_element(p, name, ElementKind::line().with_y_data(vec![1.0, 2.0, 3.0]));
        }
        b.add_legend(p);
        panels.push(p);
    }
    let loose = b.add_panel(w, PanelKind::Cartesian);
    b.add_element(loose, "only", ElementKind::scatter());
    panels.push(loose);
    (b.build().unwrap(), w, panels)
}

#[derive(Default)]
struct RecordingExporter {
    calls: Vec<(ContainerId, ExportRequest)>,
    fail: bool,
}

impl Exporter for RecordingExporter {
    fn export(
        &mut self,
        _scene: &Scene,
        root: ContainerId,
        request: &ExportRequest,
    ) -> AppResult<()> {
        self.calls.push((root, request.clone()));
        if self.fail {
            return Err(AppError::Export {
                message: "disk full".to_string(),
            });
        }
        Ok(())
    }
}

#[test]
fn beautify_is_idempotent() {
    let (mut scene, _, _) = figure();
    let overrides = json!({
        "panel_labeling": {"enabled": true},
        "overlay_settings": {"enabled": true},
    });
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };

    beautify(&mut scene, &request, None).unwrap();
    let once = scene.clone();
    beautify(&mut scene, &request, None).unwrap();
    assert_eq!(scene, once);
}

#[test]
fn current_container_with_defaults() {
    let (mut scene, _, panels) = figure();
    let report = beautify_current(&mut scene).unwrap();

    assert!(report.config_warnings.is_empty());
    assert!(report.traversal_warnings.is_empty());
    assert_eq!(report.panels.len(), 5);
    assert_eq!(report.styled_panels(), 5);

    // grid panels share one group, the loose panel has its own
    let grid_group = report.panels[0].group;
    assert!(report.panels[..4].iter().all(|p| p.group == grid_group));
    assert_ne!(report.panels[4].group, grid_group);
    assert!(report.panels[0].scale < report.panels[4].scale);

    for p in &panels[..4] {
        let panel = scene.panel(*p).unwrap();
        assert_eq!(LegendState::of(panel), LegendState::ShownInteractive);
        assert_eq!(panel.legend.as_ref().unwrap().entries.len(), 3);
    }
    // a single series hides the legend under smart display
    assert_eq!(report.panels[4].legend, Some(LegendState::Hidden));
}

#[test]
fn publication_scenario() {
    let mut b = SceneBuilder::new();
    let w = b.add_window("w");
    let p = b.add_panel(w, PanelKind::Cartesian);
    b.add_element(p, "signal", ElementKind::line());
    b.add_legend(p);
    let mut scene = b.build().unwrap();

    let request = BeautifyRequest {
        target: Target::Container(w),
        preset: Some("publication"),
        ..BeautifyRequest::default()
    };
    let report = beautify(&mut scene, &request, None).unwrap();
    assert_eq!(report.config.preset(), "publication");

    let panel = scene.panel(p).unwrap();
    assert!(panel.legend.is_none());
    assert!(panel.axes.grid_major);
    assert!(!panel.axes.grid_minor);
    let ElementKind::Line(s) = &panel.elements[0].kind else {
        panic!("expected a line");
    };
    assert_eq!(s.color, palettes::LINES[0]);
}

#[test]
fn custom_palette_and_marker_cycling_over_explicit_panels() {
    let (mut scene, _, panels) = figure();
    let overrides = json!({
        "color_palette": "custom",
        "custom_color_palette": [[255, 0, 0], "#00ff00"],
        "cycle_marker_styles": true,
    });
    let request = BeautifyRequest {
        target: Target::Panels(vec![panels[1]]),
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    let report = beautify(&mut scene, &request, None).unwrap();
    assert_eq!(report.panels.len(), 1);

    let styles: Vec<(Rgb, MarkerKind)> = scene
        .panel(panels[1])
        .unwrap()
        .elements
        .iter()
        .map(|e| match &e.kind {
            ElementKind::Line(s) => (s.color, s.marker),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    let red = Rgb::new(1.0, 0.0, 0.0);
    let green = Rgb::new(0.0, 1.0, 0.0);
    assert_eq!(
        styles,
        vec![
            (red, MarkerKind::Circle),
            (green, MarkerKind::Square),
            (red, MarkerKind::TriangleUp),
        ]
    );

    // other panels were not touched
    let untouched = scene.panel(panels[0]).unwrap();
    let ElementKind::Line(s) = &untouched.elements[0].kind else {
        panic!("expected a line");
    };
    assert_eq!(s.marker, MarkerKind::None);
}

#[test]
fn missing_target_is_the_only_hard_error() {
    let (mut scene, _, _) = figure();

    let missing = BeautifyRequest {
        target: Target::Container(Id::from_index(99)),
        ..BeautifyRequest::default()
    };
    assert!(matches!(
        beautify(&mut scene, &missing, None),
        Err(AppError::NoTarget { .. })
    ));

    let empty = BeautifyRequest {
        target: Target::Panels(Vec::new()),
        ..BeautifyRequest::default()
    };
    assert!(matches!(
        beautify(&mut scene, &empty, None),
        Err(AppError::NoTarget { .. })
    ));

    scene.set_current(None);
    assert!(matches!(
        beautify_current(&mut scene),
        Err(AppError::NoTarget { .. })
    ));

    // bad overrides only warn
    let overrides = json!({"base_font_size": "huge", "no_such_field": 1});
    let noisy = BeautifyRequest {
        target: Target::Container(Id::from_index(0)),
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    let report = beautify(&mut scene, &noisy, None).unwrap();
    assert_eq!(report.config_warnings.len(), 2);
    assert_eq!(report.config.record.base_font_size, 11.0);
}

#[test]
fn deleted_panel_is_skipped_with_warning() {
    let (mut scene, _, panels) = figure();
    scene.remove_panel(panels[2]);

    let report = beautify_current(&mut scene).unwrap();
    assert_eq!(report.traversal_warnings.len(), 1);
    assert_eq!(report.styled_panels(), 4);
    assert!(report.panels.iter().all(|p| p.panel != panels[2]));
}

#[test]
fn panel_labels_follow_traversal_order() {
    let (mut scene, _, panels) = figure();
    let overrides = json!({"panel_labeling": {"enabled": true, "style": "A"}});
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    beautify(&mut scene, &request, None).unwrap();

    let labels: Vec<String> = panels
        .iter()
        .map(|p| scene.panel(*p).unwrap().panel_label.as_ref().unwrap().text.clone())
        .collect();
    assert_eq!(labels, ["A", "B", "C", "D", "E"]);
}

#[test]
fn export_is_handed_off() {
    let (mut scene, window, _) = figure();
    let overrides = json!({
        "export_settings": {
            "enabled": true,
            "filename": "summary",
            "output_dir": "plots",
            "format": "svg",
        }
    });
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    let mut exporter = RecordingExporter::default();
    let report = beautify(&mut scene, &request, Some(&mut exporter)).unwrap();

    assert_eq!(exporter.calls.len(), 1);
    let (root, sent) = &exporter.calls[0];
    assert_eq!(*root, window);
    assert_eq!(sent.path, Path::new("plots").join("summary.svg"));
    assert_eq!(sent.format, ExportFormat::Svg);
    assert_eq!(sent.dpi, None);
    assert_eq!(report.export.as_ref(), Some(sent));
}

#[test]
fn export_failure_does_not_fail_the_run() {
    let (mut scene, _, _) = figure();
    let overrides = json!({"export_settings": {"enabled": true, "resolution": 600}});
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    let mut exporter = RecordingExporter {
        fail: true,
        ..RecordingExporter::default()
    };
    let report = beautify(&mut scene, &request, Some(&mut exporter)).unwrap();
    assert_eq!(exporter.calls.len(), 1);
    let sent = report.export.as_ref().unwrap();
    assert_eq!(sent.dpi, Some(600));
    let name = sent.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("figure_") && name.ends_with(".png"), "{name}");
    assert_eq!(report.styled_panels(), 5);
}

#[test]
fn export_without_exporter_is_skipped() {
    let (mut scene, _, _) = figure();
    let overrides = json!({"export_settings": {"enabled": true}});
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    let report = beautify(&mut scene, &request, None).unwrap();
    assert!(report.export.is_none());
}

#[test]
fn legend_clicks_through_the_scene() {
    let (mut scene, _, panels) = figure();
    beautify_current(&mut scene).unwrap();
    let p = panels[0];
    let beta = scene.panel(p).unwrap().elements[1].id;

    let outcome = click_legend_entry(&mut scene, p, 1, true).unwrap();
    assert_eq!(outcome, ClickOutcome::Isolated { element: beta });
    let visible: Vec<bool> = scene.panel(p).unwrap().elements.iter().map(|e| e.visible).collect();
    assert_eq!(visible, [false, true, false]);

    let outcome = click_legend_entry(&mut scene, p, 1, true).unwrap();
    assert_eq!(outcome, ClickOutcome::Restored);
    assert!(scene.panel(p).unwrap().elements.iter().all(|e| e.visible));

    assert!(matches!(
        click_legend_entry(&mut scene, p, 7, false),
        Err(AppError::Legend(_))
    ));
    assert!(matches!(
        click_legend_entry(&mut scene, Id::from_index(40), 0, false),
        Err(AppError::PanelNotFound(_))
    ));
}

#[test]
fn styled_scene_file_roundtrip() {
    let (mut scene, _, _) = figure();
    beautify_current(&mut scene).unwrap();

    for name in ["fp_app_roundtrip.yaml", "fp_app_roundtrip.json"] {
        let path = std::env::temp_dir().join(name);
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();
        assert_eq!(loaded, scene, "{name}");
    }

    let bad = std::env::temp_dir().join("fp_app_roundtrip.txt");
    assert!(matches!(
        save_scene(&scene, &bad),
        Err(AppError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        load_scene(&std::env::temp_dir().join("fp_app_missing.yaml")),
        Err(AppError::SceneFileRead { .. })
    ));
}

#[test]
fn figure_background_follows_preset() {
    let (mut scene, w, panels) = figure();
    let request = BeautifyRequest {
        target: Target::Panels(vec![panels[4]]),
        preset: Some("presentation_dark"),
        ..BeautifyRequest::default()
    };
    let report = beautify(&mut scene, &request, None).unwrap();
    let dark = report.config.record.figure_background_color;
    assert_eq!(dark, Rgb::new(0.12, 0.12, 0.14));
    assert_eq!(scene.container(w).unwrap().background, Some(dark));

    beautify_current(&mut scene).unwrap();
    assert_eq!(scene.container(w).unwrap().background, Some(Rgb::WHITE));
}

#[test]
fn removed_tab_contents_do_not_break_the_scene_file() {
    let mut b = SceneBuilder::new();
    let w = b.add_window("w");
    let tab = b.add_tab(w, "old");
    let gone = b.add_panel(tab, PanelKind::Cartesian);
    b.add_element(gone, "stale", ElementKind::line());
    let kept = b.add_panel(w, PanelKind::Cartesian);
    b.add_element(kept, "fresh", ElementKind::line());
    b.add_legend(kept);
    let mut scene = b.build().unwrap();

    scene.remove_container(tab);
    assert!(scene.panel(gone).is_none());

    let report = beautify_current(&mut scene).unwrap();
    assert_eq!(report.styled_panels(), 1);
    assert_eq!(report.panels[0].panel, kept);
    assert_eq!(report.traversal_warnings.len(), 1);

    let path = std::env::temp_dir().join("fp_app_removed_tab.json");
    save_scene(&scene, &path).unwrap();
    assert_eq!(load_scene(&path).unwrap(), scene);
}
