use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use fp_app::{BeautifyRequest, beautify};
use fp_core::Rgb;
use fp_scene::{ElementKind, PanelKind, Scene, SceneBuilder};
use serde_json::{Value, json};
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A window with one deleted panel and one panel holding an unstylable bar.
fn troubled_figure() -> Scene {
    let mut b = SceneBuilder::new();
    let w = b.add_window("w");
    let deleted = b.add_panel(w, PanelKind::Cartesian);
    let p = b.add_panel(w, PanelKind::Cartesian);
    b.add_element(p, "", ElementKind::bar());
    b.add_element(p, "ok", ElementKind::line());
    let mut scene = b.build().unwrap();
    scene.remove_panel(deleted);
    if let ElementKind::Bar(bar) = &mut scene.panel_mut(p).unwrap().elements[0].kind {
        bar.face_color = Rgb::new(f64::NAN, 0.0, 0.0);
    }
    scene
}

/// Run a beautify pass with a WARN-level subscriber installed and return
/// everything it printed.
fn run_captured(overrides: Value) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut scene = troubled_figure();
    let request = BeautifyRequest {
        overrides: &overrides,
        ..BeautifyRequest::default()
    };
    tracing::subscriber::with_default(subscriber, || {
        let report = beautify(&mut scene, &request, None).unwrap();
        assert_eq!(report.traversal_warnings.len(), 1);
        assert_eq!(report.panels[0].element_failures, 1);
    });
    captured.text()
}

#[test]
fn silent_run_prints_nothing() {
    let out = run_captured(json!({"verbosity": 0}));
    assert!(out.is_empty(), "{out}");
}

#[test]
fn normal_run_reports_each_problem_once() {
    let out = run_captured(json!({"verbosity": 1}));
    assert_eq!(out.matches("lists missing panel").count(), 1, "{out}");
    assert_eq!(out.matches("has an invalid color").count(), 1, "{out}");
}
