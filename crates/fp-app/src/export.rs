//! Export hand-off.
//!
//! Rendering a figure to a file belongs to the host. This module turns the
//! resolved `export_settings` into an [`ExportRequest`] and passes it to an
//! [`Exporter`].

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use fp_config::{ExportFormat, ExportSettings};
use fp_core::ContainerId;
use fp_scene::Scene;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Everything a host needs to write one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Raster resolution; `None` for vector formats.
    pub dpi: Option<u32>,
    pub transparent_background: bool,
    pub open_after: bool,
}

impl ExportRequest {
    /// Build the request for `settings`, using `now` to name unnamed exports.
    pub fn from_settings(settings: &ExportSettings, now: &DateTime<Local>) -> Self {
        let stem = settings.filename.trim();
        let stem = if stem.is_empty() {
            default_filename(now)
        } else {
            stem.to_string()
        };
        let file = Path::new(&stem).with_extension(settings.format.extension());
        let path = Path::new(&settings.output_dir).join(file);
        Self {
            path,
            format: settings.format,
            dpi: settings
                .format
                .is_raster()
                .then_some(settings.resolution),
            transparent_background: settings.transparent_background,
            open_after: settings.open_after_export,
        }
    }
}

/// `figure_<local timestamp>`, e.g. `figure_20240131_154500`.
pub fn default_filename(now: &DateTime<Local>) -> String {
    format!("figure_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Host side of an export.
pub trait Exporter {
    fn export(&mut self, scene: &Scene, root: ContainerId, request: &ExportRequest)
    -> AppResult<()>;
}

/// Exporter for hosts without a renderer: logs the request and writes nothing.
#[derive(Debug, Default)]
pub struct DryRunExporter;

impl Exporter for DryRunExporter {
    fn export(
        &mut self,
        _scene: &Scene,
        root: ContainerId,
        request: &ExportRequest,
    ) -> AppResult<()> {
        info!(
            container = %root,
            path = %request.path.display(),
            format = request.format.extension(),
            dpi = ?request.dpi,
            "export requested (dry run)"
        );
        Ok(())
    }
}

/// Open `path` with the platform's default viewer without waiting for it.
pub fn open_with_default_viewer(path: &Path) -> AppResult<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| AppError::Export {
            message: format!("could not open {}: {e}", path.display()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 12, 0, 5).unwrap()
    }

    #[test]
    fn unnamed_export_gets_timestamped_name() {
        let settings = ExportSettings {
            enabled: true,
            output_dir: "out".to_string(),
            ..ExportSettings::default()
        };
        let request = ExportRequest::from_settings(&settings, &noon());
        assert_eq!(request.path, Path::new("out").join("figure_20240131_120005.png"));
        assert_eq!(request.dpi, Some(300));
        assert!(!request.open_after);
    }

    #[test]
    fn vector_formats_carry_no_dpi() {
        let settings = ExportSettings {
            filename: "fig".to_string(),
            format: ExportFormat::Svg,
            ..ExportSettings::default()
        };
        let request = ExportRequest::from_settings(&settings, &noon());
        assert_eq!(request.path, Path::new(".").join("fig.svg"));
        assert_eq!(request.dpi, None);
    }

    #[test]
    fn extension_follows_format() {
        let settings = ExportSettings {
            filename: "plot.png".to_string(),
            format: ExportFormat::Pdf,
            ..ExportSettings::default()
        };
        let request = ExportRequest::from_settings(&settings, &noon());
        assert_eq!(request.path.file_name().unwrap(), "plot.pdf");
    }
}
