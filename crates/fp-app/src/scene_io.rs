//! Scene file loading and saving.

use std::fs;
use std::path::Path;

use fp_scene::Scene;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneFormat {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<SceneFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => Ok(SceneFormat::Yaml),
        Some("json") => Ok(SceneFormat::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a scene from a YAML or JSON file and check its structure.
pub fn load_scene(path: &Path) -> AppResult<Scene> {
    let format = format_of(path)?;
    let content = fs::read_to_string(path).map_err(|source| AppError::SceneFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let scene: Scene = match format {
        SceneFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        SceneFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
    }
    .map_err(|message| AppError::SceneParse {
        path: path.to_path_buf(),
        message,
    })?;
    scene.validate()?;
    Ok(scene)
}

/// Save a scene to a YAML or JSON file, chosen by extension.
pub fn save_scene(scene: &Scene, path: &Path) -> AppResult<()> {
    let content = match format_of(path)? {
        SceneFormat::Yaml => serde_yaml::to_string(scene).map_err(|e| e.to_string()),
        SceneFormat::Json => serde_json::to_string_pretty(scene).map_err(|e| e.to_string()),
    }
    .map_err(AppError::Serialize)?;
    fs::write(path, content).map_err(|source| AppError::SceneFileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_of(Path::new("a.YAML")).unwrap(), SceneFormat::Yaml);
        assert_eq!(format_of(Path::new("a.yml")).unwrap(), SceneFormat::Yaml);
        assert_eq!(format_of(Path::new("a.json")).unwrap(), SceneFormat::Json);
        assert!(matches!(
            format_of(Path::new("a.toml")),
            Err(AppError::UnsupportedFormat { .. })
        ));
        assert!(format_of(Path::new("scene")).is_err());
    }
}
