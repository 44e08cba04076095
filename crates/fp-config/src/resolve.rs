//! Configuration resolution: defaults, preset, user overrides, derived values.

use fp_core::Rgb;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ConfigWarning;
use crate::palettes::palette_colors;
use crate::presets::StylePreset;
use crate::rules::field_rules;
use crate::schema::{ConfigRecord, PaletteName, ScalingTable};

/// Values computed from the validated record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFields {
    /// `plot_line_width * axis_to_plot_linewidth_ratio`
    pub axis_line_width: f64,
    /// `base_font_size * global_scale_factor`
    pub effective_base_font_size: f64,
    pub palette: Vec<Rgb>,
    pub scaling: ScalingTable,
}

/// A validated configuration plus its derived values. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub record: ConfigRecord,
    pub derived: DerivedFields,
}

impl ResolvedConfig {
    /// Resolve the built-in defaults with no preset and no overrides.
    pub fn defaults() -> Self {
        resolve(&ConfigRecord::default(), None, &Value::Null).0
    }

    pub fn preset(&self) -> &str {
        &self.record.style_preset
    }
}

/// Merge `defaults`, a preset and user `overrides` into a validated record.
///
/// The preset name comes from `preset`, else from the `style_preset` key of
/// `overrides`, else `default`. Every problem is reported as a warning and the
/// offending value falls back to its default, so this never fails.
pub fn resolve(
    defaults: &ConfigRecord,
    preset: Option<&str>,
    overrides: &Value,
) -> (ResolvedConfig, Vec<ConfigWarning>) {
    let mut warnings = Vec::new();

    let default_map = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        _ => {
            warnings.push(ConfigWarning::Inconsistent {
                what: "default record is not a mapping".to_string(),
            });
            return (finish(defaults.clone(), defaults, &mut warnings), warnings);
        }
    };

    let empty = Map::new();
    let user = match overrides {
        Value::Null => &empty,
        Value::Object(map) => map,
        other => {
            warnings.push(ConfigWarning::InvalidValue {
                field: "overrides".to_string(),
                value: other.to_string(),
                reason: "expected a mapping of parameter names to values".to_string(),
            });
            &empty
        }
    };

    let mut merged = default_map.clone();

    let requested = preset
        .map(str::to_string)
        .or_else(|| user.get("style_preset").and_then(Value::as_str).map(str::to_string));
    let chosen = match requested.as_deref() {
        None => StylePreset::Default,
        Some(name) => StylePreset::from_name(name).unwrap_or_else(|| {
            warnings.push(ConfigWarning::UnknownPreset {
                name: name.to_string(),
            });
            StylePreset::Default
        }),
    };
    for (key, value) in chosen.overrides() {
        merged.insert(key.to_string(), value);
    }

    for (key, value) in user {
        if key == "style_preset" {
            if !value.is_string() {
                warnings.push(ConfigWarning::InvalidValue {
                    field: key.clone(),
                    value: value.to_string(),
                    reason: "expected a preset name".to_string(),
                });
            }
            continue;
        }
        match default_map.get(key) {
            None => warnings.push(ConfigWarning::UnknownParameter { name: key.clone() }),
            Some(Value::Object(section_defaults)) => {
                merge_section(key, section_defaults, value, &mut merged, &mut warnings)
            }
            Some(_) => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged.insert(
        "style_preset".to_string(),
        Value::String(chosen.name().to_string()),
    );

    let default_value = Value::Object(default_map);
    let mut merged = Value::Object(merged);
    for rule in field_rules() {
        let Some(slot) = value_at_mut(&mut merged, rule.path) else {
            continue;
        };
        match rule.rule.apply(slot) {
            Ok(canonical) => *slot = canonical,
            Err(reason) => {
                warnings.push(ConfigWarning::InvalidValue {
                    field: rule.path.to_string(),
                    value: slot.to_string(),
                    reason,
                });
                *slot = value_at(&default_value, rule.path).cloned().unwrap_or(Value::Null);
            }
        }
    }

    let record = match serde_json::from_value::<ConfigRecord>(merged) {
        Ok(record) => record,
        Err(err) => {
            warnings.push(ConfigWarning::Inconsistent {
                what: format!("merged record rejected ({err}); using defaults"),
            });
            defaults.clone()
        }
    };

    (finish(record, defaults, &mut warnings), warnings)
}

fn merge_section(
    section: &str,
    section_defaults: &Map<String, Value>,
    value: &Value,
    merged: &mut Map<String, Value>,
    warnings: &mut Vec<ConfigWarning>,
) {
    let Value::Object(fields) = value else {
        warnings.push(ConfigWarning::InvalidValue {
            field: section.to_string(),
            value: value.to_string(),
            reason: "expected a mapping".to_string(),
        });
        return;
    };
    let Some(Value::Object(target)) = merged.get_mut(section) else {
        return;
    };
    for (name, v) in fields {
        if section_defaults.contains_key(name) {
            target.insert(name.clone(), v.clone());
        } else {
            warnings.push(ConfigWarning::UnknownSubParameter {
                section: section.to_string(),
                name: name.clone(),
            });
        }
    }
}

fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |v, key| v.get(key))
}

fn value_at_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(root, |v, key| v.get_mut(key))
}

/// Cross-field checks, then derived values.
fn finish(
    mut record: ConfigRecord,
    defaults: &ConfigRecord,
    warnings: &mut Vec<ConfigWarning>,
) -> ResolvedConfig {
    if record.min_scale_factor > record.max_scale_factor {
        warnings.push(ConfigWarning::Inconsistent {
            what: format!(
                "min_scale_factor {} exceeds max_scale_factor {}; both reset",
                record.min_scale_factor, record.max_scale_factor
            ),
        });
        record.min_scale_factor = defaults.min_scale_factor;
        record.max_scale_factor = defaults.max_scale_factor;
    }

    if let Some(problem) = table_shape_problem(&record.density_scaling) {
        warnings.push(ConfigWarning::Inconsistent {
            what: format!("density_scaling {problem}; table reset"),
        });
        record.density_scaling = defaults.density_scaling.clone();
    }

    let (lo, hi) = (record.min_scale_factor, record.max_scale_factor);
    for (density, factor) in record.density_scaling.iter_mut() {
        if *factor < lo || *factor > hi {
            let clamped = factor.clamp(lo, hi);
            warnings.push(ConfigWarning::Inconsistent {
                what: format!(
                    "density_scaling factor {factor} at density {density} \
                     outside [{lo}, {hi}]; clamped to {clamped}"
                ),
            });
            *factor = clamped;
        }
    }

    if record.color_palette == PaletteName::Custom && record.custom_color_palette.is_empty() {
        let fallback = match defaults.color_palette {
            PaletteName::Custom => PaletteName::Tab10,
            other => other,
        };
        warnings.push(ConfigWarning::Inconsistent {
            what: format!(
                "color_palette is custom but custom_color_palette is empty; using {fallback:?}"
            ),
        });
        record.color_palette = fallback;
    }

    let palette = palette_colors(record.color_palette, &record.custom_color_palette);
    let scaling = record.scaling_table().unwrap_or_else(|err| {
        warnings.push(ConfigWarning::Inconsistent {
            what: format!("scaling table unusable ({err}); scaling disabled"),
        });
        ScalingTable::identity()
    });

    let derived = DerivedFields {
        axis_line_width: record.plot_line_width * record.axis_to_plot_linewidth_ratio,
        effective_base_font_size: record.base_font_size * record.global_scale_factor,
        palette,
        scaling,
    };
    ResolvedConfig { record, derived }
}

fn table_shape_problem(points: &[(u32, f64)]) -> Option<&'static str> {
    if points.is_empty() {
        return Some("is empty");
    }
    for pair in points.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Some("repeats a density");
        }
        if pair[1].1 > pair[0].1 {
            return Some("has a factor that increases with density");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BoxStyle, CycleMode, GridDensity};
    use serde_json::json;

    fn run(preset: Option<&str>, overrides: Value) -> (ResolvedConfig, Vec<ConfigWarning>) {
        resolve(&ConfigRecord::default(), preset, &overrides)
    }

    #[test]
    fn defaults_resolve_cleanly() {
        let (cfg, warnings) = run(None, Value::Null);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(cfg.record, ConfigRecord::default());
        assert!((cfg.derived.axis_line_width - 0.75).abs() < 1e-12);
        assert!((cfg.derived.effective_base_font_size - 11.0).abs() < 1e-12);
        assert_eq!(cfg.derived.palette.len(), 10);
    }

    #[test]
    fn every_preset_resolves_without_warnings() {
        for preset in StylePreset::ALL {
            let (cfg, warnings) = run(Some(preset.name()), Value::Null);
            assert!(warnings.is_empty(), "{}: {warnings:?}", preset.name());
            assert_eq!(cfg.preset(), preset.name());
        }
    }

    #[test]
    fn unknown_preset_falls_back() {
        let (cfg, warnings) = run(Some("poster"), Value::Null);
        assert_eq!(cfg.preset(), "default");
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownPreset {
                name: "poster".to_string()
            }]
        );
    }

    #[test]
    fn preset_from_overrides_and_user_wins() {
        let (cfg, warnings) = run(
            None,
            json!({"style_preset": "minimalist", "box_style": "on"}),
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(cfg.preset(), "minimalist");
        assert_eq!(cfg.record.grid_density, GridDensity::None);
        assert_eq!(cfg.record.box_style, BoxStyle::On);
    }

    #[test]
    fn explicit_preset_beats_override_key() {
        let (cfg, _) = run(Some("publication"), json!({"style_preset": "minimalist"}));
        assert_eq!(cfg.preset(), "publication");
    }

    #[test]
    fn invalid_value_resets_to_default() {
        let (cfg, warnings) = run(None, json!({"base_font_size": 500, "legend_fade_alpha": "x"}));
        assert_eq!(cfg.record.base_font_size, 11.0);
        assert_eq!(cfg.record.legend_fade_alpha, 0.25);
        let fields: Vec<_> = warnings.iter().filter_map(ConfigWarning::field).collect();
        assert_eq!(fields, vec!["base_font_size", "legend_fade_alpha"]);
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let (cfg, warnings) = run(
            None,
            json!({
                "fontsize": 12,
                "export_settings": {"enabled": true, "dpi": 600},
            }),
        );
        assert!(cfg.record.export_settings.enabled);
        assert_eq!(cfg.record.export_settings.resolution, 300);
        assert!(warnings.contains(&ConfigWarning::UnknownParameter {
            name: "fontsize".to_string()
        }));
        assert!(warnings.contains(&ConfigWarning::UnknownSubParameter {
            section: "export_settings".to_string(),
            name: "dpi".to_string()
        }));
    }

    #[test]
    fn sub_fields_validate_individually() {
        let (cfg, warnings) = run(
            None,
            json!({"export_settings": {"resolution": 10, "format": "SVG"}}),
        );
        assert_eq!(cfg.record.export_settings.resolution, 300);
        assert_eq!(
            cfg.record.export_settings.format,
            crate::schema::ExportFormat::Svg
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field(), Some("export_settings.resolution"));
    }

    #[test]
    fn non_mapping_overrides_warn() {
        let (cfg, warnings) = run(None, json!([1, 2, 3]));
        assert_eq!(cfg.record, ConfigRecord::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn canonicalization_applies() {
        let (cfg, warnings) = run(
            None,
            json!({
                "axis_color": "#ff0000",
                "cycle_marker_styles": true,
                "grid_density": "MAJOR_ONLY",
                "density_scaling": [[4, 0.8], [1, 1.0]],
            }),
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(cfg.record.axis_color, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(cfg.record.cycle_marker_styles, CycleMode::On);
        assert_eq!(cfg.record.grid_density, GridDensity::MajorOnly);
        assert_eq!(cfg.derived.scaling.points(), &[(1, 1.0), (4, 0.8)]);
    }

    #[test]
    fn swapped_bounds_reset_both() {
        let (cfg, warnings) = run(None, json!({"min_scale_factor": 2.0, "max_scale_factor": 1.0}));
        assert_eq!(cfg.record.min_scale_factor, 0.5);
        assert_eq!(cfg.record.max_scale_factor, 1.2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn table_factors_clamped_into_bounds() {
        let (cfg, warnings) = run(None, json!({"density_scaling": [[1, 1.5], [4, 0.2]]}));
        assert_eq!(cfg.derived.scaling.points(), &[(1, 1.2), (4, 0.5)]);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn increasing_table_resets() {
        let (cfg, warnings) = run(None, json!({"density_scaling": [[1, 0.8], [4, 0.9]]}));
        assert_eq!(cfg.record.density_scaling, ConfigRecord::default().density_scaling);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn empty_custom_palette_falls_back() {
        let (cfg, warnings) = run(None, json!({"color_palette": "custom"}));
        assert_eq!(cfg.record.color_palette, PaletteName::Tab10);
        assert_eq!(warnings.len(), 1);

        let (cfg, warnings) = run(
            None,
            json!({"color_palette": "custom", "custom_color_palette": [[1, 0, 0], "#0000ff"]}),
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            cfg.derived.palette,
            vec![Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)]
        );
    }

    #[test]
    fn derived_values_follow_overrides() {
        let (cfg, _) = run(
            None,
            json!({"plot_line_width": 2, "axis_to_plot_linewidth_ratio": 0.25,
                   "base_font_size": 10, "global_scale_factor": 1.5}),
        );
        assert!((cfg.derived.axis_line_width - 0.5).abs() < 1e-12);
        assert!((cfg.derived.effective_base_font_size - 15.0).abs() < 1e-12);
    }
}
