use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use fp_app::{
    AppError, AppResult, BeautifyReport, BeautifyRequest, DryRunExporter, Target, Verbosity,
    beautify, click_legend_entry, load_scene, save_scene,
};
use fp_config::{ConfigRecord, StylePreset, load_overrides, resolve};
use fp_core::Id;
use fp_engine::ClickOutcome;
use serde_json::Value;
use tracing::Level;

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(about = "figpolish CLI - consistent styling for multi-panel figures", long_about = None)]
struct Cli {
    /// Raise log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Beautify a scene file
    Style {
        /// Path to the scene file (.yaml, .yml or .json)
        scene_path: PathBuf,
        /// Override file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Style preset name
        #[arg(short, long)]
        preset: Option<String>,
        /// Container index to style instead of the current container
        #[arg(long)]
        container: Option<u32>,
        /// Where to write the styled scene (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved configuration
    Resolve {
        /// Override file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Style preset name
        #[arg(short, long)]
        preset: Option<String>,
    },
    /// List the built-in style presets
    Presets,
    /// Click an entry of a panel's interactive legend
    Click {
        /// Path to the scene file
        scene_path: PathBuf,
        /// Panel index
        #[arg(long)]
        panel: u32,
        /// Legend entry index (0-based)
        #[arg(long)]
        entry: usize,
        /// Isolate the entry (or restore when it is already isolated)
        #[arg(long)]
        modifier: bool,
        /// Where to write the scene (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Style {
            scene_path,
            config,
            preset,
            container,
            output,
        } => cmd_style(
            &scene_path,
            config.as_deref(),
            preset.as_deref(),
            container,
            output.as_deref(),
        ),
        Commands::Resolve { config, preset } => cmd_resolve(config.as_deref(), preset.as_deref()),
        Commands::Presets => {
            cmd_presets();
            Ok(())
        }
        Commands::Click {
            scene_path,
            panel,
            entry,
            modifier,
            output,
        } => cmd_click(&scene_path, panel, entry, modifier, output.as_deref()),
    }
}

fn read_overrides(config: Option<&Path>) -> AppResult<Value> {
    match config {
        Some(path) => Ok(load_overrides(path)?),
        None => Ok(Value::Null),
    }
}

fn cmd_style(
    scene_path: &Path,
    config: Option<&Path>,
    preset: Option<&str>,
    container: Option<u32>,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut scene = load_scene(scene_path)?;
    let overrides = read_overrides(config)?;
    let request = BeautifyRequest {
        target: container.map_or(Target::Current, |i| Target::Container(Id::from_index(i))),
        preset,
        overrides: &overrides,
    };

    let mut exporter = DryRunExporter;
    let report = beautify(&mut scene, &request, Some(&mut exporter))?;
    print_report(&report);

    let output = output.unwrap_or(scene_path);
    save_scene(&scene, output)?;
    println!("✓ Styled scene written to {}", output.display());
    Ok(())
}

fn print_report(report: &BeautifyReport) {
    println!("Preset: {}", report.config.preset());
    if Verbosity::from_level(report.config.record.verbosity).reports_warnings() {
        for warning in &report.config_warnings {
            println!("  warning: {warning}");
        }
        for warning in &report.traversal_warnings {
            println!("  warning: {warning}");
        }
    }
    println!(
        "Styled {} of {} panels:",
        report.styled_panels(),
        report.panels.len()
    );
    for p in &report.panels {
        let legend = match p.legend {
            Some(state) => format!("{state:?}"),
            None => "not styled".to_string(),
        };
        print!(
            "  panel {}  group {}  scale {:.3}  legend {}",
            p.panel, p.group, p.scale, legend
        );
        if p.element_failures > 0 {
            print!("  ({} element failures)", p.element_failures);
        }
        println!();
    }
    if let Some(export) = &report.export {
        println!("Export: {}", export.path.display());
    }
}

fn cmd_resolve(config: Option<&Path>, preset: Option<&str>) -> AppResult<()> {
    let overrides = read_overrides(config)?;
    let (resolved, warnings) = resolve(&ConfigRecord::default(), preset, &overrides);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    let text = serde_yaml::to_string(&resolved).map_err(|e| AppError::Serialize(e.to_string()))?;
    print!("{text}");
    Ok(())
}

fn cmd_presets() {
    println!("Style presets:");
    for preset in StylePreset::ALL {
        println!("  {:<20} {}", preset.name(), preset.description());
    }
}

fn cmd_click(
    scene_path: &Path,
    panel: u32,
    entry: usize,
    modifier: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut scene = load_scene(scene_path)?;
    let outcome = click_legend_entry(&mut scene, Id::from_index(panel), entry, modifier)?;
    match outcome {
        ClickOutcome::Ignored => println!("Legend is not interactive; nothing changed"),
        ClickOutcome::Toggled { element, visible } => {
            let state = if visible { "shown" } else { "hidden" };
            println!("Element {element} {state}");
        }
        ClickOutcome::Isolated { element } => println!("Element {element} isolated"),
        ClickOutcome::Restored => println!("Visibility restored"),
    }
    if outcome != ClickOutcome::Ignored {
        let output = output.unwrap_or(scene_path);
        save_scene(&scene, output)?;
        println!("✓ Scene written to {}", output.display());
    }
    Ok(())
}
