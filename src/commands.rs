//! Command implementations behind the CLI

use crate::cli::{Cli, Commands, ConfigArgs, GenerateArgs};
use anyhow::{bail, Context, Result};
use patune_settings::{load_config, Config};
use patune_toolpath::{
    advance_for_height, schedule, tower_height, GcodeWriter, LayerKind, TowerSummary,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            generate(&args)?;
        }
        Commands::Schedule { config, json } => {
            let config = load(&config)?;
            print_schedule(&config, json, &mut io::stdout().lock())?;
        }
        Commands::Lookup { height, config } => {
            let config = load(&config)?;
            lookup(&config, height, &mut io::stdout().lock())?;
        }
        Commands::InitConfig { path, force } => {
            init_config(&path, force)?;
        }
    }
    Ok(())
}

fn load(args: &ConfigArgs) -> Result<Config> {
    load_config(args.config.as_deref()).context("Failed to load configuration")
}

/// Apply command line overrides on top of the loaded config
pub fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if let Some(flavor) = args.flavor {
        config.output.flavor = flavor;
    }
    if args.header {
        config.output.header_comments = true;
    }
    if let Some(layers) = args.layers {
        config.tower.layers = layers;
    }
    if let Some(pa_min) = args.pa_min {
        config.tower.pa_min = pa_min;
    }
    if let Some(pa_max) = args.pa_max {
        config.tower.pa_max = pa_max;
    }
    if let Some(temp) = args.nozzle_temp {
        config.tower.nozzle_temp = temp;
    }
    if let Some(temp) = args.bed_temp {
        config.tower.bed_temp = temp;
    }
}

/// Generate the tower into the requested output
pub fn generate(args: &GenerateArgs) -> Result<TowerSummary> {
    let mut config = load(&args.config)?;
    apply_overrides(&mut config, args);

    // Validate before touching the output so a bad value leaves nothing behind
    let generator = config.generator().context("Invalid tower parameters")?;

    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = GcodeWriter::new(BufWriter::new(file));
            let summary = generator.run(&mut writer)?;
            writer.flush()?;
            info!("Wrote {} lines to {}", summary.instructions, path.display());
            summary
        }
        None => {
            let mut writer = GcodeWriter::new(BufWriter::new(io::stdout().lock()));
            let summary = generator.run(&mut writer)?;
            writer.flush()?;
            summary
        }
    };

    info!(
        layers = summary.layers_printed,
        filament_mm = summary.total_extrusion,
        height_mm = tower_height(&config.tower),
        "Tower summary"
    );
    Ok(summary)
}

/// Print the per-layer schedule as a table or JSON
pub fn print_schedule(config: &Config, json: bool, out: &mut dyn Write) -> Result<()> {
    config.validate()?;
    let plan = schedule(&config.tower);

    if json {
        serde_json::to_writer_pretty(&mut *out, &plan)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{:>5}  {:>9}  {:>8}  {:>8}", "layer", "kind", "z (mm)", "advance")?;
    for layer in plan {
        let kind = match layer.kind {
            LayerKind::First => "first",
            LayerKind::Sweep => "sweep",
            LayerKind::Finishing => "finishing",
        };
        writeln!(
            out,
            "{:>5}  {:>9}  {:>8.3}  {:>8.4}",
            layer.number, kind, layer.z, layer.advance
        )?;
    }
    Ok(())
}

/// Print the pressure advance printed at `height`
pub fn lookup(config: &Config, height: f64, out: &mut dyn Write) -> Result<f64> {
    let advance = advance_for_height(&config.tower, height)?;
    info!(height, advance, "Looked up pressure advance");
    writeln!(out, "{:.4}", advance)?;
    Ok(advance)
}

/// Write the default config to `path`
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}
