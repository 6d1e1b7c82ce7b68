use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rackcad_algo::bracing::BracingMode;
use rackcad_algo::export::ExportOptions;
use rackcad_algo::layout::{LayoutOptions, LevelSpacing};
use rackcad_core::validate::validate_and_complete;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rackcad")]
#[command(about = "Parametric warehouse racking: validate configurations and export STEP assemblies.")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a configuration and print the completed record with its messages.
    Validate {
        input: PathBuf,
        /// Write the completed configuration here instead of printing it.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Lay out the rack and export it as STEP.
    Build {
        input: PathBuf,
        #[arg(long)]
        step: PathBuf,
        /// Also write one STEP file per part under `components/`.
        #[arg(long)]
        components: bool,
        /// Also write `metadata.json` next to the output.
        #[arg(long)]
        metadata: bool,
        #[arg(long, default_value_t = 300.0)]
        bottom_clearance: f64,
        #[arg(long, default_value_t = 400.0)]
        top_clearance: f64,
        /// Target height of one bracing segment (mm).
        #[arg(long, conflicts_with = "bracing_segments")]
        bracing_spacing: Option<f64>,
        /// Fixed number of bracing segments per end frame.
        #[arg(long)]
        bracing_segments: Option<u32>,
        /// Leave out the depth-wise beams on the end frames.
        #[arg(long)]
        no_side_beams: bool,
        /// Ring every column foot with a guard rail.
        #[arg(long)]
        guard_rails: bool,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate { input, output } => validate(&input, output.as_deref()),
        Command::Build {
            input,
            step,
            components,
            metadata,
            bottom_clearance,
            top_clearance,
            bracing_spacing,
            bracing_segments,
            no_side_beams,
            guard_rails,
            report,
        } => {
            let bracing = match (bracing_segments, bracing_spacing) {
                (Some(n), _) => BracingMode::Fixed(n),
                (None, Some(target_spacing)) => BracingMode::Adaptive { target_spacing },
                (None, None) => BracingMode::default(),
            };
            let layout = LayoutOptions {
                level_spacing: LevelSpacing::Clearance {
                    bottom: bottom_clearance,
                    top: top_clearance,
                },
                bracing,
                side_beams: !no_side_beams,
                guard_rails,
                ..LayoutOptions::default()
            };
            let export = ExportOptions {
                components,
                metadata,
                ..ExportOptions::default()
            };
            build(&input, &step, &layout, &export, report.as_deref())
        }
    }
}

fn validate(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = read_config(input)?;
    let validation = validate_and_complete(&raw);
    info!(messages = validation.messages.len(), "validated {}", input.display());

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&validation.config).context("serialize config")?;
        write_output(path, &json)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "messages": validation.messages }))?
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    }
    Ok(())
}

fn build(
    input: &Path,
    step: &Path,
    layout: &LayoutOptions,
    export: &ExportOptions,
    report: Option<&Path>,
) -> Result<()> {
    let raw = read_config(input)?;
    let generation = rackcad_algo::generate(&raw, step, layout, export)?;

    let counts: serde_json::Map<String, Value> = generation
        .assembly
        .count_by_role()
        .into_iter()
        .map(|(role, n)| (role.as_str().to_string(), json!(n)))
        .collect();
    let summary = json!({
        "messages": generation.messages,
        "notes": generation.assembly.notes(),
        "placements": generation.assembly.len(),
        "counts": counts,
        "export": generation.export,
    });
    let json = serde_json::to_string_pretty(&summary).context("serialize report")?;

    if let Some(path) = report {
        write_output(path, &json)?;
    } else {
        println!("{json}");
    }

    if !generation.succeeded() {
        bail!(
            "export to {} failed: {}",
            step.display(),
            generation.export.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<Value> {
    if !path.is_file() {
        bail!("Input does not exist or is not a file: {path:?}");
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse config JSON: {path:?}"))
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir: {parent:?}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write output: {path:?}"))
}
