//! tristep CLI - convert triangle meshes to STEP files
//!
//! Reads an STL file and writes every triangle as a planar face of one
//! STEP B-rep solid.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tristep_step::{ExportStats, LengthUnit, Schema, StepExporter, StepOptions};

#[derive(Parser)]
#[command(name = "tristep")]
#[command(about = "Convert triangle meshes to STEP B-rep files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export an STL file to STEP
    Export {
        /// Input .stl file (ASCII or binary)
        input: PathBuf,
        /// Output file, or a directory to write model.step into
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// TOML file with export options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Product name (default: derived from the input file name)
        #[arg(short, long)]
        name: Option<String>,
        /// Length unit of the input coordinates (mm, cm, m)
        #[arg(long)]
        unit: Option<LengthUnit>,
        /// Application protocol (ap203, ap214)
        #[arg(long)]
        schema: Option<Schema>,
        /// Print export statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display triangle and vertex counts of an STL file
    Info {
        /// Path to the .stl file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            name,
            unit,
            schema,
            json,
        } => {
            let mut options = load_options(config.as_deref())?;
            apply_overrides(&mut options, &input, name, unit, schema);
            let stats = export_file(&input, output.as_deref(), options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_options(config: Option<&Path>) -> Result<StepOptions> {
    let Some(path) = config else {
        return Ok(StepOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    StepOptions::from_toml_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Command-line flags win over the config file. Without either, the
/// product is named after the input file.
fn apply_overrides(
    options: &mut StepOptions,
    input: &Path,
    name: Option<String>,
    unit: Option<LengthUnit>,
    schema: Option<Schema>,
) {
    if let Some(name) = name {
        options.product_name = name;
    } else if options.product_name == StepOptions::default().product_name {
        if let Some(stem) = input.file_stem().and_then(|s| s.to_str()) {
            options.product_name = stem.to_string();
        }
    }
    if let Some(unit) = unit {
        options.unit = unit;
    }
    if let Some(schema) = schema {
        options.schema = schema;
    }
}

/// Where the file lands: `output` itself, `output/<file_name>` when it is a
/// directory, or `./<file_name>` when absent.
fn resolve_output(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

fn export_file(input: &Path, output: Option<&Path>, mut options: StepOptions) -> Result<ExportStats> {
    let target = resolve_output(output, &options.file_name);
    let ext = target.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !StepExporter::default().can_export(ext) {
        bail!("Unknown output format: {} (expected .step or .stp)", ext);
    }
    if let Some(file_name) = target.file_name().and_then(|n| n.to_str()) {
        options.file_name = file_name.to_string();
    }

    let mesh = tristep_mesh::load_stl(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let file = StepExporter::new(options).export(&mesh)?;
    fs::write(&target, &file.content)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    let stats = file.stats();
    if stats.degenerate_triangles > 0 {
        tracing::warn!(
            "{} degenerate triangles written with a +Z normal",
            stats.degenerate_triangles
        );
    }
    tracing::info!(
        "Exported {} faces ({} vertices) to {}",
        stats.triangles,
        stats.vertices,
        target.display()
    );
    Ok(stats)
}

fn show_info(file: &Path) -> Result<()> {
    let mesh = tristep_mesh::load_stl(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let stats = StepExporter::default().export(&mesh)?.stats();

    println!("STL mesh: {}", file.display());
    println!("  Triangles: {}", stats.triangles);
    println!("  Distinct vertices: {}", stats.vertices);
    println!("  Degenerate triangles: {}", stats.degenerate_triangles);
    println!("  STEP entities: {}", stats.entities);
    Ok(())
}
