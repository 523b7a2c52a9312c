// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zeropoint_node::{
    archetypes, describe, generate, harmonic, render, render_grid, verify, vortex_session,
    ConfigLoader, DigitRange, GatewayClassifier, GeneratorConfig, HarmonicMatrix, OutputFormat,
    Universe, VortexSummary,
};

/// CLI arguments for zeropoint
#[derive(Parser, Debug)]
#[command(name = "zeropoint")]
#[command(author, version, about = "ZeroPoint Node - harmonic tables, archetypes and generated artifacts")]
#[command(long_about = r#"
ZeroPoint Node reduces digit pairs to their harmonic (digital root, 0 counted
as 9), labels them with archetypes and gateways, and writes the results as
Markdown, JSON, CSV and text artifacts.

Configuration is loaded from (in priority order):
1. ZEROPOINT_* environment variables
2. --config <path>     Explicit config file
3. ./zeropoint.toml    Project-level config

Example:
  zeropoint harmonic 4 5
  zeropoint matrix --rows 1-9 --cols 1-9 --format md
  zeropoint generate --out dist
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    no_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reduce a pair of integers to a single digit in 1-9
    #[command(allow_negative_numbers = true)]
    Harmonic { a: i64, b: i64 },

    /// Show one archetype, or the whole table
    #[command(allow_negative_numbers = true)]
    Archetype { digit: Option<i64> },

    /// List the gateways a pair opens
    #[command(allow_negative_numbers = true)]
    Classify { a: i64, b: i64 },

    /// Render the harmonic matrix
    Matrix {
        /// Row range, e.g. 0..9 or 1-9 (inclusive)
        #[arg(long, value_name = "RANGE")]
        rows: Option<DigitRange>,

        /// Column range
        #[arg(long, value_name = "RANGE")]
        cols: Option<DigitRange>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the doubling circuit and the axis
    Vortex,

    /// Print the universe document
    Universe {
        /// JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Write every artifact and a manifest
    Generate {
        /// Output directory (overrides config)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Check artifacts against their manifest
    Verify {
        /// Directory holding manifest.json (defaults to the configured output)
        dir: Option<PathBuf>,
    },

    /// Print the interaction fixture session as JSON
    #[command(allow_negative_numbers = true)]
    Fixtures {
        /// Consciousness level (overrides config)
        #[arg(long)]
        consciousness: Option<i64>,
    },

    /// Browse the matrix interactively
    #[cfg(feature = "tui")]
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    // Only subcommands that read the config load it
    let load = || load_config(cli.no_config, cli.config.as_deref());

    match cli.command {
        Some(Command::Harmonic { a, b }) => run_harmonic(a, b),
        Some(Command::Archetype { digit }) => run_archetype(digit),
        Some(Command::Classify { a, b }) => run_classify(a, b),
        Some(Command::Matrix { rows, cols, format }) => {
            let config = load()?;
            let matrix = build_matrix(
                rows.unwrap_or(config.rows),
                cols.unwrap_or(config.cols),
            );
            print!("{}", render(&matrix, format)?);
            Ok(())
        }
        Some(Command::Vortex) => run_vortex(),
        Some(Command::Universe { json }) => run_universe(&load()?, json),
        Some(Command::Generate { out }) => run_generate(load()?, out),
        Some(Command::Verify { dir }) => {
            let dir = match dir {
                Some(dir) => dir,
                None => load()?.output_dir,
            };
            run_verify(dir)
        }
        Some(Command::Fixtures { consciousness }) => {
            let consciousness = match consciousness {
                Some(level) => level,
                None => load()?.consciousness,
            };
            println!("{}", vortex_session(consciousness).to_json()?);
            Ok(())
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui) => run_ui_mode(&load()?),
        None => run_overview(&load()?),
    }
}

fn load_config(no_config: bool, path: Option<&Path>) -> Result<GeneratorConfig> {
    let config = if no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(path)?
    };
    info!(output_dir = %config.output_dir.display(), "Configuration loaded");
    Ok(config)
}

fn build_matrix(rows: DigitRange, cols: DigitRange) -> HarmonicMatrix {
    HarmonicMatrix::build(rows, cols, &GatewayClassifier::new())
}

fn run_harmonic(a: i64, b: i64) -> Result<()> {
    let result = harmonic(a, b);
    println!(
        "{} + {} → {} ({})",
        a,
        b,
        result,
        zeropoint_node::archetype_name(result as i64)
    );
    Ok(())
}

/// "3 · Resonance: Creation, harmony, trinity"; outside 0-9 the digit stands in for both
fn archetype_line(digit: i64) -> String {
    let label = describe(digit);
    format!("{} · {}: {}", label.digit, label.name, label.meaning)
}

fn run_archetype(digit: Option<i64>) -> Result<()> {
    match digit {
        Some(d) => println!("{}", archetype_line(d)),
        None => {
            for a in archetypes() {
                println!("{} · {:<12} {}", a.digit, a.name, a.meaning);
            }
        }
    }
    Ok(())
}

fn run_classify(a: i64, b: i64) -> Result<()> {
    let gateways = GatewayClassifier::new().classify(a, b);

    println!("{} + {} → {}", a, b, harmonic(a, b));
    if gateways.is_empty() {
        println!("  (no gateways)");
    }
    for gate in gateways {
        println!("  • {:<16} {}", gate.label(), gate.description());
    }
    Ok(())
}

fn run_vortex() -> Result<()> {
    let vortex = VortexSummary::compute();

    println!("🌀 Vortex circuit");
    for step in &vortex.steps {
        println!("  {} × 2 = {:<2} → {}", step.from, step.doubled, step.reduced);
    }
    println!("\n⚖️  Axis {:?} (doubling cycle {:?})", vortex.axis, vortex.axis_cycle);
    Ok(())
}

fn run_universe(config: &GeneratorConfig, json: bool) -> Result<()> {
    let matrix = build_matrix(config.rows, config.cols);
    let universe = Universe::generate(&matrix);

    if json {
        println!("{}", universe.to_json()?);
    } else {
        print!("{}", universe.to_markdown()?);
    }
    Ok(())
}

fn run_generate(mut config: GeneratorConfig, out: Option<PathBuf>) -> Result<()> {
    if let Some(out) = out {
        config.output_dir = out;
    }

    println!("📦 Generating artifacts into {}", config.output_dir.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let manifest = generate(&config)?;

    for artifact in &manifest.artifacts {
        println!("  ✓ {:<32} {:>7} bytes  {}", artifact.path, artifact.bytes, &artifact.sha256[..12]);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", manifest.summary());

    Ok(())
}

fn run_verify(dir: PathBuf) -> Result<()> {
    let mismatched = verify(&dir)?;

    if mismatched.is_empty() {
        println!("✅ All artifacts in {} match their manifest", dir.display());
        return Ok(());
    }

    for path in &mismatched {
        eprintln!("❌ {}", path);
    }
    bail!("{} artifact(s) changed or missing", mismatched.len())
}

fn run_overview(config: &GeneratorConfig) -> Result<()> {
    let matrix = build_matrix(config.rows, config.cols);

    println!("🔢 ZeroPoint Node v{}", zeropoint_node::VERSION);
    println!("{}\n", matrix.summary());
    print!("{}", render_grid(&matrix));
    println!("\nRun `zeropoint --help` for commands.");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &GeneratorConfig) -> Result<()> {
    let matrix = build_matrix(config.rows, config.cols);

    let mut app = ui::App::new(matrix);
    ui::run_ui(&mut app)?;

    Ok(())
}
