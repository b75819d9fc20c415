//! Command-line interface for reviewcheck.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::analysis::AnalysisEngine;
use crate::config::{self, EngineConfig};
use crate::report::{self, Format};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into when collecting units.
const SKIPPED_DIRS: &[&str] = &["venv", "__pycache__", "node_modules", "site-packages"];

/// Static review gate for generated Python code.
///
/// Parses each source unit, computes cyclomatic complexity, flags long
/// functions and deep nesting, and runs heuristic security checks.
#[derive(Parser)]
#[command(name = "reviewcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review Python files and report structure, smells and security findings
    #[command(visible_alias = "review")]
    Analyze(AnalyzeArgs),
    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to review (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Minimum acceptable quality score (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "reviewcheck.yaml")]
    pub output: PathBuf,
}

const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // A subscriber may already be installed (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<(EngineConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config::discover(Path::new(".")),
    };

    match path {
        Some(p) => {
            let cfg = EngineConfig::parse_file(&p)?;
            debug!(config = %p.display(), "loaded config");
            Ok((cfg, Some(p)))
        }
        None => Ok((EngineConfig::default(), None)),
    }
}

/// Collect source units under `root`, keyed by path relative to `root`.
///
/// A single file is keyed by its file name.
pub fn collect_units(root: &Path, config: &EngineConfig) -> anyhow::Result<BTreeMap<String, String>> {
    let mut units = BTreeMap::new();

    if root.is_file() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.to_string_lossy().to_string());
        units.insert(name, read_source(root)?);
        return Ok(units);
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(rel) {
            debug!(path = %rel.display(), "excluded by config");
            continue;
        }

        let name = rel.to_string_lossy().replace('\\', "/");
        units.insert(name, read_source(path)?);
    }

    Ok(units)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (mut cfg, config_path) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(threshold) = args.threshold {
        cfg.acceptance_threshold = Some(threshold);
    }
    if let Err(e) = config::validate(&cfg) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    if !args.path.exists() {
        eprintln!("Error: cannot access path {:?}", args.path);
        return Ok(EXIT_ERROR);
    }

    let units = collect_units(&args.path, &cfg)?;
    if units.is_empty() {
        warn!(path = %args.path.display(), "no Python files to review");
        eprintln!("Warning: no files to review");
        return Ok(EXIT_SUCCESS);
    }

    let engine = AnalysisEngine::from_config(&cfg);
    let review = engine.review(&units);

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    match format {
        Format::Json => report::write_json(&path_str, config_str.as_deref(), &review)?,
        Format::Pretty => report::write_pretty(&path_str, config_str.as_deref(), &review),
    }

    if review.summary.passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to adjust thresholds", args.output.display());
    println!("  2. Run: reviewcheck analyze . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
