//! Command-line interface for codescribe.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::{AnalysisResult, Engine, ScanConfig};
use crate::input::validate_code_input;
use crate::report::{self, AnalysisType};
use crate::settings::Settings;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Path argument that means "read standard input".
const STDIN_PATH: &str = "-";

/// Default settings file name written by `init`.
const DEFAULT_SETTINGS_NAME: &str = "codescribe.yaml";

/// Multi-language source analysis: structure, risk patterns, quality score
/// and inline commentary.
#[derive(Parser)]
#[command(name = "codescribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file, a directory, or stdin
    Analyze(AnalyzeArgs),
    /// Print a commented copy of a file or stdin
    Comment(CommentArgs),
    /// Write a settings file with every default filled in
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File or directory to analyze, or "-" for stdin
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Result subset: basic, full, security, or performance
    #[arg(short = 't', long = "type", default_value = "full")]
    pub analysis_type: String,

    /// Path to settings YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the security scan
    #[arg(long)]
    pub no_security: bool,

    /// Skip the performance scan
    #[arg(long)]
    pub no_performance: bool,

    /// Minimum acceptable quality score (exit non-zero if any input scores lower)
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Arguments for the comment command.
#[derive(Parser)]
pub struct CommentArgs {
    /// File to comment, or "-" for stdin
    pub path: PathBuf,

    /// Path to settings YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_SETTINGS_NAME)]
    pub output: PathBuf,
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

fn read_stdin() -> anyhow::Result<String> {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

/// Collect files to analyze under a directory.
fn collect_files(root: &Path, settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories
            if e.file_type().is_dir() && e.depth() > 0 && name.starts_with('.') {
                return false;
            }
            // Skip dependency and build output directories
            !(e.file_type().is_dir()
                && (name == "vendor"
                    || name == "node_modules"
                    || name == "target"
                    || name == "__pycache__"))
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if settings.is_extension_allowed(ext) {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Read every input named by `path` as (label, source) pairs.
///
/// Directory entries that are not valid UTF-8 are skipped with a warning.
fn read_inputs(path: &Path, settings: &Settings) -> anyhow::Result<Vec<(String, String)>> {
    if is_stdin(path) {
        return Ok(vec![("<stdin>".to_string(), read_stdin()?)]);
    }

    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        let source = std::fs::read_to_string(path)?;
        return Ok(vec![(path.to_string_lossy().to_string(), source)]);
    }

    let mut inputs = Vec::new();
    for file in collect_files(path, settings)? {
        match std::fs::read_to_string(&file) {
            Ok(source) => inputs.push((file.to_string_lossy().to_string(), source)),
            Err(e) => tracing::warn!(path = %file.display(), error = %e, "skipping unreadable file"),
        }
    }
    Ok(inputs)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let analysis_type = match AnalysisType::parse(&args.analysis_type) {
        Some(t) => t,
        None => {
            eprintln!(
                "Error: invalid type {:?}, must be 'basic', 'full', 'security', or 'performance'",
                args.analysis_type
            );
            return Ok(EXIT_ERROR);
        }
    };

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let inputs = match read_inputs(&args.path, &settings) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("Error: cannot read {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Gate inputs before they reach the engine
    let mut rejected = 0;
    let mut accepted = Vec::new();
    for (label, source) in inputs {
        match validate_code_input(&source, settings.max_code_length) {
            Ok(()) => accepted.push((label, source)),
            Err(e) => {
                eprintln!("Skipping {}: {}", label, e);
                rejected += 1;
            }
        }
    }

    if accepted.is_empty() {
        eprintln!("Warning: no files to analyze");
        return Ok(if rejected > 0 { EXIT_FAILED } else { EXIT_SUCCESS });
    }

    let mut config = ScanConfig::from(&settings);
    config.security_enabled &= !args.no_security;
    config.performance_enabled &= !args.no_performance;

    let engine = Engine::new(settings);
    let sources: Vec<&str> = accepted.iter().map(|(_, s)| s.as_str()).collect();
    let results = engine.analyze_batch(&sources, &config);

    let entries: Vec<(String, AnalysisResult)> = accepted
        .into_iter()
        .map(|(label, _)| label)
        .zip(results)
        .collect();

    match args.format.as_str() {
        "json" => report::write_json(&entries, analysis_type)?,
        _ => report::write_pretty(&entries, analysis_type),
    }

    let failed = rejected > 0
        || entries.iter().any(|(_, r)| {
            r.has_high_severity() || args.min_score.is_some_and(|min| r.quality_score() < min)
        });

    if failed {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the comment command.
pub fn run_comment(args: &CommentArgs) -> anyhow::Result<i32> {
    let settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let source = if is_stdin(&args.path) {
        read_stdin()?
    } else {
        match std::fs::read_to_string(&args.path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: cannot read {:?}: {}", args.path, e);
                return Ok(EXIT_ERROR);
            }
        }
    };

    if let Err(e) = validate_code_input(&source, settings.max_code_length) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_FAILED);
    }

    let engine = Engine::new(settings);
    println!("{}", engine.synthesize_comments_only(&source));
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let content = serde_yaml::to_string(&Settings::default())?;
    if let Err(e) = std::fs::write(&args.output, content) {
        eprintln!("Error: failed to write settings: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} (API keys can also come from OPENAI_API_KEY)", args.output.display());
    println!("  2. Run: codescribe analyze . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
