//! codescribe CLI entry point.

use clap::Parser;
use codescribe::cli::{self, Cli, Commands, EXIT_ERROR};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "CODESCRIBE_LOG";

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("codescribe=debug")
    } else if std::env::var(LOG_ENV).is_ok() {
        EnvFilter::from_env(LOG_ENV)
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Analyze(args) => cli::run_analyze(args),
        Commands::Comment(args) => cli::run_comment(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
