use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use pandemonium::{compile, display_error, optimizer::optimizer::OptimizerConfig, OutputKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Pandemonium to JavaScript compiler
#[derive(Parser)]
#[command(name = "pandemonium")]
#[command(version = "0.1.0")]
#[command(about = "Compiles Pandemonium source to JavaScript", long_about = None)]
struct Cli {
    /// Path to the .pan file to compile
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Stage to print
    #[arg(long, value_enum, default_value = "js")]
    emit: OutputKind,

    /// Generate JavaScript from the unoptimized program
    #[arg(long)]
    no_optimize: bool,
}

fn init_tracing() {
    // Silent unless PANDEMONIUM_LOG is set.
    if let Ok(filter) = EnvFilter::try_from_env("PANDEMONIUM_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read {}: {}", cli.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let optimizer = if cli.no_optimize {
        OptimizerConfig::none()
    } else {
        OptimizerConfig::all()
    };

    let start = Instant::now();
    match compile(&source, Some(file_name), cli.emit, &optimizer) {
        Ok(output) => {
            debug!(elapsed = ?start.elapsed(), "compiled");
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error, &source);
            ExitCode::FAILURE
        }
    }
}
