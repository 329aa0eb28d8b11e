// Command-line entry point for Aspect Names.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use aspect_names::application::ScanUsecase;
use aspect_names::infrastructure::concurrency::init_thread_pool;
use aspect_names::infrastructure::config::ScanConfig;
use aspect_names::infrastructure::project_loader::ProjectLoader;
use aspect_names::infrastructure::{DefaultUnitScanner, JsonExporter, TextExporter};
use aspect_names::ports::ReportExporter;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input header file path (can specify multiple)
    #[arg(short, long)]
    input: Vec<String>,

    /// Input folder(s), searched recursively for headers
    #[arg(short = 'd', long)]
    folder: Vec<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Exit with status 1 when any aspect enum is invalid
    #[arg(long)]
    strict: bool,

    /// Worker threads
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if cli.strict {
        config.strict = true;
    }
    if cli.jobs.is_some() {
        config.jobs = cli.jobs;
    }

    let loader = ProjectLoader::new(&config.extensions);
    let mut units = loader.load_files(&cli.input)?;
    for folder in &cli.folder {
        units.extend(loader.load_folder(folder)?);
    }
    if units.is_empty() {
        bail!("Please provide at least one --input <file> or --folder <dir> containing headers");
    }

    if let Err(e) = init_thread_pool(config.jobs) {
        log::warn!("Thread pool already initialized: {}", e);
    }

    let scanner = DefaultUnitScanner::new(config.policy.clone(), config.max_input_bytes);
    let exporter: &dyn ReportExporter = match cli.format {
        OutputFormat::Text => &TextExporter,
        OutputFormat::Json => &JsonExporter,
    };
    let usecase = ScanUsecase {
        scanner: &scanner,
        exporter,
    };
    let summary = usecase.run(&units, &cli.output)?;

    if summary.failed_units() > 0 {
        return Ok(ExitCode::from(2));
    }
    if config.strict && summary.invalid_records() > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}
