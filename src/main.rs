//! awkbench - compare AWK implementations on identical workloads

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};

use awkbench::bench::{BenchmarkRunner, ProcessExecutor, ProgramCatalog, Registry, Session};
use awkbench::config::{BenchConfig, ReportFormat};
use awkbench::dataset::{DatasetGenerator, DatasetKind, Datasets, SizePreset};
use awkbench::report::{write_all, write_summary};
use awkbench::telemetry::init_tracing;
use awkbench::util::units::format_bytes;
use awkbench::{AwkBenchError, Result};

#[derive(Parser)]
#[command(name = "awkbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Benchmark AWK implementations against each other", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/awkbench/awkbench.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset directory
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory containing *.awk programs
    #[arg(long)]
    programs: Option<PathBuf>,

    /// Report output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dataset size: 1MB, 10MB, 100MB or 500MB
    #[arg(long)]
    size: Option<SizePreset>,

    /// Measured runs per benchmark
    #[arg(short, long)]
    runs: Option<usize>,

    /// Discarded warmup runs per benchmark
    #[arg(short, long)]
    warmup: Option<usize>,

    /// Per-run timeout, e.g. 30s or 5m
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Comma-separated candidate names to benchmark
    #[arg(long, value_delimiter = ',')]
    awk: Vec<String>,

    /// Comma-separated report formats: markdown, json, csv
    #[arg(long, value_delimiter = ',')]
    format: Vec<ReportFormat>,

    /// Only generate datasets, then exit
    #[arg(long)]
    generate: bool,

    /// Dataset generator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = apply_overrides(BenchConfig::load(cli.config.as_deref())?, &cli);
    config.validate()?;

    if cli.generate {
        let datasets = generate(&config)?;
        println!("Generated datasets in {}:", config.data_dir.display());
        for (kind, path) in datasets.iter() {
            println!(
                "  {:<9} {} ({})",
                kind.name(),
                path.display(),
                format_bytes(datasets.input_size(kind)?)
            );
        }
        return Ok(());
    }

    let datasets = match Datasets::existing(&config.data_dir, config.size, config.seed) {
        Some(datasets) => datasets,
        None => {
            info!(
                dir = %config.data_dir.display(),
                size = %config.size,
                "datasets missing, stale or from another seed, generating"
            );
            generate(&config)?
        }
    };

    let catalog = ProgramCatalog::discover(&config.program_dir)?;

    let candidates = Registry::from_env().filter_available(&config.selected_candidates());
    if candidates.is_empty() {
        return Err(AwkBenchError::NoCandidates);
    }

    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    println!("AWK implementations: {}", names.join(", "));
    println!("Programs: {}", catalog.len());
    println!(
        "Runs: {} (+{} warmup), timeout {}",
        config.runs,
        config.warmup,
        humantime::format_duration(config.timeout)
    );
    println!();

    let runner = BenchmarkRunner::new(ProcessExecutor::new(), config.runner_settings());
    let session = Session::new(runner).with_progress(std::io::stderr().is_terminal());
    let report = session.run(&candidates, &catalog, &datasets).await?;

    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, &report.ranking)?;
    drop(stdout);

    for failure in &report.failures {
        println!("FAILED {} on {}: {}", failure.awk, failure.program, failure.reason);
    }

    for path in write_all(&config.output_dir, &report, &config.formats)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn apply_overrides(mut config: BenchConfig, cli: &Cli) -> BenchConfig {
    if let Some(dir) = &cli.data {
        config = config.with_data_dir(dir.clone());
    }
    if let Some(dir) = &cli.programs {
        config = config.with_program_dir(dir.clone());
    }
    if let Some(dir) = &cli.output {
        config = config.with_output_dir(dir.clone());
    }
    if let Some(size) = cli.size {
        config = config.with_size(size);
    }
    if let Some(runs) = cli.runs {
        config = config.with_runs(runs);
    }
    if let Some(warmup) = cli.warmup {
        config = config.with_warmup(warmup);
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if !cli.awk.is_empty() {
        config = config.with_candidates(cli.awk.clone());
    }
    if !cli.format.is_empty() {
        config = config.with_formats(cli.format.clone());
    }
    config
}

fn generate(config: &BenchConfig) -> Result<Datasets> {
    info!(
        size = %config.size,
        seed = config.seed,
        kinds = DatasetKind::ALL.len(),
        "generating datasets"
    );
    DatasetGenerator::new(config.seed).generate_all(&config.data_dir, config.size)
}
