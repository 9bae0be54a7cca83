use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Builder;
use log::{error, info};
use rand::SeedableRng;
use rand_pcg::Pcg64;

use dslab_faas_timeline::config::{AnalysisConfig, AnalysisKind};
use dslab_faas_timeline::error::Result;
use dslab_faas_timeline::extra::azure_trace::load_azure_trace;
use dslab_faas_timeline::extra::generator::{generate_specification, IatConfig};
use dslab_faas_timeline::output::CsvSink;
use dslab_faas_timeline::parallel::parallel_analysis;
use dslab_faas_timeline::trace::FunctionTrace;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Computes cold starts, CPU and memory usage of serverless functions from Azure Functions trace
struct Args {
    /// Path to directory with invocations.csv, durations.csv and memory.csv
    #[arg(short, long)]
    trace_path: PathBuf,

    /// Path to YAML file with analysis configuration, command line options take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to produced CSV file
    #[arg(short, long, default_value = "output.csv")]
    output_file: PathBuf,

    /// Analysis type: coldstart, cpu, memory or instance-coldstart
    #[arg(long = "type")]
    kind: Option<AnalysisKind>,

    /// Number of trace minutes to analyze
    #[arg(short, long)]
    duration: Option<usize>,

    /// Keepalive window in seconds
    #[arg(short, long)]
    keepalive: Option<f64>,

    /// Execution duration multiplier
    #[arg(short, long)]
    slowdown: Option<f64>,

    /// Dense timeline tick in nanoseconds
    #[arg(long)]
    granularity_ns: Option<u64>,

    /// Length of averaging intervals in seconds
    #[arg(long)]
    averaging_granularity: Option<f64>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Distribution of inter-arrival times: exponential, uniform or equidistant, optionally with _shift suffix
    #[arg(long, default_value = "exponential")]
    iat_distribution: IatConfig,

    /// Seed of the trace generator
    #[arg(long, default_value_t = 42)]
    rand_seed: u64,
}

impl Args {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_yaml(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(kind) = self.kind {
            config.kind = kind;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(keepalive) = self.keepalive {
            config.keepalive = keepalive;
        }
        if let Some(slowdown) = self.slowdown {
            config.slowdown = slowdown;
        }
        if let Some(granularity) = self.granularity_ns {
            config.granularity_ns = granularity;
        }
        if let Some(granularity) = self.averaging_granularity {
            config.averaging_granularity = granularity;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.analysis_config()?;
    let stats = load_azure_trace(&args.trace_path, config.duration)?;
    let mut rng = Pcg64::seed_from_u64(args.rand_seed);
    let functions: Vec<FunctionTrace> = stats
        .iter()
        .map(|f| generate_specification(f, args.iat_distribution, &mut rng))
        .collect();
    info!(
        "generated {} invocations of {} functions",
        functions.iter().map(|f| f.total_invocations()).sum::<usize>(),
        functions.len()
    );
    let sink = CsvSink::new(BufWriter::new(File::create(&args.output_file)?));
    let mut out = parallel_analysis(functions, &config, sink)?.into_inner()?;
    out.flush()?;
    info!("results saved to {}", args.output_file.display());
    Ok(())
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
