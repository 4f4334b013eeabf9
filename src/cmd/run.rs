use crate::reports;
use clap::{ArgMatches, Args};
use tauforge::analysis::{Analysis, GroupTotals};
use tauforge::config::AnalysisConfig;
use tauforge::consts::{AXIS_TITLE_X, AXIS_TITLE_Y};
use tauforge::error::{TauForgeError, TfResult};
use tauforge::event::JsonDirSource;
use tauforge::plot::PlotDocument;
use tauforge::sample::load_metadata;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: AnalysisConfig,

    /// JSON file with analysis settings; explicit flags take precedence
    #[arg(long)]
    pub config_file: Option<String>,

    /// Output path of the plot document
    #[arg(short, long, default_value = "plot.json")]
    pub output: String,
}

fn resolve_config(args: &RunArgs, matches: &ArgMatches) -> TfResult<AnalysisConfig> {
    match &args.config_file {
        Some(path) => {
            info!("⚙️  Loading config from: {}", path);
            let mut config = AnalysisConfig::load_from_file(path)?;
            config.merge_from_cli(&args.config, matches);
            Ok(config)
        }
        None => Ok(args.config.clone()),
    }
}

fn init_thread_pool(threads: usize) -> TfResult<()> {
    if threads == 0 {
        return Ok(());
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| TauForgeError::Config(format!("cannot build thread pool: {}", e)))
}

pub fn run(args: &RunArgs, matches: &ArgMatches, metadata: &str, samples_dir: &str) -> TfResult<()> {
    let config = resolve_config(args, matches)?;
    let analysis = Analysis::new(config)?;
    let cfg = analysis.config();

    init_thread_pool(cfg.run.threads)?;
    info!(
        "🧮 Mode: {}, L = {} pb^-1, ΔR > {}",
        cfg.run.mode, cfg.normalization.luminosity, cfg.pairing.min_delta_r
    );

    info!("📂 Loading metadata: {}", metadata);
    let samples = load_metadata(metadata, &cfg.normalization.data_pattern)?;

    let source = JsonDirSource::new(samples_dir);
    let results = analysis.run(&samples, &source)?;

    // Every per-sample histogram is final here.
    let totals = GroupTotals::from_results(&results)?;

    reports::print_cutflow_report(&results);
    reports::print_comparison_report(&totals);

    match PlotDocument::from_totals(&totals, AXIS_TITLE_X, AXIS_TITLE_Y) {
        Ok(doc) => doc.save_to_file(&args.output)?,
        Err(e) => warn!("⚠️  Plot skipped: {}", e),
    }

    Ok(())
}
