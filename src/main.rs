use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tauforge::error::{TauForgeError, TfResult};
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Sample table: sample,xsec,num_events[,kind]
    #[arg(global = true, short, long, default_value = "metadata.csv")]
    metadata: String,

    /// Directory holding one `<sample>.json` columnar file per sample
    #[arg(global = true, short, long, default_value = "samples")]
    samples: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select mu-tau events, reconstruct the visible mass and histogram it
    Run(cmd::run::RunArgs),
    /// Write toy samples and a matching metadata table
    Generate(cmd::generate::GenerateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing TauForge...");

    let result: TfResult<()> = match &cli.command {
        Commands::Run(args) => matches
            .subcommand_matches("run")
            .ok_or_else(|| TauForgeError::Config("no arguments parsed for 'run'".to_string()))
            .and_then(|sub_matches| {
                cmd::run::run(args, sub_matches, &cli.metadata, &cli.samples)
            }),
        Commands::Generate(args) => cmd::generate::run(args, &cli.metadata, &cli.samples),
    };

    if let Err(e) = result {
        error!("❌ FATAL: {}", e);
        process::exit(1);
    }
}
