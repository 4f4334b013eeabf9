use clap::Args;
use std::fs::{self, File};
use tauforge::error::{TauForgeError, TfResult};
use tauforge::event::{ColumnarFile, JsonDirSource};
use tauforge::sample::write_metadata;
use tauforge::toy::{default_recipes, ToyGenerator};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Events written per sample
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub events: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(args: &GenerateArgs, metadata: &str, samples_dir: &str) -> TfResult<()> {
    // Simulated samples with zero generated events cannot be normalized.
    if args.events == 0 {
        return Err(TauForgeError::Config(
            "--events must be at least 1".to_string(),
        ));
    }

    fs::create_dir_all(samples_dir)?;
    let source = JsonDirSource::new(samples_dir);
    let mut generator = ToyGenerator::new(args.seed);

    let recipes = default_recipes(args.events);
    for recipe in &recipes {
        let events = generator.events(recipe);
        let path = source.sample_path(&recipe.name);
        ColumnarFile::from_events(&events).save_to_file(&path)?;
        info!("📝 {} events -> {:?}", events.len(), path);
    }

    let samples: Vec<_> = recipes.iter().map(|r| r.sample()).collect();
    write_metadata(File::create(metadata)?, &samples)?;
    info!("📝 Metadata -> {}", metadata);

    Ok(())
}
