use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use embryogen::config::Config;
use embryogen::service::EmbryoService;

/// Embryogen - synthetic embryo genetics and developmental training
#[derive(Parser, Debug)]
#[command(name = "embryogen", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Conceive a new embryo, randomly or from two parents
    Conceive {
        /// First parent embryo id
        #[arg(long, requires = "parent2")]
        parent1: Option<String>,

        /// Second parent embryo id
        #[arg(long, requires = "parent1")]
        parent2: Option<String>,
    },
    /// Evaluate an embryo's readiness for every training program
    Evaluate {
        /// Embryo id
        embryo_id: String,
    },
    /// Build a personalized curriculum for an embryo
    Curriculum {
        /// Embryo id
        embryo_id: String,
    },
    /// Run an embryo through a training program
    Train {
        /// Embryo id
        embryo_id: String,

        /// Training program name
        program: String,
    },
    /// List every training program in the catalog
    Programs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut service = EmbryoService::new(&config)?;

    match args.command {
        Command::Conceive { parent1, parent2 } => {
            let outcome = service.conceive(parent1.as_deref(), parent2.as_deref())?;
            if outcome.fell_back {
                warn!(embryo_id = %outcome.embryo_id, "genetics fell back to random");
            }
            info!(embryo_id = %outcome.embryo_id, "embryo conceived");
            println!("{}", serde_json::to_string_pretty(&outcome.record)?);
        }
        Command::Evaluate { embryo_id } => {
            let evaluation = service.evaluate(&embryo_id)?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        Command::Curriculum { embryo_id } => {
            let curriculum = service.curriculum(&embryo_id)?;
            println!("{}", serde_json::to_string_pretty(&curriculum)?);
        }
        Command::Train { embryo_id, program } => {
            let record = service.train(&embryo_id, &program)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Programs => {
            println!(
                "{}",
                serde_json::to_string_pretty(service.catalog().programs())?
            );
        }
    }

    Ok(())
}
