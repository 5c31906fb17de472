use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use station_rotation::allocation::allocate;
use station_rotation::config::{Settings, SettingsOverrides};
use station_rotation::display::{print_assignments, write_assignments_to_file};
use station_rotation::error::AllocationError;
use station_rotation::export::export_records_to_csv;
use station_rotation::parser::load_participants;
use station_rotation::popularity::{candidate_pool, rank_stations};
use station_rotation::web;

#[derive(Parser, Debug)]
#[command(name = "station-rotation")]
#[command(about = "Assigns participants to rotating activity stations by preference")]
#[command(version)]
struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true, env = "ROTATION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate a preference export and print the schedule
    Allocate {
        /// CSV export of the preference form
        csv: PathBuf,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Also write the schedule as text
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the records as CSV
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },
    /// Serve the allocation API
    Web {
        #[arg(short, long, default_value = "8080", env = "ROTATION_PORT")]
        port: u16,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Args, Debug)]
struct OverrideArgs {
    /// Number of most popular stations to use
    #[arg(short, long, env = "ROTATION_STATIONS")]
    stations: Option<usize>,

    /// Seats per station per block
    #[arg(short = 'k', long, env = "ROTATION_CAPACITY")]
    capacity: Option<usize>,

    #[arg(short, long, env = "ROTATION_BLOCKS")]
    blocks: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long, env = "ROTATION_SEED")]
    seed: Option<u64>,
}

impl From<&OverrideArgs> for SettingsOverrides {
    fn from(args: &OverrideArgs) -> Self {
        SettingsOverrides {
            station_count: args.stations,
            capacity: args.capacity,
            blocks: args.blocks,
            seed: args.seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "station_rotation=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let base = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Web { port, overrides } => {
            let settings = base.with_overrides(&(&overrides).into());
            settings.validate()?;

            info!("Starting web server on port {}...", port);
            info!("Access the API at http://localhost:{}/api/assignments", port);
            web::start_server(port, settings).await?;
        }
        Command::Allocate { csv, overrides, output, csv_out } => {
            let settings = base.with_overrides(&(&overrides).into());
            settings.validate()?;

            let participants = load_participants(&csv)?;
            if participants.is_empty() {
                return Err(AllocationError::NoParticipants.into());
            }

            let ranked = rank_stations(&participants);
            let pool = candidate_pool(&ranked, settings.station_count)?;
            info!("Candidate stations: {}", pool.join(", "));

            let mut rng = settings.rng();
            let outcome = allocate(&participants, &pool, settings.capacity, settings.blocks, &mut rng)?;

            print_assignments(&outcome);

            if let Some(path) = output {
                write_assignments_to_file(&outcome, &path.to_string_lossy())?;
                println!("Schedule saved to {}", path.display());
            }
            if let Some(path) = csv_out {
                export_records_to_csv(&outcome.records, &path)?;
                println!("Records saved to {}", path.display());
            }
        }
    }

    Ok(())
}
