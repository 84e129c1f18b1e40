use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "clinica")]
#[command(about = "Drive clinic form wizards and inspect doctor schedules")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the backend URL and author id
    Configure {
        #[arg(long)]
        api_url: String,
        #[arg(long)]
        author_id: String,
    },
    /// Print the steps a draft resolves to
    Steps {
        #[arg(long)]
        form: String,
        /// JSON file holding the draft
        #[arg(long)]
        draft: PathBuf,
    },
    /// Validate a draft and print the error map
    Validate {
        #[arg(long)]
        form: String,
        #[arg(long)]
        draft: PathBuf,
        /// Only this step (defaults to every step that applies)
        #[arg(long)]
        step: Option<String>,
    },
    /// Walk the wizard to review and submit the draft
    Submit {
        #[arg(long)]
        form: String,
        #[arg(long)]
        draft: PathBuf,
        /// Update this record instead of creating one
        #[arg(long)]
        id: Option<String>,
    },
    /// Print a doctor's weekly grid and any booking conflicts
    Schedule {
        /// Schedule JSON file
        #[arg(long, conflicts_with = "doctor")]
        schedule: Option<PathBuf>,
        /// Appointments JSON file
        #[arg(long, requires = "schedule")]
        appointments: Option<PathBuf>,
        /// Fetch schedule and appointments from the backend instead
        #[arg(long)]
        doctor: Option<String>,
        /// First day of the week (YYYY-MM-DD)
        #[arg(long)]
        week: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Commands::Configure { api_url, author_id } => commands::configure(&api_url, &author_id),
        Commands::Steps { form, draft } => commands::steps(&form, &draft),
        Commands::Validate { form, draft, step } => commands::validate(&form, &draft, step.as_deref()),
        Commands::Submit { form, draft, id } => commands::submit(&form, &draft, id).await,
        Commands::Schedule {
            schedule,
            appointments,
            doctor,
            week,
        } => commands::schedule(schedule, appointments, doctor, &week).await,
    }
}
