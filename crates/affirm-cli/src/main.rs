use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "affirm")]
#[command(about = "Affirm CLI - local-first profile store with deferred remote sync", long_about = None)]
struct Cli {
    /// Use this directory for config and data instead of the platform defaults
    #[arg(long, global = true, env = "AFFIRM_HOME")]
    base_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to a daily rolling file in the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the stored profile, creating one if none exists
    Init,
    /// Print the current profile as JSON
    Show,
    /// Change the display name
    SetName { name: String },
    /// Change the email address, or clear it when omitted
    SetEmail { email: Option<String> },
    /// Add a manifestation goal
    AddGoal {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Target date as YYYY-MM-DD
        #[arg(long)]
        target_date: Option<NaiveDate>,
    },
    /// Mark a goal achieved
    AchieveGoal { goal_id: String },
    /// Add to the usage counters
    Record {
        #[arg(long, default_value_t = 0)]
        sessions: u32,
        #[arg(long, default_value_t = 0)]
        streak_days: u32,
        #[arg(long, default_value_t = 0)]
        journal_entries: u32,
        #[arg(long, default_value_t = 0)]
        minutes: u32,
    },
    /// Enable premium
    Upgrade,
    /// List failed syncs waiting for replay
    Queue,
    /// Retry every failed sync now
    Replay,
    /// Delete the local profile and any pending syncs
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = affirm_infrastructure::AffirmPaths::new(cli.base_dir.as_deref());
    let _log_guard = logging::init(&paths, cli.verbose, cli.log_file)?;

    let services = commands::open(&paths)?;

    let result = match cli.command {
        Commands::Init => commands::profile::init(&services).await,
        Commands::Show => commands::profile::show(&services).await,
        Commands::SetName { name } => commands::profile::set_name(&services, name).await,
        Commands::SetEmail { email } => commands::profile::set_email(&services, email).await,
        Commands::AddGoal {
            title,
            description,
            category,
            target_date,
        } => {
            commands::profile::add_goal(&services, title, description, category, target_date).await
        }
        Commands::AchieveGoal { goal_id } => {
            commands::profile::achieve_goal(&services, &goal_id).await
        }
        Commands::Record {
            sessions,
            streak_days,
            journal_entries,
            minutes,
        } => {
            commands::profile::record(&services, sessions, streak_days, journal_entries, minutes)
                .await
        }
        Commands::Upgrade => commands::profile::upgrade(&services).await,
        Commands::Queue => commands::sync::queue(&services).await,
        Commands::Replay => commands::sync::replay(&services).await,
        Commands::Reset => commands::profile::reset(&services).await,
    };

    // Let scheduled pushes reach the remote (or the retry queue) before exit
    services.shutdown().await;

    result
}
