//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "habit-tracker", version, about = "Track habits against the trackhabits service")]
pub struct Cli {
    /// Directory for the database, config and logs
    #[arg(long, global = true, env = "HABIT_TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the tracker API
    #[arg(long, global = true, env = "HABIT_TRACKER_API_URL")]
    pub api_url: Option<String>,

    /// Use the built-in demo service instead of the network
    #[arg(long, global = true, env = "HABIT_TRACKER_MOCK")]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and remember the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    #[command(subcommand)]
    Habits(HabitsCommand),
    #[command(subcommand)]
    Progress(ProgressCommand),
    /// Habits still to do in the current period
    Reminders,
    #[command(subcommand)]
    Time(TimeCommand),
    /// Server version
    Version,
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Recent log lines
    Logs {
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum HabitsCommand {
    /// Active habits with progress
    List {
        #[arg(long)]
        search: Option<String>,
        /// date-desc, date-asc, name-asc, name-desc, progress-desc, streak-desc
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Finished habits
    Completed,
    Create {
        description: String,
        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        frequency: String,
        #[arg(long, default_value_t = 1)]
        times: u32,
        #[arg(long, default_value_t = 30)]
        periods: u32,
    },
    Update {
        id: i64,
        description: String,
        #[arg(long, default_value = "daily")]
        frequency: String,
        #[arg(long, default_value_t = 1)]
        times: u32,
        #[arg(long, default_value_t = 30)]
        periods: u32,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProgressCommand {
    Show { id: i64 },
    /// Log one completion
    Add { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Current server date
    Now,
    /// Advance the simulated clock by one day
    NextDay,
    /// Reset the simulated clock to today
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Effective configuration
    Show,
}
