use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured notifiers
    List,

    /// Send a test notification through a notifier
    Test {
        /// Notifier name
        #[arg(short, long)]
        name: String,
    },

    /// Enable a notifier
    Enable {
        /// Notifier name
        #[arg(short, long)]
        name: String,
    },

    /// Disable a notifier; a running heartbeat stops after its current interval
    Disable {
        /// Notifier name
        #[arg(short, long)]
        name: String,
    },

    /// Run heartbeat notifiers until interrupted
    Run,
}
