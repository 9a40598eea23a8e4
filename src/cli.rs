use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tg-onboarding")]
#[command(author, version, about = "Onboarding wizard for a Telegram Mini App", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk through the onboarding wizard in the terminal
    Run {
        /// Image file used as the camera (JPEG or PNG)
        #[arg(short, long)]
        photo: PathBuf,

        /// Telegram WebApp init data (query string); falls back to TG_INIT_DATA
        #[arg(long)]
        init_data: Option<String>,

        /// Keep submissions in memory instead of calling the record service
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the onboarding questions from the questions table
    Questions {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the record service configuration from the environment
    CheckConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
