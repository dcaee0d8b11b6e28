//! Command-line interface for sudoku_challenge.

use clap::{Parser, Subcommand};

/// Sudoku Challenge - leaderboard backend
#[derive(Parser, Debug)]
#[command(name = "sudoku_challenge")]
#[command(about = "Leaderboard backend for Sudoku Challenge", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP leaderboard server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (overrides config and DATABASE_URL)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "sudoku_challenge.db")]
        db_path: String,
    },

    /// Print the current top-10 table
    Top {
        /// Path to the database file
        #[arg(long, default_value = "sudoku_challenge.db")]
        db_path: String,
    },
}
