//! Command-line interface for strictly_rooms.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Rooms - authoritative tic-tac-toe room server
#[derive(Parser, Debug)]
#[command(name = "strictly_rooms")]
#[command(about = "Multiplayer tic-tac-toe rooms over HTTP and WebSocket", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the room server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config and environment)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and environment)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
