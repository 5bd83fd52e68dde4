//! Command-line interface for magic_ball.

use clap::{Parser, Subcommand};
use magic_ball::OpponentKind;
use std::path::PathBuf;

/// Magic Ball - 5×5 card-and-pawn game server
#[derive(Parser, Debug)]
#[command(name = "magic_ball")]
#[command(about = "Magic Ball game server and simulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the server configuration file
        #[arg(short, long, default_value = "magic_ball.toml")]
        config: PathBuf,

        /// Host to bind to (overrides config and MAGIC_BALL_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and MAGIC_BALL_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play automated games and print a summary
    Simulate {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Policy for white
        #[arg(long, default_value = "heuristic")]
        white: OpponentKind,

        /// Policy for black
        #[arg(long, default_value = "random")]
        black: OpponentKind,

        /// Master seed (from config, else 0)
        #[arg(long)]
        seed: Option<u64>,

        /// Cards per hand (overrides config)
        #[arg(long)]
        cards_per_hand: Option<usize>,

        /// Path to the configuration file providing card pool and weights
        #[arg(short, long, default_value = "magic_ball.toml")]
        config: PathBuf,
    },
}
