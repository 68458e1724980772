//! CLI module for the NeuralGCM Weather API gateway
//!
//! - `serve`: run the HTTP server

pub mod serve;

use clap::{Parser, Subcommand};

/// NeuralGCM Weather API - authenticated, rate-limited weather forecasts
#[derive(Parser)]
#[command(name = "ngcm-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),
}
