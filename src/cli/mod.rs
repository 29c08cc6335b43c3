//! CLI module for the ProCircle API
//!
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// ProCircle - minimal professional social network API
#[derive(Parser)]
#[command(name = "procircle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Manage PostgreSQL schema migrations
    Migrate(migrate::MigrateArgs),
}
