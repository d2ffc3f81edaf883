//! CLI module for the GraphQL batcher
//!
//! - `fetch`: send a set of keyed queries as one batched request and print the
//!   resulting cache

pub mod fetch;

use clap::{Parser, Subcommand};

/// GraphQL batcher - Coalesce keyed queries into one combined request
#[derive(Parser)]
#[command(name = "graphql-batcher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch keyed queries through the batcher and print the cache
    Fetch(fetch::FetchArgs),
}
