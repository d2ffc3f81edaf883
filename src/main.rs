use clap::Parser;
use graphql_batcher::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(args) => cli::fetch::run(args).await,
    }
}
