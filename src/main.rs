use clap::Parser;
use rag_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::load_config()?;

    match cli.command {
        Command::Serve => cli::serve::run(config).await,
        Command::Ask { question } => cli::ask::run(config, &question.join(" ")).await,
        Command::Seed { file } => cli::seed::run(config, &file).await,
    }
}
