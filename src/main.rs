mod cli;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let db_path = cli.db.clone().unwrap_or_else(command::default_db_path);

    let outcome = match &cli.command {
        Commands::Load { dir, concurrency } => command::load(&db_path, dir, *concurrency).await,
        Commands::Stats {} => command::stats(&db_path),
        Commands::Series { from, to } => command::series(&db_path, *from, *to),
        Commands::List { from, to } => command::list(&db_path, *from, *to),
        Commands::Query { sql } => command::query(&db_path, sql),
        Commands::Export { file } => command::export(&db_path, file),
        Commands::Clear {} => command::clear(&db_path),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
