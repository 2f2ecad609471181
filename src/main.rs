//! taric-official CLI entry point.

use clap::Parser;

use taric_official::cli::commands::{init, load_config, lookup, review};
use taric_official::cli::{handle_error, Cli, Commands};
use taric_official::infrastructure::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => init::execute(args, &config, cli.json).await,
        Commands::Lookup(args) => lookup::execute(args, &config, cli.json).await,
        Commands::Review(args) => review::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
