//! fio-enricher CLI entry point.

use clap::Parser;

use fio_enricher::cli::{handle_error, Cli, Commands};
use fio_enricher::infrastructure::config::ConfigLoader;
use fio_enricher::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::from)
        .and_then(|log_config| LoggerImpl::init(&log_config))
    {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Serve => fio_enricher::cli::commands::serve::execute(config).await,
        Commands::Publish(args) => fio_enricher::cli::commands::publish::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
