mod cli;
mod commands;
mod logging;

use clap::Parser;
use hizuke_core::config::load_config;
use hizuke_date::SystemClock;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter_handle = logging::init(cli.verbose);

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    logging::apply_configured_level(&filter_handle, cli.verbose, &config.logging.level);

    let clock = SystemClock::from_settings(&config)?;

    let mut stdout = std::io::stdout().lock();
    commands::run(&cli.command, &clock, &mut stdout)
}
