mod app;
mod cli;
mod clipboard;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(config::default_data_dir);

    logging::initialize(cli.log, &data_dir, cli.verbose);

    let config = config::resolve(&cli, &data_dir)?;
    app::run(config, data_dir)
}
