mod assembler;
mod cli;
mod display;
mod error;
mod models;
mod scrape;
mod testrun;
mod workspace;

use clap::Parser;
use log::LevelFilter;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    cli::run(cli);
}
