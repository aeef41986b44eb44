mod cli;
mod commands;
mod config;
mod coverage;
mod error;
mod geometry;
mod loader;
mod model;
mod pipeline;
mod reconcile;
mod report;
mod theme;
mod transcript;

use clap::Parser;
use colored::Colorize;

fn init_logging(verbose: u8, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if verbose == 1 {
        builder.filter_level(log::LevelFilter::Debug);
    } else if verbose > 1 {
        builder.filter_level(log::LevelFilter::Trace);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    }
}
