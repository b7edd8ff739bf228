#![warn(clippy::all, clippy::pedantic)]

use std::process::exit;

use clap::Parser;
use colored::Colorize;

use jrp::{cli::Cli, commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = commands::run(cli) {
        eprintln!("{}", format!("Error: {err:#}").red());
        exit(1);
    }
}
