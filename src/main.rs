// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use bookkeeper::{cli, commands};

const LOG_ENV: &str = "BOOKKEEPER_LOG";

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    // Global flags may sit on either side of the subcommand.
    let leaf = matches.subcommand().map(|(_, sub)| sub).unwrap_or(&matches);
    init_logging(matches.get_count("verbose").max(leaf.get_count("verbose")));
    commands::run(&matches)
}
