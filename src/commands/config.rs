// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, config_path, save_config};
use anyhow::Result;
use std::path::PathBuf;

pub fn handle(cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    let path = match m.get_one::<String>("config_file") {
        Some(p) => PathBuf::from(p.trim()),
        None => config_path()?,
    };
    match m.subcommand() {
        Some(("init", _)) => {
            if path.exists() {
                println!("Config already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Wrote default config to {}", path.display());
            }
        }
        Some(("show", _)) => print!("{}", toml::to_string_pretty(cfg)?),
        Some(("path", _)) => println!("{}", path.display()),
        _ => {}
    }
    Ok(())
}
