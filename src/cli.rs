// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .short('p')
        .required(true)
        .help("Bank statement CSV (comma or semicolon delimited)")
}

fn delimiter_arg() -> Arg {
    Arg::new("delimiter")
        .long("delimiter")
        .short('d')
        .help("Field delimiter: ',' or ';' (detected from the header when omitted)")
}

fn jobs_arg() -> Arg {
    Arg::new("jobs")
        .long("jobs")
        .short('j')
        .value_parser(value_parser!(usize))
        .help("Concurrent classifier calls (default from config)")
}

fn offline_arg() -> Arg {
    Arg::new("offline")
        .long("offline")
        .action(ArgAction::SetTrue)
        .help("Do not call the model; unmatched transactions get the default classification")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print JSON lines"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("bookkeeper")
        .version(crate_version!())
        .about("Classify bank transactions and build a general ledger and trial balance")
        .arg(
            Arg::new("config_file")
                .long("config")
                .global(true)
                .help("Config file (default: platform config dir)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More logging on stderr (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("import")
                .about("Normalize a bank statement and show the cleaned transactions")
                .arg(path_arg())
                .arg(delimiter_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Also write the canonical date;description;amount CSV here"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("books")
                .about("Classify a statement and print the ledger and trial balance")
                .arg(path_arg())
                .arg(delimiter_arg())
                .arg(jobs_arg())
                .arg(offline_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("export")
                .about("Classify a statement and write the three tables to files")
                .arg(path_arg())
                .arg(delimiter_arg())
                .arg(jobs_arg())
                .arg(offline_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .required(true)
                        .help("Output directory"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the config file")
                .subcommand(Command::new("init").about("Write a default config file"))
                .subcommand(Command::new("show").about("Print the effective config"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}
