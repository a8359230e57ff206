//! CLI command implementations

pub mod completions;
pub mod config;
pub mod node;
pub mod relationship;

use crate::Cli;

/// Print a command result unless `--quiet` was given
fn print_result(cli: &Cli, text: &str) {
    if !cli.quiet {
        println!("{}", text);
    }
}
