//! `graphwire config`: inspect and edit the client configuration file

use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};
use graphwire_client::ClientConfig;

use crate::config::{self, config_file_path};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        #[arg(value_parser = PossibleValuesParser::new(ClientConfig::keys()))]
        key: String,
    },
    /// Change one setting and write the file
    Set {
        #[arg(value_parser = PossibleValuesParser::new(ClientConfig::keys()))]
        key: String,
        value: String,
    },
    /// Print every setting
    List,
    /// Print the config file location
    Path,
    /// Write a config file with the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    let path = config_file_path();

    match &args.command {
        ConfigCommands::Get { key } => {
            let current = config::load()?;
            println!("{}", display_value(&current, key));
        }
        ConfigCommands::Set { key, value } => {
            let mut updated = config::load()?;
            updated.set(key, value)?;
            config::save(&updated)?;
            println!("{} = {}", key, display_value(&updated, key));
        }
        ConfigCommands::List => {
            let current = config::load()?;
            println!("# {}", path.display());
            for key in ClientConfig::keys() {
                println!("{} = {}", key, display_value(&current, key));
            }
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to replace it",
                    path.display()
                );
            }
            config::save(&ClientConfig::default())?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn display_value(config: &ClientConfig, key: &str) -> String {
    config.get(key).unwrap_or_else(|| "(not set)".to_string())
}
