//! CLI configuration file location

use std::path::PathBuf;

use graphwire_client::ClientConfig;

/// Get the config directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".graphwire")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load the config file, or the defaults if there is none
pub fn load() -> anyhow::Result<ClientConfig> {
    Ok(ClientConfig::load(config_file_path())?)
}

pub fn save(config: &ClientConfig) -> anyhow::Result<()> {
    config.save(config_file_path())?;
    Ok(())
}
