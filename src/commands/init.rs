use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the home directory and an initial `config.json` with default settings.
///
/// # Arguments
/// - `home` - The directory that will hold the configuration, e.g. `$HOME/expenses`
///
/// # Errors
/// - Returns an error if any file operations fail or if a config file already exists.
pub async fn init(home: &Path) -> Result<Out<PathBuf>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(Out::new(
        format!(
            "Successfully created the config file at '{}'",
            config.config_path().display()
        ),
        config.config_path().to_path_buf(),
    ))
}
