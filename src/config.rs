//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSE_HOME/config.json` and holds the address the
//! server listens on and the credentials accepted by the login page.

use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_NAME: &str = "expense-tracker";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_USERNAME: &str = "user1";
const DEFAULT_PASSWORD: &str = "demo1";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_HOME` and from there it loads `$EXPENSE_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and writes an initial `config.json` with default
    /// settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail, or if a `config.json` already exists. An
    ///   existing configuration is never overwritten.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expense tracker home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        anyhow::ensure!(
            !config_path.exists(),
            "A config file already exists at '{}'",
            config_path.display()
        );

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `config.json` from `home`.
    ///
    /// If there is no config file, a warning is logged and the defaults are used. There is nothing
    /// in the configuration that the server cannot run without.
    ///
    /// # Errors
    /// - Returns an error if the config file exists but cannot be read or is invalid.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let root = home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            warn!(
                "No config file found at '{}', using defaults. Run `init` to create one.",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn port(&self) -> u16 {
        self.config_file.port
    }

    pub fn bind_address(&self) -> IpAddr {
        self.config_file.bind_address
    }

    /// The socket address the server should listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address(), self.port())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.config_file.username, &self.config_file.password)
    }

    /// Replaces the configured port, e.g. with a value given on the command line.
    pub fn with_port(mut self, port: u16) -> Self {
        self.config_file.port = port;
        self
    }

    /// Replaces the configured bind address, e.g. with a value given on the command line.
    pub fn with_bind_address(mut self, bind_address: IpAddr) -> Self {
        self.config_file.bind_address = bind_address;
        self
    }
}

/// The single username and password accepted by the login page.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if both `username` and `password` match exactly.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense-tracker",
///   "config_version": 1,
///   "bind_address": "0.0.0.0",
///   "port": 8081,
///   "username": "user1",
///   "password": "demo1"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense-tracker"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The IP address to listen on
    #[serde(default = "default_bind_address")]
    bind_address: IpAddr,

    /// The TCP port to listen on
    #[serde(default = "default_port")]
    port: u16,

    /// The username accepted by the login page
    #[serde(default = "default_username")]
    username: String,

    /// The password accepted by the login page
    #[serde(default = "default_password")]
    password: String,
}

fn default_bind_address() -> IpAddr {
    DEFAULT_BIND_ADDRESS
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_password() -> String {
    DEFAULT_PASSWORD.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            bind_address: DEFAULT_BIND_ADDRESS,
            port: DEFAULT_PORT,
            username: default_username(),
            password: default_password(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in '{}', expected {}",
            config.config_version,
            path.display(),
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
