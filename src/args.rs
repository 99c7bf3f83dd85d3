//! These structs provide the CLI interface for the expense-tracker binary.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expense-tracker: A personal expense tracker with a web dashboard.
///
/// Run `expense-tracker serve` and open http://localhost:8081 in a browser. Log in, record
/// expenses, and see where your money goes broken down by category.
///
/// Expenses are held in memory only. They are gone when the server stops.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and write a default config.json into it.
    ///
    /// The config file holds the address and port to listen on and the username and password
    /// accepted by the login page. Edit it after running this command.
    Init,
    /// Start the web server.
    Serve(ServeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSE_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `serve` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ServeArgs {
    /// The TCP port to listen on. Overrides the port in config.json.
    #[arg(long, env = "EXPENSE_PORT")]
    port: Option<u16>,

    /// The IP address to listen on. Overrides the bind_address in config.json.
    #[arg(long)]
    bind: Option<IpAddr>,
}

impl ServeArgs {
    pub fn new(port: Option<u16>, bind: Option<IpAddr>) -> Self {
        Self { port, bind }
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn bind(&self) -> Option<IpAddr> {
        self.bind
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSE_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let args = Args::parse_from([
            "expense-tracker",
            "--home",
            "/tmp/x",
            "--log-level",
            "debug",
            "serve",
            "--port",
            "9090",
            "--bind",
            "127.0.0.1",
        ]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/x"));
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::Serve(serve) => {
                assert_eq!(serve.port(), Some(9090));
                assert_eq!(serve.bind(), Some("127.0.0.1".parse().unwrap()));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init() {
        let args = Args::parse_from(["expense-tracker", "--home", "/tmp/y", "init"]);
        assert!(matches!(args.command(), Command::Init));
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = Args::try_parse_from(["expense-tracker", "serve", "--port", "http"]);
        assert!(result.is_err());
    }
}
