//! A single-user expense tracker served over HTTP.
//!
//! The [`ledger::Ledger`] holds expenses in memory and [`analysis`] breaks spending down by
//! category. The [`server`] module puts a login page, a dashboard and a small JSON API in front of
//! them.

pub mod analysis;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod server;
mod utils;

pub use config::{Config, Credentials};
pub use error::{Error, ErrorType, IntoResult, Result};
