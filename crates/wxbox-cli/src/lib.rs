//! wxbox CLI.
//!
//! - [`cli`] - argument definitions
//! - [`config`] - layered option loading
//! - [`commands`] - command implementations
//! - [`logger`] - tracing setup
//! - [`error`] - error type and miette conversion

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, Result};
