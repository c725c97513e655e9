//! # vboxweb
//!
//! Command-line front end for the VirtualBox web service, built on
//! [`vboxweb_api`] and [`vboxweb_soap`].
//!
//! - **cli** — `clap` definition of subcommands and global options
//! - **config** — JSON config file plus flag/environment overrides
//! - **commands** — log on, run one subcommand, log off
//! - **output** — text and JSON rendering
//! - **logging** — `tracing-subscriber` setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Settings;
