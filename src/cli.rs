//! Command-line definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vboxweb_api::FrontEnd;

/// Control VirtualBox machines through the VirtualBox web service
/// (`vboxwebsrv`).
#[derive(Parser, Debug)]
#[command(name = "vboxweb", author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file (connection and service settings)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Web service URL
    #[arg(short, long, env = "VBOXWEB_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Web service logon user
    #[arg(short, long, env = "VBOXWEB_USER", global = true)]
    pub user: Option<String>,

    /// Web service logon password
    #[arg(short, long, env = "VBOXWEB_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// HTTP Basic user for a proxy in front of the web service
    #[arg(long, global = true)]
    pub http_user: Option<String>,

    /// HTTP Basic password
    #[arg(long, global = true, requires = "http_user")]
    pub http_password: Option<String>,

    /// Accept any TLS certificate
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show web service and host information
    Version,
    /// List registered machines
    List,
    /// Show one machine
    Info { vm: String },
    /// Start a machine
    Start {
        vm: String,
        /// Front end for the VM process
        #[arg(long = "type", value_enum)]
        front_end: Option<FrontEndArg>,
    },
    /// Power a machine off (hard)
    Poweroff { vm: String },
    /// Press the ACPI power button
    Acpi { vm: String },
    Pause { vm: String },
    Resume { vm: String },
    Reset { vm: String },
    /// Take a snapshot
    Snapshot {
        vm: String,
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Show the snapshot tree of a machine
    Snapshots { vm: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEndArg {
    Gui,
    Headless,
    Sdl,
    Separate,
}

impl From<FrontEndArg> for FrontEnd {
    fn from(arg: FrontEndArg) -> Self {
        match arg {
            FrontEndArg::Gui => FrontEnd::Gui,
            FrontEndArg::Headless => FrontEnd::Headless,
            FrontEndArg::Sdl => FrontEnd::Sdl,
            FrontEndArg::Separate => FrontEnd::Separate,
        }
    }
}
