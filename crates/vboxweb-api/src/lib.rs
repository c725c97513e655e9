//! # vboxweb-api
//!
//! Typed bindings for the VirtualBox web service (`vboxwebsrv`) on top of
//! [`vboxweb_soap`].
//!
//! - **operations** — request/response pairs for every remote call used here
//! - **websession / virtualbox / machine / session / console / progress /
//!   snapshot / host** — handle types wrapping managed object references
//! - **service** — session registry and multi-step machine control
//!   (start, power off, ACPI shutdown, pause, resume, reset, snapshots)

#[macro_use]
mod macros;

pub mod console;
pub mod error;
pub mod host;
pub mod machine;
pub mod operations;
pub mod progress;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod virtualbox;
pub mod websession;

pub use console::Console;
pub use error::{ApiError, ApiResult};
pub use host::Host;
pub use machine::Machine;
pub use progress::{ErrorInfo, Progress};
pub use service::{VboxService, VboxServiceConfig, VboxServiceState};
pub use session::Session;
pub use snapshot::Snapshot;
pub use types::*;
pub use virtualbox::VirtualBox;
pub use websession::WebsessionManager;

pub use vboxweb_soap::{ClientConfig, ResultCode, SoapClient, SoapError};
