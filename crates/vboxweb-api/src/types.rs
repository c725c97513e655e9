//! Shared types for the VirtualBox bindings.
//!
//! Covers API enumerations, connection configuration, session metadata
//! and the summaries returned by the service facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vboxweb_soap::ClientConfig;

// ─── API Enumerations ────────────────────────────────────────────────

wire_enum! {
    /// `MachineState` as reported by `IMachine::state`.
    MachineState {
        Null = "Null",
        PoweredOff = "PoweredOff",
        Saved = "Saved",
        Teleported = "Teleported",
        Aborted = "Aborted",
        AbortedSaved = "AbortedSaved",
        Running = "Running",
        Paused = "Paused",
        Stuck = "Stuck",
        Teleporting = "Teleporting",
        LiveSnapshotting = "LiveSnapshotting",
        Starting = "Starting",
        Stopping = "Stopping",
        Saving = "Saving",
        Restoring = "Restoring",
        TeleportingPausedVM = "TeleportingPausedVM",
        TeleportingIn = "TeleportingIn",
        DeletingSnapshotOnline = "DeletingSnapshotOnline",
        DeletingSnapshotPaused = "DeletingSnapshotPaused",
        OnlineSnapshotting = "OnlineSnapshotting",
        RestoringSnapshot = "RestoringSnapshot",
        DeletingSnapshot = "DeletingSnapshot",
        SettingUp = "SettingUp",
        Snapshotting = "Snapshotting",
    }
}

impl MachineState {
    /// A VM process exists (`FirstOnline..=LastOnline`).
    pub fn is_online(&self) -> bool {
        matches!(
            self,
            Self::Running
                | Self::Paused
                | Self::Stuck
                | Self::Teleporting
                | Self::LiveSnapshotting
                | Self::Starting
                | Self::Stopping
                | Self::Saving
                | Self::Restoring
                | Self::TeleportingPausedVM
                | Self::TeleportingIn
                | Self::DeletingSnapshotOnline
                | Self::DeletingSnapshotPaused
                | Self::OnlineSnapshotting
        )
    }

    /// The machine is between two stable states (`FirstTransient..=LastTransient`).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Teleporting
                | Self::LiveSnapshotting
                | Self::Starting
                | Self::Stopping
                | Self::Saving
                | Self::Restoring
                | Self::TeleportingPausedVM
                | Self::TeleportingIn
                | Self::DeletingSnapshotOnline
                | Self::DeletingSnapshotPaused
                | Self::OnlineSnapshotting
                | Self::RestoringSnapshot
                | Self::DeletingSnapshot
                | Self::SettingUp
                | Self::Snapshotting
        )
    }
}

wire_enum! {
    /// `SessionState` of a machine or session object.
    SessionState {
        Null = "Null",
        Unlocked = "Unlocked",
        Locked = "Locked",
        Spawning = "Spawning",
        Unlocking = "Unlocking",
    }
}

wire_enum! {
    /// `LockType` for `IMachine::lockMachine`.
    LockType {
        Null = "Null",
        Shared = "Shared",
        Write = "Write",
        VM = "VM",
    }
}

wire_enum! {
    /// Front-end type passed to `IMachine::launchVMProcess`.
    FrontEnd {
        Gui = "gui",
        Headless = "headless",
        Sdl = "sdl",
        Separate = "separate",
        EmergencyStop = "emergencystop",
    }
}

impl Default for FrontEnd {
    fn default() -> Self {
        Self::Headless
    }
}

// ─── Connection & Session ────────────────────────────────────────────

/// Everything needed to open a web session.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VboxConnectionConfig {
    /// Transport settings (endpoint, TLS, HTTP Basic auth, timeout).
    #[serde(flatten)]
    pub client: ClientConfig,
    /// `IWebsessionManager::logon` user. Empty when the server runs with
    /// authentication disabled (`VBoxAuthNull`).
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for VboxConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VboxConnectionConfig")
            .field("client", &self.client)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl VboxConnectionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: ClientConfig::new(endpoint),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }
}

/// Metadata about a logged-on web session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VboxSession {
    pub id: String,
    pub endpoint: String,
    pub username: String,
    pub api_version: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Summary of a connected session (for listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub endpoint: String,
    pub username: String,
    pub api_version: String,
    pub connected_at: DateTime<Utc>,
}

// ─── Results ─────────────────────────────────────────────────────────

/// Registered machine as listed by the facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSummary {
    pub name: String,
    pub id: String,
    pub state: MachineState,
    pub os_type_id: String,
    pub memory_mb: u32,
    pub cpu_count: u32,
    pub session_state: SessionState,
    pub snapshot_count: u32,
    #[serde(default)]
    pub description: String,
}

impl MachineSummary {
    /// State reported for machines whose settings cannot be read.
    pub const INACCESSIBLE: &'static str = "Inaccessible";

    /// Placeholder for a registered machine whose attributes are unreadable.
    pub fn inaccessible(id: String) -> Self {
        Self {
            name: String::new(),
            id,
            state: MachineState::Other(Self::INACCESSIBLE.to_string()),
            os_type_id: String::new(),
            memory_mb: 0,
            cpu_count: 0,
            session_state: SessionState::Null,
            snapshot_count: 0,
            description: String::new(),
        }
    }

    pub fn is_accessible(&self) -> bool {
        self.state.as_str() != Self::INACCESSIBLE
    }
}

/// One snapshot in a machine's snapshot tree, flattened depth-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `None` for the root snapshot.
    pub parent_id: Option<String>,
    pub depth: usize,
    /// Whether this is the machine's current snapshot.
    pub current: bool,
}

/// Host machine facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub processor_count: u32,
    pub memory_size_mb: u32,
    pub memory_available_mb: u32,
    pub operating_system: String,
    pub os_version: String,
}

/// Web service / VirtualBox installation facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub version: String,
    pub api_version: String,
    pub revision: u32,
    pub settings_file_path: String,
    pub host: HostInfo,
}
