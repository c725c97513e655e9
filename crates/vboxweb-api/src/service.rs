//! Aggregate service facade for the VirtualBox bindings.
//!
//! Keeps logged-on web sessions keyed by a local session ID and runs the
//! multi-step machine operations (lock, act, wait, unlock, release) on top
//! of the typed handles.

use crate::console::Console;
use crate::error::{ApiError, ApiResult};
use crate::machine::Machine;
use crate::operations::IManagedObjectRefRelease;
use crate::session::Session;
use crate::types::*;
use crate::virtualbox::VirtualBox;
use crate::websession::WebsessionManager;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use vboxweb_soap::{SoapClient, SoapError};

/// Shared handle for callers that drive the service from several tasks.
pub type VboxServiceState = Arc<Mutex<VboxService>>;

/// Internal session wrapper that owns the handles alongside metadata.
struct ManagedSession {
    meta: VboxSession,
    manager: WebsessionManager,
    vbox: VirtualBox,
}

/// Central service managing web sessions to one or more `vboxwebsrv`
/// instances.
pub struct VboxService {
    /// Active sessions keyed by session ID.
    sessions: HashMap<String, ManagedSession>,
    /// Global configuration.
    config: VboxServiceConfig,
}

/// Configuration for the VirtualBox service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VboxServiceConfig {
    /// Maximum number of concurrent sessions.
    pub max_sessions: usize,
    /// Front end used by `start_machine` when the caller passes none.
    pub default_front_end: FrontEnd,
    /// Upper bound for progress waits in seconds; `None` waits forever.
    pub wait_timeout_seconds: Option<u64>,
}

impl Default for VboxServiceConfig {
    fn default() -> Self {
        Self {
            max_sessions: 50,
            default_front_end: FrontEnd::Headless,
            wait_timeout_seconds: Some(600),
        }
    }
}

/// Console operations that need a shared lock on a running machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleAction {
    PowerDown,
    PowerButton,
    Pause,
    Resume,
    Reset,
}

impl ConsoleAction {
    fn label(self) -> &'static str {
        match self {
            Self::PowerDown => "power off",
            Self::PowerButton => "ACPI shutdown",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
        }
    }

    async fn apply(self, console: &Console, timeout: Option<Duration>) -> ApiResult<()> {
        match self {
            Self::PowerDown => {
                let progress = console.power_down().await?;
                let result = progress.wait(timeout).await;
                release_quietly(progress.client(), progress.reference()).await;
                result
            }
            Self::PowerButton => console.power_button().await,
            Self::Pause => console.pause().await,
            Self::Resume => console.resume().await,
            Self::Reset => console.reset().await,
        }
    }
}

impl VboxService {
    /// Create a new service with default config.
    pub fn new() -> Self {
        Self::with_config(VboxServiceConfig::default())
    }

    /// Create a new service with custom config.
    pub fn with_config(config: VboxServiceConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &VboxServiceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: VboxServiceConfig) {
        self.config = config;
    }

    fn wait_timeout(&self) -> Option<Duration> {
        self.config.wait_timeout_seconds.map(Duration::from_secs)
    }

    // ─── Session Management ──────────────────────────────────────────

    /// Log on to a web service and register the session.
    pub async fn connect(&mut self, config: VboxConnectionConfig) -> ApiResult<String> {
        if self.sessions.len() >= self.config.max_sessions {
            return Err(ApiError::SessionLimit(self.config.max_sessions));
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Connecting to {} as '{}' (session {})",
            config.client.endpoint, config.username, session_id
        );

        let client = Arc::new(SoapClient::new(config.client.clone())?);
        let manager = WebsessionManager::new(client);
        let vbox = manager.logon(&config.username, &config.password).await?;

        let api_version = match vbox.api_version().await {
            Ok(v) => v,
            Err(e) => {
                if let Err(logoff) = manager.logoff(&vbox).await {
                    warn!("logoff after failed handshake: {}", logoff);
                }
                return Err(e);
            }
        };

        let now = Utc::now();
        let meta = VboxSession {
            id: session_id.clone(),
            endpoint: config.client.endpoint.clone(),
            username: config.username.clone(),
            api_version,
            connected_at: now,
            last_activity: now,
        };
        self.sessions.insert(
            session_id.clone(),
            ManagedSession {
                meta,
                manager,
                vbox,
            },
        );

        info!("Session {} connected to {}", session_id, config.client.endpoint);
        Ok(session_id)
    }

    /// Log off and forget a session. The session is removed even if the
    /// logoff call fails.
    pub async fn disconnect(&mut self, session_id: &str) -> ApiResult<()> {
        let managed = self
            .sessions
            .remove(session_id)
            .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;
        let result = managed.manager.logoff(&managed.vbox).await;
        info!("Session {} disconnected from {}", session_id, managed.meta.endpoint);
        result
    }

    /// Disconnect all sessions, returning how many there were.
    pub async fn disconnect_all(&mut self) -> usize {
        let sessions: Vec<(String, ManagedSession)> = self.sessions.drain().collect();
        let count = sessions.len();
        for (id, managed) in sessions {
            if let Err(e) = managed.manager.logoff(&managed.vbox).await {
                warn!("logoff of session {} failed: {}", id, e);
            }
        }
        info!("Disconnected {} sessions", count);
        count
    }

    /// List all active sessions.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions
            .values()
            .map(|s| SessionSummary {
                session_id: s.meta.id.clone(),
                endpoint: s.meta.endpoint.clone(),
                username: s.meta.username.clone(),
                api_version: s.meta.api_version.clone(),
                connected_at: s.meta.connected_at,
            })
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Metadata of one session.
    pub fn session(&self, session_id: &str) -> ApiResult<&VboxSession> {
        self.sessions
            .get(session_id)
            .map(|s| &s.meta)
            .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))
    }

    /// Handles for a session, marking it active.
    fn handles(&mut self, session_id: &str) -> ApiResult<(WebsessionManager, VirtualBox)> {
        let managed = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| ApiError::SessionNotFound(session_id.to_string()))?;
        managed.meta.last_activity = Utc::now();
        Ok((managed.manager.clone(), managed.vbox.clone()))
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// Version, API version, revision and host information.
    pub async fn server_info(&mut self, session_id: &str) -> ApiResult<ServerInfo> {
        let (_, vbox) = self.handles(session_id)?;
        let host = vbox.host().await?;
        let host_info = host.info().await;
        release_quietly(vbox.client(), host.reference()).await;

        Ok(ServerInfo {
            version: vbox.version().await?,
            api_version: vbox.api_version().await?,
            revision: vbox.revision().await?,
            settings_file_path: vbox.settings_file_path().await?,
            host: host_info?,
        })
    }

    /// Summaries of every registered machine, in server order. Machines
    /// whose settings cannot be read are listed as inaccessible instead of
    /// failing the whole listing.
    pub async fn list_machines(&mut self, session_id: &str) -> ApiResult<Vec<MachineSummary>> {
        let (_, vbox) = self.handles(session_id)?;
        let machines = vbox.machines().await?;

        let mut summaries = Vec::with_capacity(machines.len());
        let mut failure = None;
        for machine in &machines {
            if failure.is_none() {
                match describe(machine).await {
                    Ok(s) => summaries.push(s),
                    Err(e) => failure = Some(e),
                }
            }
            release_quietly(vbox.client(), machine.reference()).await;
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(summaries),
        }
    }

    /// Summary of one machine looked up by name or UUID.
    pub async fn machine_info(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<MachineSummary> {
        let (_, vbox) = self.handles(session_id)?;
        let machine = vbox.find_machine(name_or_id).await?;
        let result = describe(&machine).await;
        release_quietly(vbox.client(), machine.reference()).await;
        result
    }

    /// The snapshot tree of a machine, flattened depth-first from the root.
    pub async fn list_snapshots(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<Vec<SnapshotInfo>> {
        let (_, vbox) = self.handles(session_id)?;
        let machine = vbox.find_machine(name_or_id).await?;
        let result = Self::snapshot_tree(&machine).await;
        release_quietly(vbox.client(), machine.reference()).await;
        result
    }

    async fn snapshot_tree(machine: &Machine) -> ApiResult<Vec<SnapshotInfo>> {
        if machine.snapshot_count().await? == 0 {
            return Ok(Vec::new());
        }

        let current_id = match machine.current_snapshot().await? {
            Some(current) => {
                let id = current.id().await;
                release_quietly(current.client(), current.reference()).await;
                Some(id?)
            }
            None => None,
        };

        let root = machine.find_snapshot("").await?;
        let (infos, visited) = root.walk(current_id.as_deref()).await?;
        for snap in &visited {
            release_quietly(snap.client(), snap.reference()).await;
        }
        Ok(infos)
    }

    // ─── Machine Control ─────────────────────────────────────────────

    /// Launch a VM process for a machine and wait until it is running.
    pub async fn start_machine(
        &mut self,
        session_id: &str,
        name_or_id: &str,
        front_end: Option<FrontEnd>,
    ) -> ApiResult<()> {
        let front_end = front_end.unwrap_or_else(|| self.config.default_front_end.clone());
        let timeout = self.wait_timeout();
        let (manager, vbox) = self.handles(session_id)?;

        let machine = vbox.find_machine(name_or_id).await?;
        let session = match manager.session_object(&vbox).await {
            Ok(s) => s,
            Err(e) => {
                release_quietly(vbox.client(), machine.reference()).await;
                return Err(e);
            }
        };

        info!("Starting '{}' with front end {}", name_or_id, front_end);
        let result = async {
            let progress = machine.launch_vm_process(&session, &front_end, &[]).await?;
            let waited = progress.wait(timeout).await;
            release_quietly(vbox.client(), progress.reference()).await;
            waited
        }
        .await;

        let unlocked = unlock(&session, result.is_ok()).await;
        release_quietly(vbox.client(), session.reference()).await;
        release_quietly(vbox.client(), machine.reference()).await;
        result.and(unlocked)
    }

    /// Hard power off; waits for the power-down progress.
    pub async fn power_off(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<()> {
        self.console_action(session_id, name_or_id, ConsoleAction::PowerDown)
            .await
    }

    /// Press the virtual ACPI power button.
    pub async fn acpi_shutdown(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<()> {
        self.console_action(session_id, name_or_id, ConsoleAction::PowerButton)
            .await
    }

    pub async fn pause(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<()> {
        self.console_action(session_id, name_or_id, ConsoleAction::Pause)
            .await
    }

    pub async fn resume(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<()> {
        self.console_action(session_id, name_or_id, ConsoleAction::Resume)
            .await
    }

    pub async fn reset(&mut self, session_id: &str, name_or_id: &str) -> ApiResult<()> {
        self.console_action(session_id, name_or_id, ConsoleAction::Reset)
            .await
    }

    /// Take a snapshot and return its UUID.
    pub async fn take_snapshot(
        &mut self,
        session_id: &str,
        name_or_id: &str,
        name: &str,
        description: &str,
    ) -> ApiResult<String> {
        let timeout = self.wait_timeout();
        let (manager, vbox) = self.handles(session_id)?;
        info!("Taking snapshot '{}' of '{}'", name, name_or_id);

        let client = vbox.client().clone();
        let name = name.to_string();
        let description = description.to_string();
        with_shared_lock(&manager, &vbox, name_or_id, move |session| async move {
            let session_machine = session.machine().await?;
            let result = async {
                let (id, progress) = session_machine.take_snapshot(&name, &description, true).await?;
                let waited = progress.wait(timeout).await;
                release_quietly(&client, progress.reference()).await;
                waited.map(|_| id)
            }
            .await;
            release_quietly(&client, session_machine.reference()).await;
            result
        })
        .await
    }

    async fn console_action(
        &mut self,
        session_id: &str,
        name_or_id: &str,
        action: ConsoleAction,
    ) -> ApiResult<()> {
        let timeout = self.wait_timeout();
        let (manager, vbox) = self.handles(session_id)?;
        info!("{} '{}'", action.label(), name_or_id);

        let client = vbox.client().clone();
        with_shared_lock(&manager, &vbox, name_or_id, move |session| async move {
            let console = session.console().await?;
            let result = action.apply(&console, timeout).await;
            release_quietly(&client, console.reference()).await;
            result
        })
        .await
    }
}

impl Default for VboxService {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Look up a machine, lock it shared with a fresh session object, run `f`
/// and unlock again. The session is unlocked whether or not `f` succeeds.
async fn with_shared_lock<F, Fut, T>(
    manager: &WebsessionManager,
    vbox: &VirtualBox,
    name_or_id: &str,
    f: F,
) -> ApiResult<T>
where
    F: FnOnce(Session) -> Fut,
    Fut: std::future::Future<Output = ApiResult<T>>,
{
    let machine = vbox.find_machine(name_or_id).await?;
    let session = match manager.session_object(vbox).await {
        Ok(s) => s,
        Err(e) => {
            release_quietly(vbox.client(), machine.reference()).await;
            return Err(e);
        }
    };

    let result = match machine.lock(&session, LockType::Shared).await {
        Ok(()) => {
            debug!("locked '{}' with session {}", name_or_id, session.reference());
            let outcome = f(session.clone()).await;
            let unlocked = unlock(&session, outcome.is_ok()).await;
            outcome.and_then(|v| unlocked.map(|_| v))
        }
        Err(e) => Err(e),
    };

    release_quietly(vbox.client(), session.reference()).await;
    release_quietly(vbox.client(), machine.reference()).await;
    result
}

/// Summary of a registered machine. A machine the server reports as
/// inaccessible, or whose getters answer with a SOAP fault, yields the
/// inaccessible placeholder; transport errors still propagate.
async fn describe(machine: &Machine) -> ApiResult<MachineSummary> {
    let readable = match machine.accessible().await {
        Ok(readable) => readable,
        Err(e) if is_fault(&e) => false,
        Err(e) => return Err(e),
    };
    if readable {
        match machine.summary().await {
            Err(e) if is_fault(&e) => debug!("reading machine {} failed: {}", machine.reference(), e),
            other => return other,
        }
    }

    let id = machine.id().await.unwrap_or_default();
    warn!("machine {} ({}) is inaccessible", machine.reference(), id);
    Ok(MachineSummary::inaccessible(id))
}

fn is_fault(e: &ApiError) -> bool {
    matches!(e, ApiError::Soap(SoapError::Fault(_)))
}

/// Unlock a session. When the operation already failed, an unlock error is
/// only logged so the original error is reported.
async fn unlock(session: &Session, propagate: bool) -> ApiResult<()> {
    match session.unlock().await {
        Ok(()) => Ok(()),
        Err(e) if propagate => Err(e),
        Err(e) => {
            warn!("unlock of session {} failed: {}", session.reference(), e);
            Ok(())
        }
    }
}

/// Release a managed object reference, logging failures.
async fn release_quietly(client: &Arc<SoapClient>, reference: &str) {
    if reference.is_empty() {
        return;
    }
    let request = IManagedObjectRefRelease {
        this: reference.to_string(),
    };
    if let Err(e) = client.call(&request).await {
        warn!("failed to release {}: {}", reference, e);
    }
}
