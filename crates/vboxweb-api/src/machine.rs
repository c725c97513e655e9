//! `IMachine`: a registered virtual machine.

use crate::error::ApiResult;
use crate::operations::*;
use crate::progress::Progress;
use crate::session::Session;
use crate::snapshot::Snapshot;
use crate::types::{FrontEnd, LockType, MachineState, MachineSummary, SessionState};

managed_object! {
    /// A machine reference, either a registered machine or the mutable
    /// session machine of a locked session.
    Machine
}

impl Machine {
    /// Whether the server could read the machine's settings.
    pub async fn accessible(&self) -> ApiResult<bool> {
        let resp = self.client.call(&IMachineGetAccessible { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn name(&self) -> ApiResult<String> {
        let resp = self.client.call(&IMachineGetName { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn id(&self) -> ApiResult<String> {
        let resp = self.client.call(&IMachineGetId { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn state(&self) -> ApiResult<MachineState> {
        let resp = self.client.call(&IMachineGetState { this: self.this() }).await?;
        Ok(MachineState::from(resp.returnval.as_str()))
    }

    pub async fn os_type_id(&self) -> ApiResult<String> {
        let resp = self.client.call(&IMachineGetOSTypeId { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    /// Guest RAM in MB.
    pub async fn memory_size(&self) -> ApiResult<u32> {
        let resp = self.client.call(&IMachineGetMemorySize { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn cpu_count(&self) -> ApiResult<u32> {
        let resp = self.client.call(&IMachineGetCPUCount { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn description(&self) -> ApiResult<String> {
        let resp = self.client.call(&IMachineGetDescription { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn session_state(&self) -> ApiResult<SessionState> {
        let resp = self
            .client
            .call(&IMachineGetSessionState { this: self.this() })
            .await?;
        Ok(SessionState::from(resp.returnval.as_str()))
    }

    pub async fn current_snapshot(&self) -> ApiResult<Option<Snapshot>> {
        let resp = self
            .client
            .call(&IMachineGetCurrentSnapshot { this: self.this() })
            .await?;
        if resp.returnval.is_empty() {
            return Ok(None);
        }
        Ok(Some(Snapshot::new(self.client.clone(), resp.returnval)))
    }

    pub async fn snapshot_count(&self) -> ApiResult<u32> {
        let resp = self
            .client
            .call(&IMachineGetSnapshotCount { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    /// Start a VM process attached to `session`. The session stays locked
    /// by the new process until the caller unlocks it.
    pub async fn launch_vm_process(
        &self,
        session: &Session,
        front_end: &FrontEnd,
        environment_changes: &[String],
    ) -> ApiResult<Progress> {
        let resp = self
            .client
            .call(&IMachineLaunchVMProcess {
                this: self.this(),
                session: session.reference().to_string(),
                name: front_end.as_str().to_string(),
                environment_changes: environment_changes.to_vec(),
            })
            .await?;
        Ok(Progress::new(self.client.clone(), resp.returnval))
    }

    pub async fn lock(&self, session: &Session, lock_type: LockType) -> ApiResult<()> {
        self.client
            .call(&IMachineLockMachine {
                this: self.this(),
                session: session.reference().to_string(),
                lock_type: lock_type.as_str().to_string(),
            })
            .await?;
        Ok(())
    }

    /// Find a snapshot by name or UUID; an empty string yields the root.
    pub async fn find_snapshot(&self, name_or_id: &str) -> ApiResult<Snapshot> {
        let resp = self
            .client
            .call(&IMachineFindSnapshot {
                this: self.this(),
                name_or_id: name_or_id.to_string(),
            })
            .await?;
        Ok(Snapshot::new(self.client.clone(), resp.returnval))
    }

    /// Returns the new snapshot's UUID and the progress to wait on.
    pub async fn take_snapshot(
        &self,
        name: &str,
        description: &str,
        pause: bool,
    ) -> ApiResult<(String, Progress)> {
        let resp = self
            .client
            .call(&IMachineTakeSnapshot {
                this: self.this(),
                name: name.to_string(),
                description: description.to_string(),
                pause,
            })
            .await?;
        Ok((resp.id, Progress::new(self.client.clone(), resp.returnval)))
    }

    /// Collect the attributes shown in machine listings.
    pub async fn summary(&self) -> ApiResult<MachineSummary> {
        Ok(MachineSummary {
            name: self.name().await?,
            id: self.id().await?,
            state: self.state().await?,
            os_type_id: self.os_type_id().await?,
            memory_mb: self.memory_size().await?,
            cpu_count: self.cpu_count().await?,
            session_state: self.session_state().await?,
            snapshot_count: self.snapshot_count().await?,
            description: self.description().await?,
        })
    }
}
