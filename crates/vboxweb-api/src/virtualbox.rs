//! `IVirtualBox`: root object of a web session.

use crate::error::ApiResult;
use crate::host::Host;
use crate::machine::Machine;
use crate::operations::*;

managed_object! {
    /// The `IVirtualBox` object returned by logon.
    VirtualBox
}

impl VirtualBox {
    /// Full product version, e.g. `7.0.14`.
    pub async fn version(&self) -> ApiResult<String> {
        let resp = self.client.call(&IVirtualBoxGetVersion { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    /// API version string, e.g. `7_0`.
    pub async fn api_version(&self) -> ApiResult<String> {
        let resp = self.client.call(&IVirtualBoxGetAPIVersion { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn revision(&self) -> ApiResult<u32> {
        let resp = self.client.call(&IVirtualBoxGetRevision { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn settings_file_path(&self) -> ApiResult<String> {
        let resp = self
            .client
            .call(&IVirtualBoxGetSettingsFilePath { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    /// All registered machines.
    pub async fn machines(&self) -> ApiResult<Vec<Machine>> {
        let resp = self.client.call(&IVirtualBoxGetMachines { this: self.this() }).await?;
        Ok(resp
            .returnval
            .into_iter()
            .map(|r| Machine::new(self.client.clone(), r))
            .collect())
    }

    /// Find a registered machine by name or UUID. Fails with
    /// `VBOX_E_OBJECT_NOT_FOUND` when there is none.
    pub async fn find_machine(&self, name_or_id: &str) -> ApiResult<Machine> {
        let resp = self
            .client
            .call(&IVirtualBoxFindMachine {
                this: self.this(),
                name_or_id: name_or_id.to_string(),
            })
            .await?;
        Ok(Machine::new(self.client.clone(), resp.returnval))
    }

    pub async fn host(&self) -> ApiResult<Host> {
        let resp = self.client.call(&IVirtualBoxGetHost { this: self.this() }).await?;
        Ok(Host::new(self.client.clone(), resp.returnval))
    }
}
