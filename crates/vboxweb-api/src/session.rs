//! `ISession`: the client side of a machine lock.

use crate::console::Console;
use crate::error::ApiResult;
use crate::machine::Machine;
use crate::operations::*;
use crate::types::SessionState;

managed_object! {
    /// Session object from `IWebsessionManager::getSessionObject`.
    Session
}

impl Session {
    /// Console of the running VM; only valid while the session holds a lock.
    pub async fn console(&self) -> ApiResult<Console> {
        let resp = self.client.call(&ISessionGetConsole { this: self.this() }).await?;
        Ok(Console::new(self.client.clone(), resp.returnval))
    }

    /// The mutable session machine of a locked session.
    pub async fn machine(&self) -> ApiResult<Machine> {
        let resp = self.client.call(&ISessionGetMachine { this: self.this() }).await?;
        Ok(Machine::new(self.client.clone(), resp.returnval))
    }

    pub async fn state(&self) -> ApiResult<SessionState> {
        let resp = self.client.call(&ISessionGetState { this: self.this() }).await?;
        Ok(SessionState::from(resp.returnval.as_str()))
    }

    pub async fn unlock(&self) -> ApiResult<()> {
        self.client
            .call(&ISessionUnlockMachine { this: self.this() })
            .await?;
        Ok(())
    }
}
