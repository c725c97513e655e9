//! `IConsole`: control of a running VM.

use crate::error::ApiResult;
use crate::operations::*;
use crate::progress::Progress;

managed_object! {
    Console
}

impl Console {
    /// Hard power off.
    pub async fn power_down(&self) -> ApiResult<Progress> {
        let resp = self.client.call(&IConsolePowerDown { this: self.this() }).await?;
        Ok(Progress::new(self.client.clone(), resp.returnval))
    }

    /// ACPI power button press; the guest decides what to do.
    pub async fn power_button(&self) -> ApiResult<()> {
        self.client.call(&IConsolePowerButton { this: self.this() }).await?;
        Ok(())
    }

    pub async fn pause(&self) -> ApiResult<()> {
        self.client.call(&IConsolePause { this: self.this() }).await?;
        Ok(())
    }

    pub async fn resume(&self) -> ApiResult<()> {
        self.client.call(&IConsoleResume { this: self.this() }).await?;
        Ok(())
    }

    pub async fn reset(&self) -> ApiResult<()> {
        self.client.call(&IConsoleReset { this: self.this() }).await?;
        Ok(())
    }
}
