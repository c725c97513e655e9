//! `IHost`: the physical machine running VirtualBox.

use crate::error::ApiResult;
use crate::operations::*;
use crate::types::HostInfo;

managed_object! {
    Host
}

impl Host {
    pub async fn processor_count(&self) -> ApiResult<u32> {
        let resp = self
            .client
            .call(&IHostGetProcessorCount { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    /// Total RAM in MB.
    pub async fn memory_size(&self) -> ApiResult<u32> {
        let resp = self.client.call(&IHostGetMemorySize { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    /// Free RAM in MB.
    pub async fn memory_available(&self) -> ApiResult<u32> {
        let resp = self
            .client
            .call(&IHostGetMemoryAvailable { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    pub async fn operating_system(&self) -> ApiResult<String> {
        let resp = self
            .client
            .call(&IHostGetOperatingSystem { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    pub async fn os_version(&self) -> ApiResult<String> {
        let resp = self.client.call(&IHostGetOSVersion { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn info(&self) -> ApiResult<HostInfo> {
        Ok(HostInfo {
            processor_count: self.processor_count().await?,
            memory_size_mb: self.memory_size().await?,
            memory_available_mb: self.memory_available().await?,
            operating_system: self.operating_system().await?,
            os_version: self.os_version().await?,
        })
    }
}
