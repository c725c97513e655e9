//! `IWebsessionManager`: the only interface that needs no object reference.

use crate::error::{ApiError, ApiResult};
use crate::operations::*;
use crate::session::Session;
use crate::virtualbox::VirtualBox;
use std::sync::Arc;
use vboxweb_soap::SoapClient;

#[derive(Debug, Clone)]
pub struct WebsessionManager {
    client: Arc<SoapClient>,
}

impl WebsessionManager {
    pub fn new(client: Arc<SoapClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<SoapClient> {
        &self.client
    }

    /// Log on and return the session's `IVirtualBox` object.
    pub async fn logon(&self, username: &str, password: &str) -> ApiResult<VirtualBox> {
        let resp = self
            .client
            .call(&IWebsessionManagerLogon {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        if resp.returnval.is_empty() {
            return Err(ApiError::InvalidValue(
                "logon returned an empty IVirtualBox reference".into(),
            ));
        }
        Ok(VirtualBox::new(self.client.clone(), resp.returnval))
    }

    /// End the web session; every reference obtained through it becomes invalid.
    pub async fn logoff(&self, vbox: &VirtualBox) -> ApiResult<()> {
        self.client
            .call(&IWebsessionManagerLogoff {
                ref_ivirtualbox: vbox.reference().to_string(),
            })
            .await?;
        Ok(())
    }

    /// The `ISession` object used to lock machines and launch VM processes.
    pub async fn session_object(&self, vbox: &VirtualBox) -> ApiResult<Session> {
        let resp = self
            .client
            .call(&IWebsessionManagerGetSessionObject {
                ref_ivirtualbox: vbox.reference().to_string(),
            })
            .await?;
        Ok(Session::new(self.client.clone(), resp.returnval))
    }
}
