//! Cloud provider abstraction.
//!
//! A provider turns local settings into typed requests, sends them through an
//! [`RpcTransport`], and maps each reply onto one of: a success value, an
//! application failure reported by the server, or a protocol bug.

pub mod error;
pub mod linode;
pub mod timestamp;

use holepuncher_core::{
    ProviderKind, SessionRecord, Settings, TunnelCreationParams, TunnelInstance,
};

use crate::client::HolepuncherClient;

pub use error::{
    ErrorKind, FailureCause, FieldError, ProtocolViolation, ProviderError, ServerFailure,
};
pub use linode::LinodeProvider;

/// A tunnel that was just created or rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTunnel {
    pub instance: TunnelInstance,
    pub creation_params: TunnelCreationParams,
}

impl ProvisionedTunnel {
    pub fn into_session(self) -> SessionRecord {
        SessionRecord::new(self.instance, self.creation_params)
    }
}

/// Tunnel lifecycle operations every provider supports.
pub trait CloudProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn create_tunnel(
        &self,
    ) -> impl Future<Output = Result<ProvisionedTunnel, ProviderError>> + Send;

    fn tunnel_status(&self) -> impl Future<Output = Result<TunnelInstance, ProviderError>> + Send;

    fn destroy_tunnel(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

/// Build the configured provider on top of a fresh RPC client.
pub fn cloud_provider(
    settings: &Settings,
) -> Result<LinodeProvider<HolepuncherClient>, ProviderError> {
    let Some(kind) = settings.runtime.provider else {
        return Err(ProviderError::Config(
            "runtime.provider is empty or missing".into(),
        ));
    };
    match kind {
        ProviderKind::Linode => linode_provider(settings),
    }
}

/// Build a Linode provider regardless of the configured default provider.
pub fn linode_provider(
    settings: &Settings,
) -> Result<LinodeProvider<HolepuncherClient>, ProviderError> {
    settings.validate()?;
    let client =
        HolepuncherClient::new(&settings.runtime.server_address, &settings.client_protobuf)?;
    LinodeProvider::new(client, settings)
}

