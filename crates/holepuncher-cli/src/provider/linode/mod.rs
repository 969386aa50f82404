//! Linode provider.

mod requests;
pub mod types;


use tracing::info;

use holepuncher_core::{ProviderKind, Settings, TunnelCreationParams, TunnelInstance};
use holepuncher_proto::methods::{
    METHOD_LINODE_CREATE_TUNNEL, METHOD_LINODE_DESTROY_TUNNEL, METHOD_LINODE_LIST_IMAGES,
    METHOD_LINODE_LIST_INSTANCES, METHOD_LINODE_LIST_PLANS, METHOD_LINODE_LIST_REGIONS,
    METHOD_LINODE_LIST_STACKSCRIPTS, METHOD_LINODE_REBUILD_TUNNEL, METHOD_LINODE_TUNNEL_STATUS,
};
use holepuncher_proto::v1::{
    LinodeAuth, LinodeCreateTunnelResponse, LinodeDestroyTunnelResponse, LinodeError,
    LinodeGetTunnelStatusResponse, LinodeImageList, LinodeInstance, LinodeInstanceList,
    LinodeListImagesResponse, LinodeListInstancesResponse, LinodeListPlansResponse,
    LinodeListRegionsResponse, LinodeListStackScriptsResponse, LinodePlanList,
    LinodeRebuildTunnelResponse, LinodeRegionList, LinodeStackScriptList, Request, Response,
    response,
};

use super::error::{ProtocolViolation, ProviderError, ServerFailure};
use super::timestamp::parse_timestamp_or_epoch;
use super::{CloudProvider, ProvisionedTunnel};
use crate::client::RpcTransport;

use types::{Image, Instance, Plan, Region, StackScript};

/// Account settings sent with create and rebuild requests.
#[derive(Clone)]
struct Accounts {
    root_password: String,
    regular_name: String,
    regular_password: String,
    ssh_keys: Vec<String>,
}

impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accounts")
            .field("regular_name", &self.regular_name)
            .field("ssh_keys", &self.ssh_keys.len())
            .finish_non_exhaustive()
    }
}

/// Linode-backed tunnel provider.
#[derive(Debug)]
pub struct LinodeProvider<T> {
    transport: T,
    auth: LinodeAuth,
    region: String,
    plan: String,
    accounts: Accounts,
    creation_params: TunnelCreationParams,
}

impl<T: RpcTransport> LinodeProvider<T> {
    /// Create a provider from validated settings.
    pub fn new(transport: T, settings: &Settings) -> Result<Self, ProviderError> {
        settings.provider_linode.validate()?;
        Ok(Self {
            transport,
            auth: LinodeAuth {
                access_token: settings.provider_linode.access_token.clone(),
            },
            region: settings.provider_linode.region.clone(),
            plan: settings.provider_linode.plan.clone(),
            accounts: Accounts {
                root_password: settings.user_root.password.clone(),
                regular_name: settings.user_unpriv.username.clone(),
                regular_password: settings.user_unpriv.password.clone(),
                ssh_keys: settings.user_common.ssh_keys.clone(),
            },
            creation_params: TunnelCreationParams::from_settings(settings),
        })
    }

    async fn call(&self, request: Request) -> Result<Response, ProviderError> {
        let rpc = request.rpc_name();
        self.transport
            .do_request(&request)
            .await
            .map_err(|source| ProviderError::Transport { rpc, source })
    }

    /// Reinstall the tunnel instance in place with the current settings.
    pub async fn rebuild_tunnel(&self) -> Result<ProvisionedTunnel, ProviderError> {
        let reply = self.call(self.rebuild_tunnel_request()).await?;
        let instance = unwrap_reply(METHOD_LINODE_REBUILD_TUNNEL, reply, |r| match r {
            response::R::LinodeRebuildTunnelResult(result) => Some(result),
            _ => None,
        })?;
        log_instance(&instance, "Successfully rebuilt Linode instance");
        Ok(self.provisioned(&instance))
    }

    /// All instances on the account.
    pub async fn list_instances(&self) -> Result<Vec<Instance>, ProviderError> {
        let reply = self.call(self.list_instances_request()).await?;
        let list = unwrap_reply(METHOD_LINODE_LIST_INSTANCES, reply, |r| match r {
            response::R::LinodeListInstancesResult(result) => Some(result),
            _ => None,
        })?;
        Ok(list.l.into_iter().map(Instance::from).collect())
    }

    /// Plans available for new instances.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, ProviderError> {
        let reply = self.call(Self::list_plans_request()).await?;
        let list = unwrap_reply(METHOD_LINODE_LIST_PLANS, reply, |r| match r {
            response::R::LinodeListPlansResult(result) => Some(result),
            _ => None,
        })?;
        Ok(list.l.into_iter().map(Plan::from).collect())
    }

    /// Regions instances can be placed in.
    pub async fn list_regions(&self) -> Result<Vec<Region>, ProviderError> {
        let reply = self.call(Self::list_regions_request()).await?;
        let list = unwrap_reply(METHOD_LINODE_LIST_REGIONS, reply, |r| match r {
            response::R::LinodeListRegionsResult(result) => Some(result),
            _ => None,
        })?;
        Ok(list.l.into_iter().map(Region::from).collect())
    }

    /// Images visible to the account.
    pub async fn list_images(&self) -> Result<Vec<Image>, ProviderError> {
        let reply = self.call(self.list_images_request()).await?;
        let list = unwrap_reply(METHOD_LINODE_LIST_IMAGES, reply, |r| match r {
            response::R::LinodeListImagesResult(result) => Some(result),
            _ => None,
        })?;
        Ok(list.l.into_iter().map(Image::from).collect())
    }

    /// StackScripts owned by the account.
    pub async fn list_stackscripts(&self) -> Result<Vec<StackScript>, ProviderError> {
        let reply = self.call(self.list_stackscripts_request()).await?;
        let list = unwrap_reply(METHOD_LINODE_LIST_STACKSCRIPTS, reply, |r| match r {
            response::R::LinodeListStackscriptsResult(result) => Some(result),
            _ => None,
        })?;
        Ok(list.l.into_iter().map(StackScript::from).collect())
    }

    fn provisioned(&self, instance: &LinodeInstance) -> ProvisionedTunnel {
        ProvisionedTunnel {
            instance: tunnel_instance(instance),
            creation_params: self.creation_params.clone(),
        }
    }
}

impl<T: RpcTransport> CloudProvider for LinodeProvider<T> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Linode
    }

    async fn create_tunnel(&self) -> Result<ProvisionedTunnel, ProviderError> {
        let reply = self.call(self.create_tunnel_request()).await?;
        let instance = unwrap_reply(METHOD_LINODE_CREATE_TUNNEL, reply, |r| match r {
            response::R::LinodeCreateTunnelResult(result) => Some(result),
            _ => None,
        })?;
        log_instance(&instance, "Successfully created Linode instance");
        Ok(self.provisioned(&instance))
    }

    async fn tunnel_status(&self) -> Result<TunnelInstance, ProviderError> {
        let reply = self.call(self.tunnel_status_request()).await?;
        let instance = unwrap_reply(METHOD_LINODE_TUNNEL_STATUS, reply, |r| match r {
            response::R::LinodeTunnelStatusResult(result) => Some(result),
            _ => None,
        })?;
        Ok(tunnel_instance(&instance))
    }

    async fn destroy_tunnel(&self) -> Result<(), ProviderError> {
        let reply = self.call(self.destroy_tunnel_request()).await?;
        unwrap_reply(METHOD_LINODE_DESTROY_TUNNEL, reply, |r| match r {
            response::R::LinodeDestroyTunnelResult(result) => Some(result),
            _ => None,
        })
    }
}

/// A Linode result message split into its error and success payloads.
trait LinodeResult {
    type Payload;

    fn into_parts(self) -> (Option<LinodeError>, Option<Self::Payload>);
}

macro_rules! linode_result {
    ($($result:ty => $field:ident: $payload:ty),* $(,)?) => {
        $(
            impl LinodeResult for $result {
                type Payload = $payload;

                fn into_parts(self) -> (Option<LinodeError>, Option<Self::Payload>) {
                    (self.error, self.$field)
                }
            }
        )*
    };
}

linode_result! {
    LinodeCreateTunnelResponse => instance: LinodeInstance,
    LinodeRebuildTunnelResponse => instance: LinodeInstance,
    LinodeGetTunnelStatusResponse => instance: LinodeInstance,
    LinodeListInstancesResponse => instances: LinodeInstanceList,
    LinodeListPlansResponse => plans: LinodePlanList,
    LinodeListRegionsResponse => regions: LinodeRegionList,
    LinodeListImagesResponse => images: LinodeImageList,
    LinodeListStackScriptsResponse => stackscripts: LinodeStackScriptList,
}

// Destroy has no success payload: no error means success.
impl LinodeResult for LinodeDestroyTunnelResponse {
    type Payload = ();

    fn into_parts(self) -> (Option<LinodeError>, Option<()>) {
        (self.error, Some(()))
    }
}

/// Pick the expected result out of a reply and classify it.
///
/// The error payload wins when a result carries both.
fn unwrap_reply<R: LinodeResult>(
    rpc: &'static str,
    reply: Response,
    extract: impl FnOnce(response::R) -> Option<R>,
) -> Result<R::Payload, ProviderError> {
    let got = reply.rpc_name();
    let result = reply
        .r
        .and_then(extract)
        .ok_or(ProviderError::ProtocolBug {
            rpc,
            violation: ProtocolViolation::UnexpectedResult { got },
        })?;
    match result.into_parts() {
        (Some(error), _) => Err(ProviderError::Application {
            rpc,
            failure: ServerFailure::from(error),
        }),
        (None, Some(payload)) => Ok(payload),
        (None, None) => Err(ProviderError::ProtocolBug {
            rpc,
            violation: ProtocolViolation::EmptyResult,
        }),
    }
}

fn tunnel_instance(instance: &LinodeInstance) -> TunnelInstance {
    TunnelInstance {
        provider: ProviderKind::Linode,
        label: instance.label.clone(),
        ipv4: instance.ipv4.clone(),
        ipv6: instance.ipv6.clone(),
        created_at: parse_timestamp_or_epoch(&instance.created_at),
    }
}

fn log_instance(instance: &LinodeInstance, message: &str) {
    info!(
        label = %instance.label,
        region = %instance.region,
        plan = %instance.plan,
        status = instance.status().as_str(),
        ipv4 = ?instance.ipv4,
        ipv6 = ?instance.ipv6,
        "{message}"
    );
}
