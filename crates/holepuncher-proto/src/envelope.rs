//! Helpers on the generated envelope types.

use crate::methods::{
    METHOD_LINODE_CREATE_TUNNEL, METHOD_LINODE_DESTROY_TUNNEL, METHOD_LINODE_LIST_IMAGES,
    METHOD_LINODE_LIST_INSTANCES, METHOD_LINODE_LIST_PLANS, METHOD_LINODE_LIST_REGIONS,
    METHOD_LINODE_LIST_STACKSCRIPTS, METHOD_LINODE_REBUILD_TUNNEL, METHOD_LINODE_TUNNEL_STATUS,
    METHOD_NONE,
};
use crate::v1::{LinodeInstanceStatus, Request, Response, request, response};

impl From<request::R> for Request {
    fn from(r: request::R) -> Self {
        Self { r: Some(r) }
    }
}

impl Request {
    /// Name of the carried command, or `"nil"` for an empty envelope.
    pub const fn rpc_name(&self) -> &'static str {
        match &self.r {
            Some(request::R::LinodeCreateTunnel(_)) => METHOD_LINODE_CREATE_TUNNEL,
            Some(request::R::LinodeDestroyTunnel(_)) => METHOD_LINODE_DESTROY_TUNNEL,
            Some(request::R::LinodeTunnelStatus(_)) => METHOD_LINODE_TUNNEL_STATUS,
            Some(request::R::LinodeListPlans(_)) => METHOD_LINODE_LIST_PLANS,
            Some(request::R::LinodeListRegions(_)) => METHOD_LINODE_LIST_REGIONS,
            Some(request::R::LinodeListInstances(_)) => METHOD_LINODE_LIST_INSTANCES,
            Some(request::R::LinodeListImages(_)) => METHOD_LINODE_LIST_IMAGES,
            Some(request::R::LinodeListStackscripts(_)) => METHOD_LINODE_LIST_STACKSCRIPTS,
            Some(request::R::LinodeRebuildTunnel(_)) => METHOD_LINODE_REBUILD_TUNNEL,
            None => METHOD_NONE,
        }
    }
}

impl From<response::R> for Response {
    fn from(r: response::R) -> Self {
        Self { r: Some(r) }
    }
}

impl Response {
    /// Name of the RPC whose result is carried, or `"nil"` for an empty envelope.
    pub const fn rpc_name(&self) -> &'static str {
        match &self.r {
            Some(response::R::LinodeCreateTunnelResult(_)) => METHOD_LINODE_CREATE_TUNNEL,
            Some(response::R::LinodeDestroyTunnelResult(_)) => METHOD_LINODE_DESTROY_TUNNEL,
            Some(response::R::LinodeTunnelStatusResult(_)) => METHOD_LINODE_TUNNEL_STATUS,
            Some(response::R::LinodeListPlansResult(_)) => METHOD_LINODE_LIST_PLANS,
            Some(response::R::LinodeListRegionsResult(_)) => METHOD_LINODE_LIST_REGIONS,
            Some(response::R::LinodeListInstancesResult(_)) => METHOD_LINODE_LIST_INSTANCES,
            Some(response::R::LinodeListImagesResult(_)) => METHOD_LINODE_LIST_IMAGES,
            Some(response::R::LinodeListStackscriptsResult(_)) => METHOD_LINODE_LIST_STACKSCRIPTS,
            Some(response::R::LinodeRebuildTunnelResult(_)) => METHOD_LINODE_REBUILD_TUNNEL,
            None => METHOD_NONE,
        }
    }
}

impl LinodeInstanceStatus {
    /// Lowercase name, as shown to users.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Running => "running",
            Self::Offline => "offline",
            Self::Booting => "booting",
            Self::Rebooting => "rebooting",
            Self::ShuttingDown => "shutting_down",
            Self::Provisioning => "provisioning",
            Self::Deleting => "deleting",
            Self::Migrating => "migrating",
            Self::Rebuilding => "rebuilding",
            Self::Cloning => "cloning",
            Self::Restoring => "restoring",
            Self::Resizing => "resizing",
        }
    }
}
