//! Linode request builders.

use holepuncher_proto::v1::{
    LinodeCreateTunnelRequest, LinodeDestroyTunnelRequest, LinodeGetTunnelStatusRequest,
    LinodeListImagesRequest, LinodeListInstancesRequest, LinodeListPlansRequest,
    LinodeListRegionsRequest, LinodeListStackScriptsRequest, LinodeRebuildTunnelRequest,
    ObfsproxyIpv4Options, ObfsproxyIpv6Options, Request, WireguardOptions, request,
};

use super::LinodeProvider;

/// Options for each enabled circumvention method; `None` when disabled.
pub(super) struct NetServiceOptions {
    pub wireguard: Option<WireguardOptions>,
    pub obfsproxy4: Option<ObfsproxyIpv4Options>,
    pub obfsproxy6: Option<ObfsproxyIpv6Options>,
}

impl<T> LinodeProvider<T> {
    pub(super) fn net_service_options(&self) -> NetServiceOptions {
        let params = &self.creation_params;
        NetServiceOptions {
            wireguard: params.wireguard_enabled.then(|| WireguardOptions {
                port: u32::from(params.wireguard_port),
                server_key: params.wireguard_server_key.clone(),
                peer_keys: params.wireguard_peer_keys.clone(),
            }),
            obfsproxy4: params
                .obfsproxy_ipv4_enabled
                .then(|| ObfsproxyIpv4Options {
                    port: u32::from(params.obfsproxy_ipv4_port),
                    secret: params.obfsproxy_ipv4_secret.clone(),
                }),
            obfsproxy6: params
                .obfsproxy_ipv6_enabled
                .then(|| ObfsproxyIpv6Options {
                    port: u32::from(params.obfsproxy_ipv6_port),
                    secret: params.obfsproxy_ipv6_secret.clone(),
                }),
        }
    }

    pub(super) fn create_tunnel_request(&self) -> Request {
        let options = self.net_service_options();
        request::R::LinodeCreateTunnel(LinodeCreateTunnelRequest {
            auth: Some(self.auth.clone()),
            region: self.region.clone(),
            plan: self.plan.clone(),
            root_password: self.accounts.root_password.clone(),
            regular_account_name: self.accounts.regular_name.clone(),
            regular_account_password: self.accounts.regular_password.clone(),
            ssh_keys: self.accounts.ssh_keys.clone(),
            wireguard_options: options.wireguard,
            obfsproxy4_options: options.obfsproxy4,
            obfsproxy6_options: options.obfsproxy6,
        })
        .into()
    }

    pub(super) fn rebuild_tunnel_request(&self) -> Request {
        let options = self.net_service_options();
        request::R::LinodeRebuildTunnel(LinodeRebuildTunnelRequest {
            auth: Some(self.auth.clone()),
            root_password: self.accounts.root_password.clone(),
            regular_account_name: self.accounts.regular_name.clone(),
            regular_account_password: self.accounts.regular_password.clone(),
            ssh_keys: self.accounts.ssh_keys.clone(),
            wireguard_options: options.wireguard,
            obfsproxy4_options: options.obfsproxy4,
            obfsproxy6_options: options.obfsproxy6,
        })
        .into()
    }

    pub(super) fn destroy_tunnel_request(&self) -> Request {
        request::R::LinodeDestroyTunnel(LinodeDestroyTunnelRequest {
            auth: Some(self.auth.clone()),
        })
        .into()
    }

    pub(super) fn tunnel_status_request(&self) -> Request {
        request::R::LinodeTunnelStatus(LinodeGetTunnelStatusRequest {
            auth: Some(self.auth.clone()),
        })
        .into()
    }

    pub(super) fn list_instances_request(&self) -> Request {
        request::R::LinodeListInstances(LinodeListInstancesRequest {
            auth: Some(self.auth.clone()),
        })
        .into()
    }

    // Plans and regions are public catalogs; no credentials are sent.
    pub(super) fn list_plans_request() -> Request {
        request::R::LinodeListPlans(LinodeListPlansRequest {}).into()
    }

    pub(super) fn list_regions_request() -> Request {
        request::R::LinodeListRegions(LinodeListRegionsRequest {}).into()
    }

    pub(super) fn list_images_request(&self) -> Request {
        request::R::LinodeListImages(LinodeListImagesRequest {
            auth: Some(self.auth.clone()),
        })
        .into()
    }

    pub(super) fn list_stackscripts_request(&self) -> Request {
        request::R::LinodeListStackscripts(LinodeListStackScriptsRequest {
            auth: Some(self.auth.clone()),
        })
        .into()
    }
}
