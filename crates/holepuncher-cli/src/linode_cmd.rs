//! Linode subcommands: rebuild and catalog listings.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::client::RpcTransport;
use crate::output::write_json;
use crate::provider::LinodeProvider;
use crate::tunnel_cmd::save_session;

/// Linode-specific actions.
#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinodeAction {
    /// Rebuild the tunnel instance with the current settings.
    Rebuild,
    /// List currently active instances.
    Instances,
    /// List available instance types.
    Plans,
    /// List available regions.
    Regions,
    /// List available images.
    Images,
    /// List available StackScripts.
    Stackscripts,
}

/// Execute a Linode subcommand.
pub async fn run<T: RpcTransport, W: Write>(
    action: LinodeAction,
    provider: &LinodeProvider<T>,
    runtime_dir: &Path,
    out: &mut W,
) -> anyhow::Result<()> {
    match action {
        LinodeAction::Rebuild => {
            let tunnel = provider.rebuild_tunnel().await?;
            info!(label = %tunnel.instance.label, "Tunnel instance was successfully rebuilt");
            save_session(tunnel, runtime_dir)
        }
        LinodeAction::Instances => write_json(out, &provider.list_instances().await?),
        LinodeAction::Plans => write_json(out, &provider.list_plans().await?),
        LinodeAction::Regions => write_json(out, &provider.list_regions().await?),
        LinodeAction::Images => write_json(out, &provider.list_images().await?),
        LinodeAction::Stackscripts => write_json(out, &provider.list_stackscripts().await?),
    }
}
