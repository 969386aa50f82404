//! Session variable printing for shell scripts.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};

use holepuncher_core::SessionRecord;

/// Variables of the saved session.
#[derive(clap::Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVar {
    /// IPv4 addresses, one per line.
    Ipv4,
    /// IPv6 addresses, one per line.
    Ipv6,
    /// Instance creation time.
    Created,
    /// Time elapsed since the instance was created.
    Duration,
    /// Whether WireGuard is enabled.
    #[command(name = "wg.enabled")]
    WgEnabled,
    /// WireGuard server key.
    #[command(name = "wg.server_key")]
    WgServerKey,
    /// WireGuard peer keys, one per line.
    #[command(name = "wg.peer_keys")]
    WgPeerKeys,
    /// WireGuard port.
    #[command(name = "wg.port")]
    WgPort,
    /// Whether obfsproxy over IPv4 is enabled.
    #[command(name = "obfs4.enabled")]
    Obfs4Enabled,
    /// Obfsproxy IPv4 secret.
    #[command(name = "obfs4.secret")]
    Obfs4Secret,
    /// Obfsproxy IPv4 port.
    #[command(name = "obfs4.port")]
    Obfs4Port,
    /// Whether obfsproxy over IPv6 is enabled.
    #[command(name = "obfs6.enabled")]
    Obfs6Enabled,
    /// Obfsproxy IPv6 secret.
    #[command(name = "obfs6.secret")]
    Obfs6Secret,
    /// Obfsproxy IPv6 port.
    #[command(name = "obfs6.port")]
    Obfs6Port,
}

/// Print one variable of the saved session.
pub fn run<W: Write>(var: SessionVar, runtime_dir: &Path, out: &mut W) -> anyhow::Result<()> {
    let session = SessionRecord::restore(runtime_dir)
        .with_context(|| format!("Failed to read session from {}", runtime_dir.display()))?;
    writeln!(out, "{}", render(var, &session, Utc::now()))?;
    Ok(())
}

/// Render a session variable as printed on stdout.
pub fn render(var: SessionVar, session: &SessionRecord, now: DateTime<Utc>) -> String {
    let instance = &session.instance_info;
    let params = &session.creation_params;
    match var {
        SessionVar::Ipv4 => instance.ipv4.join("\n"),
        SessionVar::Ipv6 => instance.ipv6.join("\n"),
        SessionVar::Created => instance.created_at.to_string(),
        SessionVar::Duration => format_duration(now - instance.created_at),
        SessionVar::WgEnabled => params.wireguard_enabled.to_string(),
        SessionVar::WgServerKey => params.wireguard_server_key.clone(),
        SessionVar::WgPeerKeys => params.wireguard_peer_keys.join("\n"),
        SessionVar::WgPort => params.wireguard_port.to_string(),
        SessionVar::Obfs4Enabled => params.obfsproxy_ipv4_enabled.to_string(),
        SessionVar::Obfs4Secret => params.obfsproxy_ipv4_secret.clone(),
        SessionVar::Obfs4Port => params.obfsproxy_ipv4_port.to_string(),
        SessionVar::Obfs6Enabled => params.obfsproxy_ipv6_enabled.to_string(),
        SessionVar::Obfs6Secret => params.obfsproxy_ipv6_secret.clone(),
        SessionVar::Obfs6Port => params.obfsproxy_ipv6_port.to_string(),
    }
}

/// Format an elapsed time as `1h2m3s`, dropping leading zero units.
pub fn format_duration(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}
