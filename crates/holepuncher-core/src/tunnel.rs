//! Provider-agnostic tunnel types.

use chrono::{DateTime, Utc};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Settings;

/// Cloud provider hosting the tunnel.
///
/// Written by name. Reading also accepts the numeric code, which is how
/// older session files stored it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Linode,
}

const PROVIDER_NAMES: &[&str] = &["linode"];

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linode => "linode",
        }
    }

    /// Numeric code of the provider in older session files.
    pub const fn code(self) -> u64 {
        match self {
            Self::Linode => 0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linode" => Some(Self::Linode),
            _ => None,
        }
    }

    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Linode),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProviderKindVisitor)
    }
}

struct ProviderKindVisitor;

impl Visitor<'_> for ProviderKindVisitor {
    type Value = ProviderKind;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a provider name or numeric provider code")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        ProviderKind::from_name(value).ok_or_else(|| E::unknown_variant(value, PROVIDER_NAMES))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        ProviderKind::from_code(value)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .ok()
            .and_then(ProviderKind::from_code)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(value), &self))
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized view of a running tunnel instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelInstance {
    pub provider: ProviderKind,
    pub label: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Circumvention-method settings a tunnel was created (or rebuilt) with.
///
/// Fields of a disabled method are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelCreationParams {
    pub wireguard_enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub wireguard_server_key: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wireguard_peer_keys: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub wireguard_port: u16,

    #[serde(rename = "obfsproxy4_enabled")]
    pub obfsproxy_ipv4_enabled: bool,
    #[serde(rename = "obfsproxy4_secret", skip_serializing_if = "String::is_empty")]
    pub obfsproxy_ipv4_secret: String,
    #[serde(rename = "obfsproxy4_port", skip_serializing_if = "is_zero")]
    pub obfsproxy_ipv4_port: u16,

    #[serde(rename = "obfsproxy6_enabled")]
    pub obfsproxy_ipv6_enabled: bool,
    #[serde(rename = "obfsproxy6_secret", skip_serializing_if = "String::is_empty")]
    pub obfsproxy_ipv6_secret: String,
    #[serde(rename = "obfsproxy6_port", skip_serializing_if = "is_zero")]
    pub obfsproxy_ipv6_port: u16,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by serde
const fn is_zero(port: &u16) -> bool {
    *port == 0
}

impl TunnelCreationParams {
    /// Capture the enabled circumvention methods from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut params = Self::default();
        let wg = &settings.wireguard;
        if wg.enable {
            params.wireguard_enabled = true;
            params.wireguard_server_key.clone_from(&wg.server_key);
            params.wireguard_peer_keys.clone_from(&wg.peer_keys);
            params.wireguard_port = wg.port;
        }
        let obfs4 = &settings.obfsproxy_ipv4;
        if obfs4.enable {
            params.obfsproxy_ipv4_enabled = true;
            params.obfsproxy_ipv4_secret.clone_from(&obfs4.secret);
            params.obfsproxy_ipv4_port = obfs4.port;
        }
        let obfs6 = &settings.obfsproxy_ipv6;
        if obfs6.enable {
            params.obfsproxy_ipv6_enabled = true;
            params.obfsproxy_ipv6_secret.clone_from(&obfs6.secret);
            params.obfsproxy_ipv6_port = obfs6.port;
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::Linode).unwrap(),
            "\"linode\""
        );
        assert_eq!(ProviderKind::Linode.to_string(), "linode");
    }

    #[test]
    fn provider_kind_reads_name_or_numeric_code() {
        let by_name: ProviderKind = serde_json::from_str("\"linode\"").unwrap();
        let by_code: ProviderKind = serde_json::from_str("0").unwrap();
        assert_eq!(by_name, ProviderKind::Linode);
        assert_eq!(by_code, ProviderKind::Linode);
        assert_eq!(ProviderKind::Linode.code(), 0);
    }

    #[test]
    fn unknown_provider_kind_is_rejected() {
        assert!(serde_json::from_str::<ProviderKind>("\"vultr\"").is_err());
        assert!(serde_json::from_str::<ProviderKind>("7").is_err());
        assert!(serde_json::from_str::<ProviderKind>("-1").is_err());
        assert!(serde_json::from_str::<ProviderKind>("true").is_err());
    }

    #[test]
    fn disabled_methods_leave_params_empty() {
        let mut settings = Settings::default();
        settings.wireguard.server_key = "ignored".into();
        settings.obfsproxy_ipv6.secret = "ignored".into();
        assert_eq!(
            TunnelCreationParams::from_settings(&settings),
            TunnelCreationParams::default()
        );
    }

    #[test]
    fn enabled_methods_are_captured() {
        let mut settings = Settings::default();
        settings.wireguard.enable = true;
        settings.wireguard.server_key = "wg-key".into();
        settings.wireguard.peer_keys = vec!["peer-a".into(), "peer-b".into()];
        settings.wireguard.port = 51820;
        settings.obfsproxy_ipv6.enable = true;
        settings.obfsproxy_ipv6.secret = "s6".into();
        settings.obfsproxy_ipv6.port = 8443;

        let params = TunnelCreationParams::from_settings(&settings);
        assert!(params.wireguard_enabled);
        assert_eq!(params.wireguard_peer_keys.len(), 2);
        assert_eq!(params.wireguard_port, 51820);
        assert!(!params.obfsproxy_ipv4_enabled);
        assert!(params.obfsproxy_ipv6_enabled);
        assert_eq!(params.obfsproxy_ipv6_port, 8443);
    }

    #[test]
    fn empty_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&TunnelCreationParams::default()).unwrap();
        assert!(json.contains("\"wireguard_enabled\":false"));
        assert!(json.contains("\"obfsproxy4_enabled\":false"));
        assert!(!json.contains("wireguard_port"));
        assert!(!json.contains("obfsproxy6_secret"));
        let parsed: TunnelCreationParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TunnelCreationParams::default());
    }
}
