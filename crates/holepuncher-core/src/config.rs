//! Settings file loading and validation.
//!
//! Settings are read from a single TOML file:
//! 1. The file given on the command line
//! 2. Environment overrides (`HOLEPUNCHER_SERVER_ADDRESS`, `HOLEPUNCHER_RUNTIME_DIR`)
//! 3. Path variable substitution in `runtime.runtime_dir`
//! 4. Random ports for enabled services without an explicit port
//!
//! Loading never validates; call [`Settings::validate`] (general settings) and
//! [`LinodeSettings::validate`] (provider settings) before talking to the server.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tunnel::ProviderKind;

/// Lowest port handed out by [`random_port`].
const RANDOM_PORT_MIN: u16 = 10_000;

/// Upper bound (exclusive) of ports handed out by [`random_port`].
const RANDOM_PORT_MAX: u16 = 64_000;

/// Complete holepuncher settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub runtime: RuntimeSettings,
    #[serde(default)]
    pub client_protobuf: ProtobufClientSettings,
    #[serde(default)]
    pub provider_linode: LinodeSettings,
    #[serde(default)]
    pub user_common: CommonUserSettings,
    #[serde(default)]
    pub user_root: RootUserSettings,
    #[serde(default)]
    pub user_unpriv: RegularUserSettings,
    #[serde(default)]
    pub wireguard: WireGuardSettings,
    #[serde(default)]
    pub obfsproxy_ipv4: ObfsproxySettings,
    #[serde(default)]
    pub obfsproxy_ipv6: ObfsproxySettings,
}

/// Where the session lives and which server/provider to talk to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    /// Directory holding `session.json`. Supports `${HOME}` and `${EXE}`.
    #[serde(default)]
    pub runtime_dir: String,
    /// Base address of the orchestration server.
    #[serde(default)]
    pub server_address: String,
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

/// Key material for the payload codec, both hex-encoded.
#[derive(Clone, Default, Deserialize)]
pub struct ProtobufClientSettings {
    /// Our X25519 secret key.
    #[serde(default, alias = "server_key")]
    pub private_key: String,
    /// The orchestration server's X25519 public key.
    #[serde(default)]
    pub peer_key: String,
}

impl std::fmt::Debug for ProtobufClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtobufClientSettings")
            .field("private_key", &"[REDACTED]")
            .field("peer_key", &self.peer_key)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinodeSettings {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub plan: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonUserSettings {
    #[serde(default)]
    pub ssh_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootUserSettings {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegularUserSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireGuardSettings {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub server_key: String,
    #[serde(default)]
    pub peer_keys: Vec<String>,
    /// 0 means "pick one at random".
    #[serde(default)]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObfsproxySettings {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub secret: String,
    /// 0 means "pick one at random".
    #[serde(default)]
    pub port: u16,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.ok_or_else(|| Error::Config("config path is empty or missing".into()))?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut settings = Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        apply_env_overrides(&mut settings);
        settings.runtime.runtime_dir = expand_runtime_dir(&settings.runtime.runtime_dir)?;
        settings.assign_random_ports();
        Ok(settings)
    }

    /// Parse settings from TOML text without any post-processing.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
    }

    /// Runtime directory as a path.
    pub fn runtime_dir(&self) -> &Path {
        Path::new(&self.runtime.runtime_dir)
    }

    /// Validate the provider-independent settings.
    pub fn validate(&self) -> Result<()> {
        self.validate_runtime()?;

        if self.wireguard.enable {
            if self.wireguard.server_key.is_empty() {
                return Err(Error::Config(
                    "wireguard: server key is empty or missing".into(),
                ));
            }
            if self.wireguard.peer_keys.is_empty() {
                return Err(Error::Config(
                    "wireguard: at least 1 peer key is required".into(),
                ));
            }
            if self.wireguard.port == 0 {
                return Err(Error::Config(
                    "wireguard: missing or invalid port number".into(),
                ));
            }
        }
        self.obfsproxy_ipv4.validate("obfsproxy ipv4")?;
        self.obfsproxy_ipv6.validate("obfsproxy ipv6")?;
        Ok(())
    }

    fn validate_runtime(&self) -> Result<()> {
        let address = &self.runtime.server_address;
        if address.is_empty() {
            return Err(Error::Config(
                "runtime: server address is empty or missing".into(),
            ));
        }
        let parsed = url::Url::parse(address)
            .map_err(|e| Error::Config(format!("runtime: malformed server address: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "runtime: unsupported server address scheme: {}",
                parsed.scheme()
            )));
        }
        if self.runtime.provider.is_none() {
            return Err(Error::Config("runtime: provider is empty or missing".into()));
        }
        if self.runtime.runtime_dir.is_empty() {
            return Err(Error::Config(
                "runtime: runtime dir is empty or missing".into(),
            ));
        }
        Ok(())
    }

    /// Give every enabled service without a port a random one.
    fn assign_random_ports(&mut self) {
        if self.wireguard.enable && self.wireguard.port == 0 {
            self.wireguard.port = random_port();
        }
        if self.obfsproxy_ipv4.enable && self.obfsproxy_ipv4.port == 0 {
            self.obfsproxy_ipv4.port = random_port();
        }
        if self.obfsproxy_ipv6.enable && self.obfsproxy_ipv6.port == 0 {
            self.obfsproxy_ipv6.port = random_port();
        }
    }
}

impl LinodeSettings {
    /// Validate the Linode provider settings.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::Config(
                "linode: access token is empty or missing".into(),
            ));
        }
        if self.plan.is_empty() {
            return Err(Error::Config("linode: plan is empty or missing".into()));
        }
        if self.region.is_empty() {
            return Err(Error::Config("linode: region is empty or missing".into()));
        }
        Ok(())
    }
}

impl ObfsproxySettings {
    fn validate(&self, section: &str) -> Result<()> {
        if !self.enable {
            return Ok(());
        }
        if self.secret.is_empty() {
            return Err(Error::Config(format!("{section}: missing secret")));
        }
        if self.port == 0 {
            return Err(Error::Config(format!(
                "{section}: missing or invalid port number"
            )));
        }
        Ok(())
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("HOLEPUNCHER_SERVER_ADDRESS") {
        tracing::debug!(server_address = %val, "Server address overridden from environment");
        settings.runtime.server_address = val;
    }
    if let Ok(val) = std::env::var("HOLEPUNCHER_RUNTIME_DIR") {
        tracing::debug!(runtime_dir = %val, "Runtime dir overridden from environment");
        settings.runtime.runtime_dir = val;
    }
}

/// Substitute `${HOME}` and `${EXE}` in a runtime directory path.
///
/// `${EXE}` expands to the directory containing the running executable.
/// `${AUTO}` is reserved and rejected.
pub fn expand_runtime_dir(raw: &str) -> Result<String> {
    let mut expanded = raw.to_string();

    if expanded.contains("${HOME}") {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Config(
                "Unable to determine the home directory while substituting ${HOME}".into(),
            )
        })?;
        expanded = expanded.replace("${HOME}", &home.to_string_lossy());
    }

    if expanded.contains("${EXE}") {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .ok_or_else(|| {
                Error::Config(
                    "Unable to determine the executable directory while substituting ${EXE}"
                        .into(),
                )
            })?;
        expanded = expanded.replace("${EXE}", &exe_dir.to_string_lossy());
    }

    if expanded.contains("${AUTO}") {
        return Err(Error::Config(
            "runtime.runtime_dir: ${AUTO} substitution is not supported".into(),
        ));
    }
    Ok(expanded)
}

/// Pick a random service port in `[10000, 64000)`.
pub fn random_port() -> u16 {
    rand::thread_rng().gen_range(RANDOM_PORT_MIN..RANDOM_PORT_MAX)
}
