//! Tunnel lifecycle commands: create, destroy, info.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use holepuncher_core::SessionRecord;

use crate::output::write_json;
use crate::provider::{CloudProvider, ProvisionedTunnel};

/// Create a tunnel and remember it as the current session.
pub async fn create<P: CloudProvider>(provider: &P, runtime_dir: &Path) -> anyhow::Result<()> {
    let tunnel = provider.create_tunnel().await?;
    info!(
        provider = %provider.kind(),
        label = %tunnel.instance.label,
        "Tunnel instance was successfully created"
    );
    save_session(tunnel, runtime_dir)
}

/// Destroy the tunnel and forget the current session.
pub async fn destroy<P: CloudProvider>(provider: &P, runtime_dir: &Path) -> anyhow::Result<()> {
    provider.destroy_tunnel().await?;
    info!(provider = %provider.kind(), "Tunnel instance was successfully deleted");
    SessionRecord::clear(runtime_dir).context("Failed to clear session")?;
    Ok(())
}

/// Print the live tunnel status.
pub async fn info<P: CloudProvider, W: Write>(provider: &P, out: &mut W) -> anyhow::Result<()> {
    let status = provider.tunnel_status().await?;
    write_json(out, &status)
}

/// Persist a freshly provisioned tunnel as the current session.
pub fn save_session(tunnel: ProvisionedTunnel, runtime_dir: &Path) -> anyhow::Result<()> {
    tunnel
        .into_session()
        .save(runtime_dir)
        .with_context(|| format!("Failed to save session to {}", runtime_dir.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{TimeZone, Utc};
    use holepuncher_core::{ProviderKind, TunnelCreationParams, TunnelInstance};

    use super::*;
    use crate::provider::{ProtocolViolation, ProviderError};

    struct FakeProvider {
        fail: bool,
        destroyed: AtomicBool,
    }

    impl FakeProvider {
        const fn new(fail: bool) -> Self {
            Self {
                fail,
                destroyed: AtomicBool::new(false),
            }
        }

        fn bug() -> ProviderError {
            ProviderError::ProtocolBug {
                rpc: "LinodeCreateTunnel",
                violation: ProtocolViolation::EmptyResult,
            }
        }
    }

    fn instance() -> TunnelInstance {
        TunnelInstance {
            provider: ProviderKind::Linode,
            label: "holepuncher-tunnel".into(),
            ipv4: vec!["203.0.113.7".into()],
            ipv6: vec![],
            created_at: Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    impl CloudProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Linode
        }

        async fn create_tunnel(&self) -> Result<ProvisionedTunnel, ProviderError> {
            if self.fail {
                return Err(Self::bug());
            }
            Ok(ProvisionedTunnel {
                instance: instance(),
                creation_params: TunnelCreationParams {
                    wireguard_enabled: true,
                    wireguard_port: 51820,
                    ..Default::default()
                },
            })
        }

        async fn tunnel_status(&self) -> Result<TunnelInstance, ProviderError> {
            if self.fail {
                return Err(Self::bug());
            }
            Ok(instance())
        }

        async fn destroy_tunnel(&self) -> Result<(), ProviderError> {
            if self.fail {
                return Err(Self::bug());
            }
            self.destroyed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn create_saves_session() {
        let dir = tempfile::tempdir().unwrap();
        create(&FakeProvider::new(false), dir.path()).await.unwrap();
        let session = SessionRecord::restore(dir.path()).unwrap();
        assert_eq!(session.instance_info, instance());
        assert!(session.creation_params.wireguard_enabled);
    }

    #[tokio::test]
    async fn failed_create_leaves_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let err = create(&FakeProvider::new(true), dir.path())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ProviderError>().is_some());
        assert!(SessionRecord::restore(dir.path()).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn create_into_missing_runtime_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = create(&FakeProvider::new(false), &missing)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to save session"));
    }

    #[tokio::test]
    async fn destroy_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FakeProvider::new(false);
        create(&provider, dir.path()).await.unwrap();
        destroy(&provider, dir.path()).await.unwrap();
        assert!(provider.destroyed.load(Ordering::SeqCst));
        assert!(SessionRecord::restore(dir.path()).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_destroy_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        create(&FakeProvider::new(false), dir.path()).await.unwrap();
        destroy(&FakeProvider::new(true), dir.path())
            .await
            .unwrap_err();
        assert!(SessionRecord::restore(dir.path()).is_ok());
    }

    #[tokio::test]
    async fn info_prints_status_json() {
        let mut out = Vec::new();
        info(&FakeProvider::new(false), &mut out).await.unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["label"], "holepuncher-tunnel");
        assert_eq!(printed["provider"], "linode");
        assert_eq!(printed["created_at"], "2021-01-02T03:04:05Z");
    }
}
