//! Session persistence.
//!
//! The session record is the only state shared between CLI invocations: the
//! tunnel created (or rebuilt) by the last successful lifecycle command and
//! the circumvention settings it was created with. It is written to
//! `<runtime_dir>/session.json` and removed when the tunnel is destroyed.
//!
//! No locking is performed. Two invocations racing on the same runtime
//! directory may observe a partially written file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::Result;
use crate::tunnel::{TunnelCreationParams, TunnelInstance};

/// Name of the session file inside the runtime directory.
pub const SESSION_FILENAME: &str = "session.json";

/// Last known tunnel and the parameters it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub instance_info: TunnelInstance,
    pub creation_params: TunnelCreationParams,
}

/// Path to the session file for a runtime directory.
pub fn session_path(runtime_dir: &Path) -> PathBuf {
    runtime_dir.join(SESSION_FILENAME)
}

impl SessionRecord {
    pub const fn new(instance_info: TunnelInstance, creation_params: TunnelCreationParams) -> Self {
        Self {
            instance_info,
            creation_params,
        }
    }

    /// Write the record, replacing any previous session.
    pub fn save(&self, runtime_dir: &Path) -> Result<()> {
        let filename = session_path(runtime_dir);
        let json = serde_json::to_string_pretty(self).inspect_err(|e| {
            error!(cause = %e, "Error serializing session cache");
        })?;
        std::fs::write(&filename, json).inspect_err(|e| {
            error!(cause = %e, path = %filename.display(), "Error writing session cache");
        })?;
        Ok(())
    }

    /// Read the record saved by the last lifecycle command.
    pub fn restore(runtime_dir: &Path) -> Result<Self> {
        let filename = session_path(runtime_dir);
        let data = std::fs::read_to_string(&filename).inspect_err(|e| {
            error!(cause = %e, filename = %filename.display(), "Error opening session cache");
        })?;
        let record = serde_json::from_str(&data).inspect_err(|e| {
            error!(cause = %e, filename = %filename.display(), "Error parsing session cache");
        })?;
        Ok(record)
    }

    /// Remove the saved record. A missing file is not an error.
    pub fn clear(runtime_dir: &Path) -> Result<()> {
        let filename = session_path(runtime_dir);
        match std::fs::remove_file(&filename) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(cause = %e, filename = %filename.display(), "Couldn't clear session cache");
                Err(e.into())
            }
        }
    }
}
