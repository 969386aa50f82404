//! Holepuncher Core Library
//!
//! Shared functionality for the holepuncher client:
//! - Settings file loading and validation
//! - Provider-agnostic tunnel types
//! - Session persistence across CLI invocations
//! - Common error types

pub mod config;
pub mod error;
pub mod session;
pub mod tracing_init;
pub mod tunnel;

pub use config::Settings;
pub use error::{Error, Result};
pub use session::SessionRecord;
pub use tunnel::{ProviderKind, TunnelCreationParams, TunnelInstance};
