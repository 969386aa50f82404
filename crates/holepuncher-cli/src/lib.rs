//! Holepuncher CLI Library
//!
//! Client side of the holepuncher protocol:
//! - Encrypted request/reply transport over HTTP
//! - Cloud provider result mapping (Linode)
//! - Command implementations behind the `holepuncher` binary

pub mod client;
pub mod linode_cmd;
pub mod output;
pub mod provider;
pub mod tunnel_cmd;
pub mod var_cmd;
