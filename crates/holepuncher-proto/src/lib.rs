//! Holepuncher Protocol Buffers
//!
//! Generated protobuf code for the holepuncher RPC protocol.
//!
//! Every call is a single [`Request`] envelope carrying exactly one command
//! and is answered with a single [`Response`] envelope carrying the matching
//! result.

#![allow(clippy::derive_partial_eq_without_eq)]

mod envelope;
pub mod methods;

/// Holepuncher v1 API definitions.
///
/// All generated types are included here.
pub mod v1 {
    include!(concat!(env!("OUT_DIR"), "/holepuncher.v1.rs"));
}

// Re-export v1 as the default API version for convenience
pub use v1::*;
