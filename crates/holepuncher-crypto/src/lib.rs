//! Holepuncher payload codec.
//!
//! Encrypts and frames the protobuf messages exchanged with the
//! orchestration server.
//!
//! ## Crypto primitives
//!
//! - **Keys**: a local X25519 static secret and the server's X25519 public key,
//!   both configured as hex strings
//! - **Key derivation**: X25519 ECDH → HKDF-SHA256 → symmetric key
//! - **Encryption**: ChaCha20-Poly1305 AEAD, random 12-byte nonce per message
//! - **Framing**: `nonce || ciphertext`

pub mod codec;
pub mod error;
pub mod keys;

pub use codec::{NONCE_SIZE, ProtoCodec};
pub use error::CryptoError;
pub use keys::{KEY_SIZE, LocalKey, PeerKey};
