//! Key material for the payload codec.
//!
//! Both keys are configured as hex strings: the local X25519 static secret
//! and the orchestration server's X25519 public key.

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Size of an X25519 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Decode a hex string into a fixed-size key.
fn decode_key(hex_value: &str) -> Result<[u8; KEY_SIZE], CryptoError> {
    let mut raw = hex::decode(hex_value.trim())?;
    if raw.len() != KEY_SIZE {
        let actual = raw.len();
        raw.zeroize();
        return Err(CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual,
        });
    }
    let mut arr = [0u8; KEY_SIZE];
    arr.copy_from_slice(&raw);
    raw.zeroize();
    Ok(arr)
}

/// Our X25519 static keypair.
pub struct LocalKey {
    secret: StaticSecret,
    public: PublicKey,
}

impl std::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKey")
            .field("public", &hex::encode(self.public.as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl LocalKey {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Parse a hex-encoded secret key.
    pub fn from_hex(hex_value: &str) -> Result<Self, CryptoError> {
        let mut arr = decode_key(hex_value)?;
        let secret = StaticSecret::from(arr);
        let public = PublicKey::from(&secret);
        arr.zeroize();
        Ok(Self { secret, public })
    }

    /// Get the secret key reference for ECDH.
    pub const fn secret(&self) -> &StaticSecret {
        &self.secret
    }

    /// The public half, as handed to the peer.
    pub fn public_key(&self) -> PeerKey {
        PeerKey(self.public)
    }

    /// Hex encoding of the secret key, in the form the settings file expects.
    pub fn secret_hex(&self) -> String {
        let mut bytes = self.secret.to_bytes();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }
}

/// The peer's X25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PeerKey(PublicKey);

impl std::fmt::Debug for PeerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PeerKey")
            .field(&hex::encode(self.0.as_bytes()))
            .finish()
    }
}

impl PeerKey {
    /// Parse a hex-encoded public key.
    pub fn from_hex(hex_value: &str) -> Result<Self, CryptoError> {
        decode_key(hex_value).map(|arr| Self(PublicKey::from(arr)))
    }

    pub const fn as_public_key(&self) -> &PublicKey {
        &self.0
    }

    /// Hex encoding of the public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn local_key_hex_roundtrip() {
        let key = LocalKey::generate();
        let restored = LocalKey::from_hex(&key.secret_hex()).unwrap();
        assert_eq!(restored.public_key(), key.public_key());
    }

    #[test]
    fn peer_key_hex_roundtrip() {
        let peer = LocalKey::generate().public_key();
        assert_eq!(PeerKey::from_hex(&peer.to_hex()).unwrap(), peer);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let peer = LocalKey::generate().public_key();
        let padded = format!("  {}\n", peer.to_hex());
        assert_eq!(PeerKey::from_hex(&padded).unwrap(), peer);
    }

    #[test]
    fn invalid_hex_is_rejected() {
        let err = LocalKey::from_hex("not hex at all").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyHex(_)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = PeerKey::from_hex("abcd").unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 2
            }
        ));
        assert!(matches!(
            LocalKey::from_hex(&"00".repeat(16)),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn debug_impl_redacts_secret() {
        let key = LocalKey::generate();
        let debug = format!("{key:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&key.secret_hex()));
    }
}
