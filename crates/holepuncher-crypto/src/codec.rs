//! Protobuf payload codec.
//!
//! Wraps prost encoding in ChaCha20-Poly1305 AEAD with a key derived from
//! X25519 ECDH + HKDF-SHA256. Each encoded frame is self-contained:
//!
//! ```text
//! [12-byte random nonce] [ciphertext + 16-byte auth tag]
//! ```
//!
//! Both sides derive the same key from their own secret and the other side's
//! public key, so one codec type serves the client and the server.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use prost::Message;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::keys::{LocalKey, PeerKey};

/// HKDF info string for payload key derivation.
const HKDF_INFO: &[u8] = b"holepuncher-proto-v1";

/// HKDF salt for domain separation (recommended by RFC 5869).
const HKDF_SALT: &[u8] = b"holepuncher-proto-hkdf-salt-v1";

/// Nonce size for ChaCha20-Poly1305.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
const TAG_SIZE: usize = 16;

/// Derive a 32-byte key from a shared secret via HKDF-SHA256.
///
/// The caller is responsible for zeroizing the returned bytes.
fn hkdf_derive(shared_secret: &[u8; 32]) -> Result<[u8; 32], CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), shared_secret);
    let mut key = [0u8; 32];
    hk.expand(HKDF_INFO, &mut key)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;
    Ok(key)
}

/// Encrypting codec for protobuf messages.
pub struct ProtoCodec {
    cipher: ChaCha20Poly1305,
}

impl std::fmt::Debug for ProtoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtoCodec").finish_non_exhaustive()
    }
}

impl ProtoCodec {
    /// Create a codec from our keypair and the peer's public key (performs ECDH).
    pub fn new(local: &LocalKey, peer: &PeerKey) -> Result<Self, CryptoError> {
        let shared = local.secret().diffie_hellman(peer.as_public_key());
        let mut key_bytes = hkdf_derive(shared.as_bytes())?;

        let key = Key::from_slice(&key_bytes);
        let cipher = ChaCha20Poly1305::new(key);
        key_bytes.zeroize();

        Ok(Self { cipher })
    }

    /// Encode and encrypt a message into a single frame.
    pub fn encode<M: Message>(&self, message: &M) -> Result<Vec<u8>, CryptoError> {
        let mut plaintext = message.encode_to_vec();
        let frame = self.seal(&plaintext);
        plaintext.zeroize();
        frame
    }

    /// Decrypt and decode a frame produced by [`ProtoCodec::encode`] on the peer.
    pub fn decode<M: Message + Default>(&self, frame: &[u8]) -> Result<M, CryptoError> {
        let mut plaintext = self.open(frame)?;
        let message = M::decode(plaintext.as_slice());
        plaintext.zeroize();
        Ok(message?)
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut frame = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        frame.extend_from_slice(&nonce_bytes);
        frame.extend_from_slice(&ciphertext);
        Ok(frame)
    }

    fn open(&self, frame: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if frame.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::TruncatedFrame {
                expected: NONCE_SIZE + TAG_SIZE,
                actual: frame.len(),
            });
        }
        let (nonce_bytes, ciphertext) = frame.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);
        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
    }
}
