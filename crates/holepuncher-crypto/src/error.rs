//! Crypto error types.

/// Errors from key parsing and payload encoding.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid key hex data: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),

    #[error("Frame too short: expected at least {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Message decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),
}
