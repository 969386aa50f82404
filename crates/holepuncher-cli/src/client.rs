//! Holepuncher RPC client.
//!
//! One request envelope in, one reply envelope out. The encrypted request is
//! base64url-encoded into the path of a single HTTP GET:
//!
//! ```text
//! GET <server_address>/proto/<base64url(encrypted request)>
//! ```
//!
//! Reply classification:
//! - `2xx`: the body is an encrypted reply envelope.
//! - [`SOFT_ERROR_STATUS`]: the body is an encrypted reply envelope whose
//!   result carries an error payload. Decoded exactly like `2xx`.
//! - anything else: the body is plain text describing the failure.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use holepuncher_core::config::ProtobufClientSettings;
use holepuncher_crypto::{CryptoError, LocalKey, PeerKey, ProtoCodec};
use holepuncher_proto::v1::{Request, Response};

/// Timeout for a whole RPC, connection included.
pub const RPC_TIMEOUT: Duration = Duration::from_secs(150);

/// Non-2xx status the server uses for "valid envelope carrying an error".
pub const SOFT_ERROR_STATUS: StatusCode = StatusCode::IM_A_TEAPOT;

/// Fixed path segment in front of the encoded payload.
const PROTO_PATH: &str = "proto";

/// RPC client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request envelope carries no command")]
    EmptyRequest,

    #[error("Failed to encode request: {0}")]
    Encode(#[source] CryptoError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC failed with status {status}: {body}")]
    Rpc { status: u16, body: String },

    #[error("RPC return value could not be decoded: {0}")]
    Decode(#[source] CryptoError),
}

/// Request/reply channel to the orchestration server.
pub trait RpcTransport: Send + Sync {
    /// Send one request envelope and return the decoded reply envelope.
    fn do_request(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, ClientError>> + Send;
}

/// Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
pub fn install_crypto_provider() {
    // The `Err` case just means it was already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// HTTP client builder with the RPC timeout applied.
pub fn http_client_builder() -> reqwest::ClientBuilder {
    install_crypto_provider();
    reqwest::Client::builder().timeout(RPC_TIMEOUT)
}

/// HTTP transport for the holepuncher protocol.
#[derive(Debug)]
pub struct HolepuncherClient {
    http: reqwest::Client,
    codec: ProtoCodec,
    base_url: String,
}

impl HolepuncherClient {
    /// Create a client with the default HTTP configuration.
    pub fn new(server_address: &str, keys: &ProtobufClientSettings) -> Result<Self, ClientError> {
        let http = http_client_builder().build()?;
        Self::with_http_client(server_address, keys, http)
    }

    /// Create a client on top of an existing HTTP client.
    ///
    /// The HTTP client must be built after a TLS crypto provider is installed;
    /// start from [`http_client_builder`] to get that and the RPC timeout.
    pub fn with_http_client(
        server_address: &str,
        keys: &ProtobufClientSettings,
        http: reqwest::Client,
    ) -> Result<Self, ClientError> {
        if server_address.is_empty() {
            return Err(ClientError::Config(
                "runtime.server_address is empty or missing".into(),
            ));
        }
        if keys.private_key.is_empty() {
            return Err(ClientError::Config(
                "client_protobuf.private_key is empty or missing".into(),
            ));
        }
        if keys.peer_key.is_empty() {
            return Err(ClientError::Config(
                "client_protobuf.peer_key is empty or missing".into(),
            ));
        }

        let local = LocalKey::from_hex(&keys.private_key).map_err(|e| {
            ClientError::Config(format!("client_protobuf.private_key: invalid key: {e}"))
        })?;
        let peer = PeerKey::from_hex(&keys.peer_key).map_err(|e| {
            ClientError::Config(format!("client_protobuf.peer_key: invalid key: {e}"))
        })?;
        let codec = ProtoCodec::new(&local, &peer)
            .map_err(|e| ClientError::Config(format!("client_protobuf: {e}")))?;

        let base_url = server_address.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            codec,
            base_url,
        })
    }

    /// Build the request URL for an encoded payload.
    pub fn request_url(&self, payload: &[u8]) -> String {
        format!(
            "{}/{PROTO_PATH}/{}",
            self.base_url,
            URL_SAFE_NO_PAD.encode(payload)
        )
    }
}

impl RpcTransport for HolepuncherClient {
    async fn do_request(&self, request: &Request) -> Result<Response, ClientError> {
        let rpc = request.rpc_name();
        if request.r.is_none() {
            return Err(ClientError::EmptyRequest);
        }

        let payload = self.codec.encode(request).map_err(ClientError::Encode)?;
        let url = self.request_url(&payload);
        debug!(rpc, payload_bytes = payload.len(), "Sending RPC");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(rpc, status = status.as_u16(), body_bytes = body.len(), "RPC reply received");

        if !status.is_success() && status != SOFT_ERROR_STATUS {
            return Err(ClientError::Rpc {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        self.codec.decode(&body).map_err(ClientError::Decode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys() -> ProtobufClientSettings {
        let server = LocalKey::generate();
        ProtobufClientSettings {
            private_key: LocalKey::generate().secret_hex(),
            peer_key: server.public_key().to_hex(),
        }
    }

    fn http() -> reqwest::Client {
        http_client_builder().build().unwrap()
    }

    fn client(server_address: &str) -> HolepuncherClient {
        HolepuncherClient::with_http_client(server_address, &keys(), http()).unwrap()
    }

    #[test]
    fn empty_private_key_returns_config_error() {
        let mut keys = keys();
        keys.private_key.clear();
        let err = HolepuncherClient::with_http_client("http://hp", &keys, http()).unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("private_key")));
    }

    #[test]
    fn empty_peer_key_returns_config_error() {
        let mut keys = keys();
        keys.peer_key.clear();
        let err = HolepuncherClient::with_http_client("http://hp", &keys, http()).unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("peer_key")));
    }

    #[test]
    fn malformed_key_hex_returns_config_error() {
        let mut keys = keys();
        keys.peer_key = "zz-not-hex".into();
        let err = HolepuncherClient::with_http_client("http://hp", &keys, http()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn empty_server_address_returns_config_error() {
        let err = HolepuncherClient::with_http_client("", &keys(), http()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn request_url_inserts_single_separator() {
        let payload = [0xfb, 0xff, 0x01];
        let plain = client("https://hp.example.com").request_url(&payload);
        let slashed = client("https://hp.example.com/").request_url(&payload);
        assert_eq!(plain, "https://hp.example.com/proto/-_8B");
        assert_eq!(plain, slashed);
    }

    #[test]
    fn request_url_keeps_base_path() {
        let url = client("https://hp.example.com/api/").request_url(b"x");
        assert_eq!(url, "https://hp.example.com/api/proto/eA");
    }

    #[test]
    fn default_client_builds_with_crypto_provider() {
        HolepuncherClient::new("https://hp.example.com", &keys()).unwrap();
        // Installing again is a no-op.
        install_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[test]
    fn soft_error_status_is_not_a_success_code() {
        assert!(!SOFT_ERROR_STATUS.is_success());
    }
}
