//! Error types for the payment subsystem

use thiserror::Error;
use url::Url;

use crate::signer::SignatureAlgorithm;

/// Result type for signing operations
pub type SignerResult<T> = Result<T, SignerError>;

/// Errors from the PSP-facing HTTP boundary.
///
/// These never escape the crate's public flow operations: status polling
/// collapses them to [`PaymentStatusCode::Unknown`](crate::PaymentStatusCode)
/// and metadata resolution collapses them to `None`, with the cause logged.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request could not be sent or the connection failed
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Endpoint answered outside the 2xx window
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: Url },

    /// Body was not the expected shape
    #[error("response decoding failed: {0}")]
    Decode(String),
}

/// Errors from JWS construction and signing.
///
/// Unlike [`FetchError`] these are never absorbed. They indicate signer
/// misconfiguration or unserializable input, and retrying cannot fix them.
#[derive(Error, Debug)]
pub enum SignerError {
    /// Builder finished without a key source
    #[error("no signing key configured")]
    MissingKey,

    /// Key material is not a usable P-256 private key
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// MAC algorithms are refused for wallet-held keys
    #[error("refusing to sign with MAC algorithm {0}")]
    MacAlgorithm(SignatureAlgorithm),

    /// Claims could not be serialized to canonical JSON
    #[error("payload not serializable: {0}")]
    Payload(#[from] serde_json::Error),

    /// ECDSA signing or verification failed
    #[error("signature failure: {0}")]
    Signature(String),
}
