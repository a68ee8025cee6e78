//! JWS creation over P-256
//!
//! Presentation responses are signed as compact JWS with ES256. Signing is
//! deterministic (RFC 6979), so equal claims under the same key always yield
//! the same compact serialization. HMAC algorithm identifiers are modeled so
//! callers can name them in protocol metadata, but signing with one is
//! refused: a shared-MAC response would let the verifier forge wallet
//! signatures.

use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec;
use crate::error::{SignerError, SignerResult};

/// JOSE signature algorithm identifiers this subsystem understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// ECDSA over P-256 with SHA-256
    #[default]
    #[serde(rename = "ES256")]
    Es256,
    /// HMAC with SHA-256
    #[serde(rename = "HS256")]
    Hs256,
    /// HMAC with SHA-384
    #[serde(rename = "HS384")]
    Hs384,
    /// HMAC with SHA-512
    #[serde(rename = "HS512")]
    Hs512,
}

impl SignatureAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Es256 => "ES256",
            SignatureAlgorithm::Hs256 => "HS256",
            SignatureAlgorithm::Hs384 => "HS384",
            SignatureAlgorithm::Hs512 => "HS512",
        }
    }

    /// Whether the algorithm is a shared-key MAC rather than a signature.
    pub fn is_mac(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::Hs256 | SignatureAlgorithm::Hs384 | SignatureAlgorithm::Hs512
        )
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

enum KeySource {
    Generate,
    Raw(Vec<u8>),
}

/// Builder for [`JwsSigner`].
#[derive(Default)]
pub struct JwsSignerBuilder {
    algorithm: SignatureAlgorithm,
    key: Option<KeySource>,
}

impl JwsSignerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the algorithm advertised in the JWS header.
    pub fn algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Generate a fresh P-256 key from the system RNG at build time.
    pub fn generate_key(mut self) -> Self {
        self.key = Some(KeySource::Generate);
        self
    }

    /// Use an existing key, given as the raw 32-byte P-256 scalar.
    pub fn key_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.key = Some(KeySource::Raw(bytes.as_ref().to_vec()));
        self
    }

    pub fn build(self) -> SignerResult<JwsSigner> {
        let signing_key = match self.key.ok_or(SignerError::MissingKey)? {
            KeySource::Generate => SigningKey::random(&mut OsRng),
            KeySource::Raw(bytes) => SigningKey::from_slice(&bytes)
                .map_err(|e| SignerError::InvalidKey(e.to_string()))?,
        };
        Ok(JwsSigner {
            algorithm: self.algorithm,
            signing_key,
        })
    }
}

/// Signs presentation-response claims as compact JWS.
pub struct JwsSigner {
    algorithm: SignatureAlgorithm,
    signing_key: SigningKey,
}

impl JwsSigner {
    /// Create a signer with a freshly generated P-256 key and ES256.
    pub fn new() -> SignerResult<Self> {
        Self::builder().generate_key().build()
    }

    pub fn builder() -> JwsSignerBuilder {
        JwsSignerBuilder::new()
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Public half of the signing key, for sharing with verifiers.
    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// Sign the claims as a JWS.
    ///
    /// The payload is the claims serialized with sorted keys, so equal claim
    /// maps sign identically regardless of insertion order. Fails with
    /// [`SignerError::MacAlgorithm`] when the signer was configured with an
    /// HMAC identifier.
    pub fn create_jws(&self, claims: &Map<String, Value>) -> SignerResult<Jws> {
        if self.algorithm.is_mac() {
            return Err(SignerError::MacAlgorithm(self.algorithm));
        }

        let header = serde_json::to_vec(&serde_json::json!({ "alg": self.algorithm.as_str() }))?;
        let payload = codec::canonical_json(claims)?;

        let signing_input = format!(
            "{}.{}",
            codec::base64url_encode(&header),
            codec::base64url_encode(&payload)
        );
        let signature: Signature = self
            .signing_key
            .try_sign(signing_input.as_bytes())
            .map_err(|e| SignerError::Signature(e.to_string()))?;

        Ok(Jws {
            header,
            payload,
            signature: signature.to_bytes().to_vec(),
        })
    }
}

/// A detached JWS: header and payload bytes plus the raw `r || s` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jws {
    header: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl Jws {
    /// Protected header JSON bytes.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Claims JSON bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Raw 64-byte `r || s` ECDSA signature.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The signed portion: `base64url(header) . base64url(payload)`.
    pub fn signing_input(&self) -> String {
        format!(
            "{}.{}",
            codec::base64url_encode(&self.header),
            codec::base64url_encode(&self.payload)
        )
    }

    /// Compact serialization: `header . payload . signature`.
    pub fn compact(&self) -> String {
        format!(
            "{}.{}",
            self.signing_input(),
            codec::base64url_encode(&self.signature)
        )
    }

    /// Check the signature against a P-256 public key.
    pub fn verify(&self, verifying_key: &VerifyingKey) -> SignerResult<()> {
        let signature = Signature::from_slice(&self.signature)
            .map_err(|e| SignerError::Signature(e.to_string()))?;
        verifying_key
            .verify(self.signing_input().as_bytes(), &signature)
            .map_err(|e| SignerError::Signature(e.to_string()))
    }
}
