//! MSCT payment presentation for digital wallets.
//!
//! This crate implements the payment side of a credential presentation flow
//! for Mobile-initiated SEPA (Instant) Credit Transfers. A wallet scans a
//! QR code carrying a payment reference, presents the payment details to the
//! user, signs the approval as a JWS, and polls the PSP for the payment's
//! scheme status.
//!
//! The flow, end to end:
//!
//! 1. Classify the scanned code and wrap payment references into a VP URL
//!    ([`create_vp_url`]), later recovering the reference with
//!    [`extract_msct_payload`].
//! 2. Decode the verifier's transaction-data tokens into payment details
//!    ([`TransactionData`]) and render them as approval-sheet rows.
//! 3. Track per-presentation state in a [`PaymentContext`], including the
//!    SHA-256 hashes of the raw tokens that go back to the verifier.
//! 4. Sign the presentation response with ES256 ([`JwsSigner`]).
//! 5. Discover the PSP's status endpoint ([`PspMetadataClient`]) and poll it
//!    ([`PaymentStatusClient`]) until a terminal [`PaymentStatusCode`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use msct_payment::{create_vp_url, extract_msct_payload, PaymentSession};
//!
//! let mut session = PaymentSession::new()?;
//!
//! // Scanned QR code -> VP URL -> payment reference for the PSP
//! let vp_url = create_vp_url("https://psp.example.com/pay/123").unwrap();
//! let reference = extract_msct_payload(&vp_url).unwrap();
//!
//! // Select a credential, then resolve and poll its status endpoint
//! session.context_mut().set_selected_doc_scheme(Some("sct-inst".into()));
//! session.context_mut().set_selected_doc_psp_url(Some(psp_url));
//! session.resolve_payment_status_uri().await;
//! loop {
//!     let status = session.retrieve_current_status().await;
//!     if status.is_terminal() {
//!         break;
//!     }
//! }
//! ```
//!
//! Wire formats follow the MSCT interoperability guidance: transaction-data
//! tokens are base64url-wrapped JSON, token hashes are base64url SHA-256
//! digests of the raw token strings, and status codes use the ISO 20022
//! four-letter vocabulary.

pub mod codec;
pub mod context;
pub mod error;
pub mod fetch;
pub mod psp;
pub mod session;
pub mod signer;
pub mod status;
pub mod transaction;
pub mod uri;

pub use codec::{
    base64url_decode, base64url_decode_string, base64url_encode, canonical_json, percent_decode,
    percent_encode, sha256, titleize,
};
pub use context::{ContextEvent, ContextField, PaymentContext, PaymentTransaction};
pub use error::{FetchError, SignerError, SignerResult};
pub use fetch::{Fetcher, FetcherConfig};
pub use psp::{PspMetadata, PspMetadataClient, SchemeMetadata};
pub use session::PaymentSession;
pub use signer::{Jws, JwsSigner, JwsSignerBuilder, SignatureAlgorithm};
pub use status::{
    PaymentStatusClient, PaymentStatusCode, PaymentStatusResponse, PaymentStatusService,
};
pub use transaction::{DisplayRow, TransactionData};
pub use uri::{create_vp_url, extract_msct_payload, is_msct_qr_code};

/// URL scheme of wrapped MSCT payment references.
pub const MSCT_SCHEME: &str = "msct";

/// Query parameter carrying the percent-encoded payment reference.
pub const MSCT_PAYLOAD_PARAM: &str = "payload";

/// Hash algorithm identifier for transaction-data hashes, as named in
/// `transaction_data_hashes_alg`.
pub const TRANSACTION_DATA_HASH_ALG: &str = "sha-256";
