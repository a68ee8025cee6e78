//! PSP metadata discovery
//!
//! A payment credential names its PSP by URL. The PSP serves a metadata
//! document describing, per payment scheme, where to reach its endpoints;
//! the wallet reads it to find the payment status endpoint for the scheme
//! the selected credential belongs to.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::Fetcher;

/// Per-scheme endpoints advertised by a PSP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeMetadata {
    /// Display name of the scheme
    pub name: String,
    /// Endpoint for polling payment status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status_uri: Option<Url>,
    /// Endpoint accepting MSCT payment references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msct_uri: Option<Url>,
}

/// PSP metadata document, keyed by scheme identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PspMetadata {
    pub schemes: HashMap<String, SchemeMetadata>,
}

impl PspMetadata {
    /// The payment status endpoint for a scheme, if the PSP advertises one.
    pub fn payment_status_uri(&self, scheme: &str) -> Option<&Url> {
        self.schemes
            .get(scheme)
            .and_then(|meta| meta.payment_status_uri.as_ref())
    }
}

/// Fetches and interprets PSP metadata documents.
#[derive(Clone)]
pub struct PspMetadataClient {
    fetcher: Fetcher,
}

impl PspMetadataClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch the metadata document from a PSP.
    ///
    /// Returns `None` on any fetch or decode failure; metadata is advisory
    /// and the flow degrades rather than aborts without it.
    pub async fn fetch_metadata(&self, psp_url: &Url) -> Option<PspMetadata> {
        match self.fetcher.fetch_json::<PspMetadata>(psp_url).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::warn!("PSP metadata fetch from {} failed: {}", psp_url, err);
                None
            }
        }
    }

    /// Resolve the payment status endpoint for a scheme via the PSP's
    /// metadata.
    pub async fn resolve_payment_status_uri(&self, psp_url: &Url, scheme: &str) -> Option<Url> {
        let metadata = self.fetch_metadata(psp_url).await?;
        match metadata.payment_status_uri(scheme) {
            Some(uri) => Some(uri.clone()),
            None => {
                tracing::warn!(
                    "PSP at {} advertises no payment status endpoint for scheme {}",
                    psp_url,
                    scheme
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_metadata() -> PspMetadata {
        serde_json::from_value(json!({
            "schemes": {
                "sct-inst": {
                    "name": "SEPA Instant Credit Transfer",
                    "payment_status_uri": "https://psp.example.com/status",
                    "msct_uri": "https://psp.example.com/msct"
                },
                "bare": {
                    "name": "No Endpoints"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_payment_status_uri_lookup() {
        let metadata = sample_metadata();
        assert_eq!(
            metadata.payment_status_uri("sct-inst").map(Url::as_str),
            Some("https://psp.example.com/status")
        );
        // Scheme present but without a status endpoint
        assert_eq!(metadata.payment_status_uri("bare"), None);
        assert_eq!(metadata.payment_status_uri("missing"), None);
    }

    #[test]
    fn test_metadata_tolerates_unknown_fields() {
        let metadata: PspMetadata = serde_json::from_value(json!({
            "schemes": {
                "sct-inst": {
                    "name": "SEPA Instant Credit Transfer",
                    "payment_status_uri": "https://psp.example.com/status",
                    "issuer_hint": "ignored"
                }
            },
            "version": 2
        }))
        .unwrap();
        assert!(metadata.payment_status_uri("sct-inst").is_some());
    }
}
