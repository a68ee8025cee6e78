//! Payment status codes and retrieval
//!
//! After a payment is initiated the PSP exposes its scheme status at a
//! polling endpoint. Codes follow the ISO 20022 transaction status
//! vocabulary; anything the wallet does not recognize collapses to
//! [`PaymentStatusCode::Unknown`] so polling loops never have to handle
//! wire-level surprises.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::Fetcher;

/// Scheme status of a payment, as reported by the PSP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatusCode {
    /// RCVD: received, awaiting strong customer authentication
    #[serde(rename = "RCVD")]
    Received,
    /// ACCP: technical validation and customer profile checks passed
    #[serde(rename = "ACCP")]
    AcceptedCustomerProfile,
    /// ACSP: sent by the bank, not yet settled on the creditor account
    #[serde(rename = "ACSP")]
    AcceptedSettlementInProgress,
    /// ACSC: sent and settled on the creditor account
    #[serde(rename = "ACSC")]
    AcceptedSettlementCompleted,
    /// NAUT: the payer cancelled the authorization
    #[serde(rename = "NAUT")]
    NotAuthorized,
    /// RJCT: rejected, for example for insufficient funds
    #[serde(rename = "RJCT")]
    Rejected,
    /// PDNG: the payment was edited and a new authentication is pending
    #[serde(rename = "PDNG")]
    Pending,
    /// CANC: deleted by the payer
    #[serde(rename = "CANC")]
    Cancelled,
    /// PRSY: initiation put on hold by the bank
    #[serde(rename = "PRSY")]
    OnHold,
    /// PATC: a second authorization is required
    #[serde(rename = "PATC")]
    PartiallyAccepted,
    /// Code missing, unrecognized, or the status fetch failed
    // serde requires the `other` fallback variant to be declared last
    #[default]
    #[serde(rename = "UNKN", other)]
    Unknown,
}

impl PaymentStatusCode {
    /// Map a wire code to a status. Matching is exact and case-sensitive;
    /// anything else is [`PaymentStatusCode::Unknown`].
    pub fn from_wire(code: &str) -> Self {
        match code {
            "RCVD" => PaymentStatusCode::Received,
            "ACCP" => PaymentStatusCode::AcceptedCustomerProfile,
            "ACSP" => PaymentStatusCode::AcceptedSettlementInProgress,
            "ACSC" => PaymentStatusCode::AcceptedSettlementCompleted,
            "NAUT" => PaymentStatusCode::NotAuthorized,
            "RJCT" => PaymentStatusCode::Rejected,
            "PDNG" => PaymentStatusCode::Pending,
            "CANC" => PaymentStatusCode::Cancelled,
            "PRSY" => PaymentStatusCode::OnHold,
            "PATC" => PaymentStatusCode::PartiallyAccepted,
            _ => PaymentStatusCode::Unknown,
        }
    }

    /// The four-letter scheme code for this status.
    pub fn wire_code(&self) -> &'static str {
        match self {
            PaymentStatusCode::Received => "RCVD",
            PaymentStatusCode::AcceptedCustomerProfile => "ACCP",
            PaymentStatusCode::AcceptedSettlementInProgress => "ACSP",
            PaymentStatusCode::AcceptedSettlementCompleted => "ACSC",
            PaymentStatusCode::NotAuthorized => "NAUT",
            PaymentStatusCode::Rejected => "RJCT",
            PaymentStatusCode::Pending => "PDNG",
            PaymentStatusCode::Cancelled => "CANC",
            PaymentStatusCode::OnHold => "PRSY",
            PaymentStatusCode::PartiallyAccepted => "PATC",
            PaymentStatusCode::Unknown => "UNKN",
        }
    }

    /// Whether polling can stop: the payment settled, or it will never
    /// settle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatusCode::AcceptedSettlementCompleted
                | PaymentStatusCode::Rejected
                | PaymentStatusCode::Cancelled
                | PaymentStatusCode::NotAuthorized
        )
    }
}

impl std::fmt::Display for PaymentStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_code())
    }
}

/// Body of the PSP status endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    /// Raw scheme status code, e.g. `"ACSC"`.
    #[serde(rename = "status-code")]
    pub status_code: String,
}

/// Source of payment status, abstracted for test doubles.
#[async_trait]
pub trait PaymentStatusService: Send + Sync {
    async fn retrieve_status(&self, status_url: &Url) -> PaymentStatusCode;
}

/// Polls a PSP status endpoint.
///
/// A single shot per call: no retry or backoff here, the caller drives the
/// polling loop and decides when [`PaymentStatusCode::is_terminal`] ends it.
#[derive(Clone)]
pub struct PaymentStatusClient {
    fetcher: Fetcher,
}

impl PaymentStatusClient {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch the current status once.
    ///
    /// Network failures, non-success responses, and undecodable bodies all
    /// come back as [`PaymentStatusCode::Unknown`]; the polling loop treats
    /// them as "not settled yet".
    pub async fn retrieve_status(&self, status_url: &Url) -> PaymentStatusCode {
        match self.fetcher.fetch_json::<PaymentStatusResponse>(status_url).await {
            Ok(response) => {
                let status = PaymentStatusCode::from_wire(&response.status_code);
                tracing::debug!("payment status at {}: {}", status_url, status);
                status
            }
            Err(err) => {
                tracing::warn!("payment status fetch failed: {}", err);
                PaymentStatusCode::Unknown
            }
        }
    }
}

#[async_trait]
impl PaymentStatusService for PaymentStatusClient {
    async fn retrieve_status(&self, status_url: &Url) -> PaymentStatusCode {
        PaymentStatusClient::retrieve_status(self, status_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PaymentStatusCode; 11] = [
        PaymentStatusCode::Received,
        PaymentStatusCode::AcceptedCustomerProfile,
        PaymentStatusCode::AcceptedSettlementInProgress,
        PaymentStatusCode::AcceptedSettlementCompleted,
        PaymentStatusCode::NotAuthorized,
        PaymentStatusCode::Rejected,
        PaymentStatusCode::Pending,
        PaymentStatusCode::Cancelled,
        PaymentStatusCode::OnHold,
        PaymentStatusCode::PartiallyAccepted,
        PaymentStatusCode::Unknown,
    ];

    #[test]
    fn test_wire_codes_round_trip() {
        for status in ALL {
            assert_eq!(PaymentStatusCode::from_wire(status.wire_code()), status);
            assert_eq!(status.to_string(), status.wire_code());
        }
    }

    #[test]
    fn test_unrecognized_codes_collapse_to_unknown() {
        for code in ["", "XXXX", "acsc", "ACSC ", "RCVD1"] {
            assert_eq!(
                PaymentStatusCode::from_wire(code),
                PaymentStatusCode::Unknown
            );
        }
    }

    #[test]
    fn test_exactly_four_terminal_states() {
        let terminal: Vec<PaymentStatusCode> =
            ALL.into_iter().filter(PaymentStatusCode::is_terminal).collect();
        assert_eq!(
            terminal,
            vec![
                PaymentStatusCode::AcceptedSettlementCompleted,
                PaymentStatusCode::NotAuthorized,
                PaymentStatusCode::Rejected,
                PaymentStatusCode::Cancelled,
            ]
        );
    }

    #[test]
    fn test_response_decoding() {
        let response: PaymentStatusResponse =
            serde_json::from_str(r#"{"status-code":"RCVD"}"#).unwrap();
        assert_eq!(response.status_code, "RCVD");
        assert_eq!(
            PaymentStatusCode::from_wire(&response.status_code),
            PaymentStatusCode::Received
        );
    }

    #[test]
    fn test_serde_representation() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.wire_code()));
            let back: PaymentStatusCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_serde_falls_back_to_unknown() {
        // Unrecognized wire codes absorb the same way from_wire does
        for json in ["\"ZZZZ\"", "\"acsc\"", "\"\""] {
            let status: PaymentStatusCode = serde_json::from_str(json).unwrap();
            assert_eq!(status, PaymentStatusCode::Unknown);
        }
        assert_eq!(PaymentStatusCode::default(), PaymentStatusCode::Unknown);
    }
}
