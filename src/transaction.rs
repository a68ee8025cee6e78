//! Transaction data carried in MSCT presentation requests
//!
//! Verifiers attach transaction data as a list of base64url tokens; each token
//! wraps a JSON object describing the payment to authorize. Only the first
//! token describes the payment itself, the rest are auxiliary records, so
//! parsing reads index 0 and nothing else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec;

/// Payment description decoded from the first transaction-data token.
///
/// Every field is optional: verifiers populate what their scheme needs and
/// omit the rest. Unknown fields are ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Scheme-level payment identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Creditor account identifiers keyed by kind (IBAN, BIC, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor_account: Option<HashMap<String, String>>,
    /// Amount to transfer, as the scheme formatted it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructed_amount: Option<String>,
    /// ISO 4217 currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Payee display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor_name: Option<String>,
    /// Payee logo location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor_logo: Option<Url>,
    /// Free-text payment purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Transaction-data type identifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Credentials the verifier asks to be presented alongside the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_ids: Option<Vec<String>>,
    /// Hash algorithms the verifier accepts for transaction-data hashes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_data_hashes_alg: Option<Vec<String>>,
}

/// One row of the payment approval sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Stable row identifier from the approval-sheet contract
    pub id: &'static str,
    /// Whether the row starts out selected for disclosure
    pub selected: bool,
    /// Human-readable field title
    pub title: String,
    /// Field value exactly as received
    pub value: String,
}

impl DisplayRow {
    fn new(id: &'static str, field: &str, value: &str) -> Self {
        Self {
            id,
            selected: true,
            title: codec::titleize(field),
            value: value.to_string(),
        }
    }
}

impl TransactionData {
    /// Decode the first transaction-data token into a [`TransactionData`].
    ///
    /// Returns `None` when no tokens are present, when the first token is not
    /// base64url-wrapped UTF-8, or when the JSON inside does not parse.
    pub fn parse_first(tokens: Option<&[String]>) -> Option<Self> {
        let token = tokens?.first()?;
        let json = match codec::base64url_decode_string(token) {
            Some(json) => json,
            None => {
                tracing::warn!("transaction data token is not valid base64url text");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!("transaction data token is not valid JSON: {}", err);
                None
            }
        }
    }

    /// Project the displayable payment fields into approval-sheet rows.
    ///
    /// Row ids and ordering follow the approval-sheet contract; absent fields
    /// are skipped rather than rendered empty.
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        let mut rows = Vec::new();
        if let Some(amount) = &self.instructed_amount {
            rows.push(DisplayRow::new("3", "instructed_amount", amount));
        }
        if let Some(currency) = &self.currency {
            rows.push(DisplayRow::new("4", "currency", currency));
        }
        if let Some(name) = &self.creditor_name {
            rows.push(DisplayRow::new("5", "creditor_name", name));
        }
        if let Some(purpose) = &self.purpose {
            rows.push(DisplayRow::new("6", "purpose", purpose));
        }
        rows
    }
}
