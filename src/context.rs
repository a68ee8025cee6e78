//! Presentation-scoped payment state
//!
//! A [`PaymentContext`] carries the payment-relevant selections of one
//! credential presentation: which document was picked, the verifier's
//! transaction-data tokens, and the transaction the flow produced. Observers
//! are notified on every mutation so UI layers can follow along without
//! polling.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec;
use crate::status::PaymentStatusCode;

type Observer = Box<dyn Fn(&ContextEvent) + Send>;

/// Context field touched by a [`ContextEvent::FieldSet`] notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextField {
    DocId,
    DocIconUri,
    PaymentStatusUri,
    DocScheme,
    PspUrl,
    TransactionDataTokens,
    PaymentTransaction,
}

/// Notification emitted by [`PaymentContext`] on mutation.
///
/// `FieldSet` values are rendered to strings so observers stay decoupled from
/// the field types; `Reset` marks the wholesale clear at presentation end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEvent {
    FieldSet {
        field: ContextField,
        value: Option<String>,
    },
    Reset,
}

/// Outcome of a payment presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentTransaction {
    /// The PSP accepted the presentation and the payment is in flight.
    Initiated {
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        redirect_uri: Option<Url>,
    },
    /// Polling reached a terminal scheme status.
    Finalized { status: PaymentStatusCode },
}

/// Mutable state for one payment presentation.
#[derive(Default)]
pub struct PaymentContext {
    selected_doc_id: Option<String>,
    selected_doc_icon_uri: Option<Url>,
    selected_doc_payment_status_uri: Option<Url>,
    selected_doc_scheme: Option<String>,
    selected_doc_psp_url: Option<Url>,
    transaction_data_tokens: Option<Vec<String>>,
    payment_transaction: Option<PaymentTransaction>,
    observers: Vec<Observer>,
}

impl PaymentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer invoked on every context mutation.
    pub fn subscribe(&mut self, observer: impl Fn(&ContextEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self, event: &ContextEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }

    pub fn selected_doc_id(&self) -> Option<&str> {
        self.selected_doc_id.as_deref()
    }

    pub fn set_selected_doc_id(&mut self, id: Option<String>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::DocId,
            value: id.clone(),
        };
        self.selected_doc_id = id;
        self.notify(&event);
    }

    pub fn selected_doc_icon_uri(&self) -> Option<&Url> {
        self.selected_doc_icon_uri.as_ref()
    }

    pub fn set_selected_doc_icon_uri(&mut self, uri: Option<Url>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::DocIconUri,
            value: uri.as_ref().map(|u| u.to_string()),
        };
        self.selected_doc_icon_uri = uri;
        self.notify(&event);
    }

    pub fn selected_doc_payment_status_uri(&self) -> Option<&Url> {
        self.selected_doc_payment_status_uri.as_ref()
    }

    pub fn set_selected_doc_payment_status_uri(&mut self, uri: Option<Url>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::PaymentStatusUri,
            value: uri.as_ref().map(|u| u.to_string()),
        };
        self.selected_doc_payment_status_uri = uri;
        self.notify(&event);
    }

    pub fn selected_doc_scheme(&self) -> Option<&str> {
        self.selected_doc_scheme.as_deref()
    }

    pub fn set_selected_doc_scheme(&mut self, scheme: Option<String>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::DocScheme,
            value: scheme.clone(),
        };
        self.selected_doc_scheme = scheme;
        self.notify(&event);
    }

    pub fn selected_doc_psp_url(&self) -> Option<&Url> {
        self.selected_doc_psp_url.as_ref()
    }

    pub fn set_selected_doc_psp_url(&mut self, url: Option<Url>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::PspUrl,
            value: url.as_ref().map(|u| u.to_string()),
        };
        self.selected_doc_psp_url = url;
        self.notify(&event);
    }

    pub fn transaction_data_tokens(&self) -> Option<&[String]> {
        self.transaction_data_tokens.as_deref()
    }

    pub fn set_transaction_data_tokens(&mut self, tokens: Option<Vec<String>>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::TransactionDataTokens,
            value: tokens.as_ref().map(|t| t.join(",")),
        };
        self.transaction_data_tokens = tokens;
        self.notify(&event);
    }

    pub fn payment_transaction(&self) -> Option<&PaymentTransaction> {
        self.payment_transaction.as_ref()
    }

    pub fn set_payment_transaction(&mut self, transaction: Option<PaymentTransaction>) {
        let event = ContextEvent::FieldSet {
            field: ContextField::PaymentTransaction,
            value: transaction.as_ref().map(|t| format!("{:?}", t)),
        };
        self.payment_transaction = transaction;
        self.notify(&event);
    }

    /// Whether the current presentation is a payment flow.
    ///
    /// True exactly while transaction-data tokens are set, including an empty
    /// token list.
    pub fn is_payment_flow(&self) -> bool {
        self.transaction_data_tokens.is_some()
    }

    /// Hashes of the transaction-data tokens for inclusion in the response.
    ///
    /// Hashes are taken over the raw base64url token strings, not the decoded
    /// JSON, and recomputed on every call so they always reflect the current
    /// tokens. Returned in token order as base64url-encoded SHA-256 digests.
    pub fn transaction_data_hashes(&self) -> Option<Vec<String>> {
        self.transaction_data_tokens.as_ref().map(|tokens| {
            tokens
                .iter()
                .map(|token| codec::base64url_encode(codec::sha256(token.as_bytes())))
                .collect()
        })
    }

    /// Clear all presentation state and notify observers once.
    ///
    /// Safe to call repeatedly; every call emits a single `Reset` event.
    pub fn reset_presentation_state(&mut self) {
        self.selected_doc_id = None;
        self.selected_doc_icon_uri = None;
        self.selected_doc_payment_status_uri = None;
        self.selected_doc_scheme = None;
        self.selected_doc_psp_url = None;
        self.transaction_data_tokens = None;
        self.payment_transaction = None;
        self.notify(&ContextEvent::Reset);
    }
}
