//! Session wiring for one payment presentation
//!
//! [`PaymentSession`] owns the signer, context, and clients a single
//! presentation needs. Nothing here is process-global: each session carries
//! its own state, and dropping it drops the key material with it.

use url::Url;

use crate::context::PaymentContext;
use crate::error::SignerResult;
use crate::fetch::{Fetcher, FetcherConfig};
use crate::psp::PspMetadataClient;
use crate::signer::JwsSigner;
use crate::status::{PaymentStatusClient, PaymentStatusCode};

/// One presentation session's worth of payment services.
pub struct PaymentSession {
    signer: JwsSigner,
    context: PaymentContext,
    status: PaymentStatusClient,
    psp: PspMetadataClient,
}

impl PaymentSession {
    /// Create a session with default HTTP settings and a fresh signing key.
    pub fn new() -> SignerResult<Self> {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> SignerResult<Self> {
        let fetcher = Fetcher::with_config(&config);
        let mut context = PaymentContext::new();
        context.subscribe(|event| tracing::debug!("payment context: {:?}", event));
        Ok(Self {
            signer: JwsSigner::new()?,
            context,
            status: PaymentStatusClient::new(fetcher.clone()),
            psp: PspMetadataClient::new(fetcher),
        })
    }

    pub fn signer(&self) -> &JwsSigner {
        &self.signer
    }

    pub fn context(&self) -> &PaymentContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PaymentContext {
        &mut self.context
    }

    pub fn status_client(&self) -> &PaymentStatusClient {
        &self.status
    }

    pub fn psp_client(&self) -> &PspMetadataClient {
        &self.psp
    }

    /// Resolve the payment status endpoint for the selected credential and
    /// remember it in the context.
    ///
    /// Needs the context to hold the credential's PSP URL and scheme; warns
    /// and returns `None` when either is missing or the PSP does not
    /// advertise an endpoint for the scheme.
    pub async fn resolve_payment_status_uri(&mut self) -> Option<Url> {
        let psp_url = match self.context.selected_doc_psp_url() {
            Some(url) => url.clone(),
            None => {
                tracing::warn!("cannot resolve payment status endpoint: no PSP URL selected");
                return None;
            }
        };
        let scheme = match self.context.selected_doc_scheme() {
            Some(scheme) => scheme.to_string(),
            None => {
                tracing::warn!("cannot resolve payment status endpoint: no scheme selected");
                return None;
            }
        };

        let resolved = self.psp.resolve_payment_status_uri(&psp_url, &scheme).await?;
        self.context
            .set_selected_doc_payment_status_uri(Some(resolved.clone()));
        Some(resolved)
    }

    /// Poll the resolved status endpoint once.
    ///
    /// [`PaymentStatusCode::Unknown`] when no endpoint has been resolved for
    /// this session yet.
    pub async fn retrieve_current_status(&self) -> PaymentStatusCode {
        match self.context.selected_doc_payment_status_uri() {
            Some(uri) => self.status.retrieve_status(uri).await,
            None => {
                tracing::warn!("no payment status endpoint resolved for this session");
                PaymentStatusCode::Unknown
            }
        }
    }
}
