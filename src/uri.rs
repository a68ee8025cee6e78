//! MSCT payment reference handling
//!
//! Scanned QR codes carry either a presentation request URL or an MSCT
//! payment reference, which is an `http(s)` URL pointing at the PSP. Payment
//! references are wrapped into an `msct://` URL whose `payload` query
//! parameter carries the percent-encoded reference; the presentation layer
//! later extracts the reference to hand it to the PSP.

use url::Url;

use crate::codec;
use crate::{MSCT_PAYLOAD_PARAM, MSCT_SCHEME};

/// Whether a scanned code is an MSCT payment reference rather than a
/// presentation request.
///
/// MSCT references are plain `http(s)` URLs; the scheme check is
/// case-insensitive.
pub fn is_msct_qr_code(code: &str) -> bool {
    let lower = code.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Turn a scanned code into the URL that drives the presentation.
///
/// MSCT payment references are wrapped as
/// `msct://?payload=<percent-encoded reference>`; anything else is parsed as
/// a URL directly. Returns `None` when parsing fails either way.
pub fn create_vp_url(code: &str) -> Option<Url> {
    if is_msct_qr_code(code) {
        let encoded = codec::percent_encode(code);
        match Url::parse(&format!("{}://?{}={}", MSCT_SCHEME, MSCT_PAYLOAD_PARAM, encoded)) {
            Ok(url) => {
                tracing::debug!("created VP URL for payment reference");
                Some(url)
            }
            Err(err) => {
                tracing::warn!("failed to build VP URL: {}", err);
                None
            }
        }
    } else {
        Url::parse(code).ok()
    }
}

/// Extract the MSCT payment reference from a VP URL.
///
/// Looks for the `payload` query parameter and percent-decodes its value
/// once. Returns `None` when the URL has no query, no `payload` parameter,
/// or the value is not well-formed percent-encoded UTF-8.
pub fn extract_msct_payload(url: &Url) -> Option<String> {
    let query = url.query()?;
    for param in query.split('&') {
        let mut parts = param.splitn(2, '=');
        let name = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        if name == MSCT_PAYLOAD_PARAM {
            return codec::percent_decode(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_msct_qr_code() {
        assert!(is_msct_qr_code("https://psp.example.com/pay/123"));
        assert!(is_msct_qr_code("http://psp.example.com/pay/123"));
        assert!(is_msct_qr_code("HTTP://PSP.EXAMPLE.COM/PAY"));
        assert!(!is_msct_qr_code("msct://?payload=abc"));
        assert!(!is_msct_qr_code("openid4vp://authorize?x=1"));
        assert!(!is_msct_qr_code(""));
        assert!(!is_msct_qr_code("ftp://files.example.com"));
    }

    #[test]
    fn test_create_vp_url_wraps_payment_references() {
        let url = create_vp_url("https://psp.example.com/pay/123").unwrap();
        assert_eq!(url.scheme(), MSCT_SCHEME);
        assert!(url
            .query()
            .unwrap()
            .starts_with("payload=https%3A%2F%2F"));
        assert_eq!(
            extract_msct_payload(&url).as_deref(),
            Some("https://psp.example.com/pay/123")
        );
    }

    #[test]
    fn test_create_vp_url_passes_other_urls_through() {
        let url = create_vp_url("openid4vp://authorize?request_uri=abc").unwrap();
        assert_eq!(url.scheme(), "openid4vp");

        let url = create_vp_url("msct://?payload=abc").unwrap();
        assert_eq!(extract_msct_payload(&url).as_deref(), Some("abc"));
    }

    #[test]
    fn test_create_vp_url_rejects_non_urls() {
        assert_eq!(create_vp_url("not a url"), None);
    }

    #[test]
    fn test_extract_requires_payload_param() {
        let url = Url::parse("msct://?other=1&more=2").unwrap();
        assert_eq!(extract_msct_payload(&url), None);

        let url = Url::parse("msct://host/path").unwrap();
        assert_eq!(extract_msct_payload(&url), None);
    }

    #[test]
    fn test_extract_decodes_exactly_once() {
        let url = Url::parse("msct://?payload=a%2520b").unwrap();
        assert_eq!(extract_msct_payload(&url).as_deref(), Some("a%20b"));
    }

    #[test]
    fn test_extract_finds_payload_among_other_params() {
        let url = Url::parse("msct://?first=1&payload=ref%2D9&last=2").unwrap();
        assert_eq!(extract_msct_payload(&url).as_deref(), Some("ref-9"));
    }
}
