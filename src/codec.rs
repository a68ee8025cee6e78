//! Encoding primitives shared across the payment flow
//!
//! MSCT endpoints speak base64url without padding, but older PSPs still emit
//! padded tokens, so decoding accepts both. Percent-encoding uses the host
//! charset (RFC 3986 unreserved plus sub-delims), which is what MSCT payment
//! references are wrapped with before they ride in a query parameter.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Standard-alphabet engine that takes padded and unpadded input alike.
const STANDARD_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Characters percent-encoded when wrapping a payment reference: everything
/// outside RFC 3986 unreserved and sub-delims.
const HOST_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode bytes as unpadded base64url.
pub fn base64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url string, tolerating missing padding.
///
/// The URL-safe alphabet is translated to the standard one first, so tokens
/// using either alphabet decode. Returns `None` on malformed input.
pub fn base64url_decode(input: &str) -> Option<Vec<u8>> {
    let mut translated = input.replace('-', "+").replace('_', "/");
    while translated.len() % 4 != 0 {
        translated.push('=');
    }
    STANDARD_INDIFFERENT.decode(translated).ok()
}

/// Decode a base64url string into UTF-8 text.
pub fn base64url_decode_string(input: &str) -> Option<String> {
    String::from_utf8(base64url_decode(input)?).ok()
}

/// SHA-256 digest of `bytes`.
pub fn sha256(bytes: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Percent-encode a string with the host-safe charset.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, HOST_SAFE).to_string()
}

/// Percent-decode a query-parameter value. `None` when a `%` is not
/// followed by two hex digits or the decoded bytes are not valid UTF-8.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'%' {
            let complete = bytes.get(i + 1).map_or(false, |b| b.is_ascii_hexdigit())
                && bytes.get(i + 2).map_or(false, |b| b.is_ascii_hexdigit());
            if !complete {
                return None;
            }
        }
    }
    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Serialize a JSON object to its canonical byte form.
///
/// `serde_json` object maps iterate in sorted key order, so the same set of
/// claims always serializes to the same bytes. Signing inputs depend on this.
pub fn canonical_json(object: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(object)
}

/// Turn a snake_case field name into a display title: underscores become
/// spaces and each word is capitalized.
pub fn titleize(input: &str) -> String {
    input
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64url_known_vectors() {
        assert_eq!(base64url_encode(b"{\"a\":1}"), "eyJhIjoxfQ");
        assert_eq!(base64url_decode_string("eyJhIjoxfQ").as_deref(), Some("{\"a\":1}"));
        // Padded input decodes to the same bytes
        assert_eq!(base64url_decode_string("eyJhIjoxfQ==").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_base64url_alphabet_translation() {
        assert_eq!(base64url_encode([0xff, 0xff, 0xff]), "____");
        assert_eq!(base64url_decode("____"), Some(vec![0xff, 0xff, 0xff]));
        // Standard-alphabet input is accepted as well
        assert_eq!(base64url_decode("////"), Some(vec![0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_base64url_rejects_malformed_input() {
        assert_eq!(base64url_decode("!!!"), None);
        assert_eq!(base64url_decode("a"), None);
        // Valid base64 but not UTF-8
        let encoded = base64url_encode([0xff, 0xfe]);
        assert!(base64url_decode(&encoded).is_some());
        assert_eq!(base64url_decode_string(&encoded), None);
    }

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            hex::encode(sha256("abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_percent_encode_host_charset() {
        // Reserved separators are encoded, sub-delims are not
        assert_eq!(
            percent_encode("https://psp.example.com/pay"),
            "https%3A%2F%2Fpsp.example.com%2Fpay"
        );
        assert_eq!(percent_encode("a=b&c!d"), "a=b&c!d");
        assert_eq!(percent_encode("spaced out"), "spaced%20out");
    }

    #[test]
    fn test_percent_decode_is_single_pass() {
        // A doubly-encoded escape decodes exactly one level
        assert_eq!(percent_decode("a%2520b").as_deref(), Some("a%20b"));
        assert_eq!(percent_decode("a%20b").as_deref(), Some("a b"));
    }

    #[test]
    fn test_percent_decode_rejects_malformed_escapes() {
        assert_eq!(percent_decode("a%ZZb"), None);
        assert_eq!(percent_decode("100%"), None);
        assert_eq!(percent_decode("a%2"), None);
        assert_eq!(percent_decode("%%41"), None);
        // Well-formed escapes that decode to invalid UTF-8 are also rejected
        assert_eq!(percent_decode("%FF"), None);
        assert_eq!(percent_decode("%41").as_deref(), Some("A"));
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let mut first = Map::new();
        first.insert("b".to_string(), Value::from(1));
        first.insert("a".to_string(), Value::from(2));

        let mut second = Map::new();
        second.insert("a".to_string(), Value::from(2));
        second.insert("b".to_string(), Value::from(1));

        let bytes = canonical_json(&first).unwrap();
        assert_eq!(bytes, canonical_json(&second).unwrap());
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("instructed_amount"), "Instructed Amount");
        assert_eq!(titleize("currency"), "Currency");
        assert_eq!(titleize("creditor_name"), "Creditor Name");
        assert_eq!(titleize("IBAN"), "Iban");
        assert_eq!(titleize(""), "");
    }

    proptest! {
        #[test]
        fn prop_base64url_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = base64url_encode(&bytes);
            prop_assert!(!encoded.contains('='));
            prop_assert!(!encoded.contains('+'));
            prop_assert!(!encoded.contains('/'));
            prop_assert_eq!(base64url_decode(&encoded), Some(bytes));
        }

        #[test]
        fn prop_percent_roundtrip(s in "\\PC*") {
            let encoded = percent_encode(&s);
            prop_assert_eq!(percent_decode(&encoded), Some(s));
        }
    }
}
