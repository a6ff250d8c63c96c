//! The `web+stellar:` request URI entity.
//!
//! A [`Sep7Uri`] is an immutable value object wrapping one parsed request
//! URI: the operation path, an ordered query-parameter list, and the derived
//! protocol fields (callback, origin domain, message, network passphrase,
//! signature). Every "mutation" (signing, replacement application) produces a
//! new value and leaves the original untouched.
//!
//! # Example
//!
//! ```
//! use sep7_lib::Sep7Uri;
//!
//! let uri = Sep7Uri::parse("web+stellar:pay?destination=GABC&msg=lunch%20money").unwrap();
//! assert_eq!(uri.operation(), "pay");
//! assert_eq!(uri.msg(), Some("lunch money"));
//! assert!(uri.is_public_network());
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{percent_decode_str, percent_encode_byte};

use crate::traits::{DomainResolver, RequestSigner, SignatureVerifier};
use crate::{
    Result, Sep7Error, PUBLIC_NETWORK_PASSPHRASE, SCHEME, TESTNET_NETWORK_PASSPHRASE,
};

/// Leading tag of every signature payload. The 35 zero bytes and the
/// one-byte discriminator 4 in front of it make the payload
/// envelope-shaped, so a keypair that signs both transactions and request
/// URIs can never be tricked into cross-protocol signature reuse.
const SIGNATURE_PAYLOAD_TAG: &str = "stellar.sep.7 - URI Scheme";
const SIGNATURE_PAYLOAD_PREFIX_LEN: usize = 35;
const SIGNATURE_PAYLOAD_DISCRIMINANT: u8 = 4;

/// Percent-encode one query component the way serialization always does.
///
/// Unreserved bytes pass through, space becomes `+`, everything else is
/// `%XX`. Signature-payload construction relies on this being the one and
/// only encoding the crate produces.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(percent_encode_byte(byte)),
        }
    }
    out
}

/// Decode one query component. `+` means space; invalid UTF-8 is replaced
/// rather than rejected, matching how browsers treat query strings.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Ordered query-parameter list.
///
/// Keys are case-sensitive, insertion order is preserved for serialization,
/// and setting an existing key updates its value in place (last write wins,
/// first position kept).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct QueryParams {
    entries: Vec<(String, String)>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((key, value)) => params.set(decode_component(key), decode_component(value)),
                None => params.set(decode_component(pair), String::new()),
            }
        }
        params
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter().position(|(key, _)| *key == name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    fn remove(&mut self, name: &str) {
        self.entries.retain(|(key, _)| key != name);
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn serialize(&self) -> String {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect();
        pairs.join("&")
    }
}

/// A parsed `web+stellar:` request URI.
///
/// This is the base entity shared by every operation; it accepts arbitrary
/// operation paths so that unrecognized requests still round-trip. Use
/// [`crate::parse_sep7_uri`] to dispatch into the typed `pay`/`tx` requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sep7Uri {
    operation: String,
    params: QueryParams,
}

impl Sep7Uri {
    /// Parse a request URI.
    ///
    /// Fails with [`Sep7Error::InvalidScheme`] unless the candidate carries
    /// the `web+stellar:` scheme. The operation path is not validated here.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| Sep7Error::InvalidScheme(input.to_string()))?;
        let (operation, query) = match rest.split_once('?') {
            Some((operation, query)) => (operation, query),
            None => (rest, ""),
        };
        Ok(Self {
            operation: operation.to_string(),
            params: QueryParams::parse(query),
        })
    }

    /// Assemble an entity from an operation path and decoded parameters.
    ///
    /// Duplicate keys collapse with the last value winning, like parsing.
    pub(crate) fn from_parts(
        operation: impl Into<String>,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut query = QueryParams::default();
        for (key, value) in params {
            query.set(key, value);
        }
        Self {
            operation: operation.into(),
            params: query,
        }
    }

    /// The operation path (`"pay"`, `"tx"`, or an unrecognized value).
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Raw parameter access. Returns the decoded value, `None` when absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns true when the parameter is present (even if empty).
    pub fn has(&self, name: &str) -> bool {
        self.params.get(name).is_some()
    }

    /// Iterate over all parameters in serialization order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter()
    }

    /// The callback target, with a leading `url:` prefix stripped.
    pub fn callback(&self) -> Option<&str> {
        self.get("callback")
            .map(|value| value.strip_prefix("url:").unwrap_or(value))
    }

    /// The domain whose metadata vouches for this request's signature.
    pub fn origin_domain(&self) -> Option<&str> {
        self.get("origin_domain")
    }

    /// The human-readable message attached to the request.
    pub fn msg(&self) -> Option<&str> {
        self.get("msg")
    }

    /// The explicit network passphrase, if any.
    pub fn network_passphrase(&self) -> Option<&str> {
        self.get("network_passphrase")
    }

    /// The base64-encoded request signature, if any.
    pub fn signature(&self) -> Option<&str> {
        self.get("signature")
    }

    /// True for the public network. An absent passphrase means public.
    pub fn is_public_network(&self) -> bool {
        self.network_passphrase()
            .map_or(true, |passphrase| passphrase == PUBLIC_NETWORK_PASSPHRASE)
    }

    /// True for the SDF test network.
    pub fn is_test_network(&self) -> bool {
        self.network_passphrase() == Some(TESTNET_NETWORK_PASSPHRASE)
    }

    /// The exact byte sequence that is signed and verified for this URI.
    ///
    /// The serialized URI with any `&signature=<encoded>` substring removed,
    /// prefixed by 35 zero bytes, one byte of value 4 and the ASCII tag
    /// `stellar.sep.7 - URI Scheme`.
    pub fn signature_payload(&self) -> Vec<u8> {
        let serialized = self.to_string();
        let unsigned = match self.signature() {
            Some(signature) => {
                serialized.replacen(&format!("&signature={}", encode_component(signature)), "", 1)
            }
            None => serialized,
        };
        let mut payload = vec![0u8; SIGNATURE_PAYLOAD_PREFIX_LEN];
        payload.push(SIGNATURE_PAYLOAD_DISCRIMINANT);
        payload.extend_from_slice(SIGNATURE_PAYLOAD_TAG.as_bytes());
        payload.extend_from_slice(unsigned.as_bytes());
        payload
    }

    /// Returns a new, signed request URI. This instance stays unchanged.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(operation = %self.operation)))]
    pub fn sign<S>(&self, signer: &S) -> Result<Self>
    where
        S: RequestSigner + ?Sized,
    {
        let signature = signer.sign(&self.signature_payload())?;
        let mut derived = self.clone();
        derived.params.set("signature", STANDARD.encode(signature));
        Ok(derived)
    }

    /// Verify the request signature against its origin domain.
    ///
    /// Trivially true when neither `origin_domain` nor `signature` is set;
    /// false when only one of them is. Otherwise the domain is resolved to
    /// its metadata document and the signature is checked against the
    /// `URI_REQUEST_SIGNING_KEY` it publishes. Fail-closed: any fault along
    /// the way (resolution, key extraction, signature decoding, the verifier
    /// itself) yields `false`, never an error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(operation = %self.operation, domain = ?self.origin_domain())))]
    pub async fn verify_signature<R, V>(&self, resolver: &R, verifier: &V) -> bool
    where
        R: DomainResolver + ?Sized,
        V: SignatureVerifier + ?Sized,
    {
        let (domain, signature) = match (self.origin_domain(), self.signature()) {
            // Nothing claims an origin, so there is nothing to check.
            (None, None) => return true,
            (Some(domain), Some(signature)) => (domain, signature),
            // One without the other can never be verified.
            _ => return false,
        };

        let metadata = match resolver.resolve(domain).await {
            Ok(metadata) => metadata,
            Err(_) => return false,
        };
        let signing_key = match metadata.uri_request_signing_key {
            Some(key) => key,
            None => return false,
        };
        let raw_signature = match STANDARD.decode(signature) {
            Ok(raw) => raw,
            Err(_) => return false,
        };

        verifier
            .verify(&signing_key, &self.signature_payload(), &raw_signature)
            .unwrap_or(false)
    }

    /// Update a parameter on this (pre-publication) entity.
    pub(crate) fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.set(name, value);
    }

    /// Drop a parameter from this (pre-publication) entity.
    pub(crate) fn remove_param(&mut self, name: &str) {
        self.params.remove(name);
    }
}

impl fmt::Display for Sep7Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SCHEME, self.operation)?;
        if !self.params.is_empty() {
            write!(f, "?{}", self.params.serialize())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Sep7Uri {
    type Err = Sep7Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
