//! Consumed collaborator interfaces.
//!
//! The crate never implements cryptography or envelope codecs itself; it
//! calls into these narrow traits so any ecosystem implementation (or a test
//! double) can be injected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// The slice of a domain's metadata document the protocol cares about.
///
/// Resolved from `https://<domain>/.well-known/stellar.toml`; field names
/// match the document's upper-case keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMetadata {
    /// Public key the domain signs request URIs with.
    #[serde(rename = "URI_REQUEST_SIGNING_KEY", default, skip_serializing_if = "Option::is_none")]
    pub uri_request_signing_key: Option<String>,
    /// General-purpose signing key of the domain.
    #[serde(rename = "SIGNING_KEY", default, skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,
    /// Network the domain operates on.
    #[serde(rename = "NETWORK_PASSPHRASE", default, skip_serializing_if = "Option::is_none")]
    pub network_passphrase: Option<String>,
}

/// Maps an internet domain to its metadata document.
///
/// The one network-bound collaborator in the crate. No retry or timeout
/// policy is imposed here; implementations own both, and
/// [`crate::Sep7Uri::verify_signature`] treats every fault as a failed
/// verification.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Resolve a domain's metadata document.
    async fn resolve(&self, domain: &str) -> Result<DomainMetadata>;
}

/// Signs request payloads with a held private key.
pub trait RequestSigner {
    /// Sign the payload, returning the raw signature bytes.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Checks request signatures against a published public key.
pub trait SignatureVerifier {
    /// Verify `signature` over `payload` with the key encoded in
    /// `signing_key`. An unparseable key is an error (which verification
    /// treats as failure), a well-formed but wrong signature is `Ok(false)`.
    fn verify(&self, signing_key: &str, payload: &[u8], signature: &[u8]) -> Result<bool>;
}

/// Binary transaction-envelope codec.
///
/// The crate treats the transaction type as opaque; it only shuttles
/// base64-encoded envelopes in and out of request parameters.
pub trait TransactionCodec {
    /// The decoded transaction type.
    type Transaction;

    /// Decode a base64-encoded envelope under the given network passphrase.
    fn decode(&self, envelope: &str, network_passphrase: &str) -> Result<Self::Transaction>;

    /// Encode a transaction back into a base64 envelope.
    fn encode(&self, transaction: &Self::Transaction) -> Result<String>;

    /// The passphrase the transaction was decoded or built under, if it
    /// carries one.
    fn network_passphrase(&self, transaction: &Self::Transaction) -> Option<String>;
}

/// Human-readable transaction representation codec.
///
/// Round-trip fidelity between [`TxrepCodec::to_text`] and
/// [`TxrepCodec::from_text`] is assumed; replacement application appends
/// assignment lines to the text and re-parses it.
pub trait TxrepCodec: TransactionCodec {
    /// Render the transaction to its textual representation.
    fn to_text(&self, transaction: &Self::Transaction) -> Result<String>;

    /// Parse the textual representation under the given network passphrase.
    fn from_text(&self, text: &str, network_passphrase: &str) -> Result<Self::Transaction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_metadata_field_names() {
        let json = r#"{"URI_REQUEST_SIGNING_KEY":"GKEY","NETWORK_PASSPHRASE":"Test"}"#;
        let metadata: DomainMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.uri_request_signing_key.as_deref(), Some("GKEY"));
        assert_eq!(metadata.signing_key, None);
        assert_eq!(metadata.network_passphrase.as_deref(), Some("Test"));
    }

    #[test]
    fn test_domain_metadata_omits_absent_fields() {
        let metadata = DomainMetadata::default();
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "{}");
    }
}
