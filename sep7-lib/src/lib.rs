//! SEP-0007 request URIs.
//!
//! This crate intentionally stays stateless and delegates cryptography,
//! envelope decoding and domain lookups to callers through trait-based
//! dependency injection.
//!
//! # Features
//!
//! - **Request parsing**: Validate and dispatch `web+stellar:` URIs into
//!   typed `pay` and `tx` requests
//! - **Request signing**: Deterministic signature payloads, signing and
//!   fail-closed origin-domain verification
//! - **Replacements**: The compact grammar that marks fields of a
//!   transaction to be filled in by the signer
//!
//! # Example
//!
//! ```
//! use sep7_lib::{parse_sep7_uri, Sep7Request};
//!
//! let parsed = parse_sep7_uri(
//!     "web+stellar:pay?destination=GDOOMATUOJPLIQMQ4WWXBEWR5UMKJW65CFKJJW3LV7XZYIEQHZPDQCBI&amount=10",
//! )
//! .unwrap();
//!
//! match parsed {
//!     Sep7Request::Pay(pay) => {
//!         assert_eq!(pay.amount(), Some("10"));
//!     }
//!     Sep7Request::Transaction(_) => unreachable!(),
//! }
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub mod builder;
pub mod errors;
mod parse;
pub mod pay;
pub mod prelude;
pub mod replacement;
pub mod resolver;
pub mod traits;
pub mod tx;
pub mod uri;

/// Test utilities for request-URI testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use builder::{PayRequestBuilder, PaymentBlueprint, TransactionRequestBuilder, UriBuilder};
pub use errors::Sep7Error;
pub use parse::{is_sep7_uri, parse_sep7_uri, Sep7Request};
pub use pay::{PathPaymentOperation, PathPaymentOptions, PayRequest, PaymentOperation};
pub use replacement::{Replacement, ReplacementValue};
pub use resolver::{ResolverConfig, TomlResolver};
pub use traits::{
    DomainMetadata, DomainResolver, RequestSigner, SignatureVerifier, TransactionCodec, TxrepCodec,
};
pub use tx::TransactionRequest;
pub use uri::Sep7Uri;

/// Common result alias for request-URI operations.
pub type Result<T> = std::result::Result<T, Sep7Error>;

/// URI scheme token registered for request URIs.
pub const SCHEME: &str = "web+stellar";

/// Passphrase of the public network.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the SDF test network.
pub const TESTNET_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// An asset a payment request asks to be paid in.
///
/// A request that names no asset asks for the native asset; parsed requests
/// therefore only ever carry the [`Asset::Issued`] variant, while operation
/// builders fall back to [`Asset::Native`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Asset {
    /// The network's native asset.
    Native,
    /// An issued asset, identified by code and issuing account.
    Issued {
        /// The asset code (e.g. "USD").
        code: String,
        /// The issuing account.
        issuer: String,
    },
}

impl Asset {
    /// The native asset.
    pub fn native() -> Self {
        Self::Native
    }

    /// An issued asset.
    pub fn issued(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self::Issued {
            code: code.into(),
            issuer: issuer.into(),
        }
    }

    /// Returns true for the native asset.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

/// A transaction memo attached to a payment request.
///
/// URI form: the `memo` parameter holds the value (base64 for the hash
/// variants) and `memo_type` selects the variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Memo {
    /// Free-form text memo.
    Text(String),
    /// Numeric identifier memo.
    Id(u64),
    /// 32-byte hash memo.
    Hash([u8; 32]),
    /// 32-byte return-hash memo.
    Return([u8; 32]),
}

impl Memo {
    /// Decode a memo from its `memo`/`memo_type` parameter pair.
    ///
    /// Callers are expected to have already mapped an absent or empty `memo`
    /// value to "no memo"; this only deals with a value that is present.
    pub(crate) fn from_params(memo_type: Option<&str>, value: &str) -> Result<Self> {
        match memo_type {
            Some("MEMO_TEXT") => Ok(Self::Text(value.to_string())),
            Some("MEMO_ID") => value.parse().map(Self::Id).map_err(|_| {
                Sep7Error::malformed("memo", format!("\"{value}\" is not a valid id memo"))
            }),
            Some("MEMO_HASH") => decode_memo_hash(value).map(Self::Hash),
            Some("MEMO_RETURN") => decode_memo_hash(value).map(Self::Return),
            Some(other) => Err(Sep7Error::malformed(
                "memo_type",
                format!("unknown memo type \"{other}\""),
            )),
            None => Err(Sep7Error::malformed(
                "memo_type",
                "memo value given without a memo_type",
            )),
        }
    }

    /// The `memo`/`memo_type` parameter pair for this memo.
    pub(crate) fn to_params(&self) -> (String, &'static str) {
        match self {
            Self::Text(text) => (text.clone(), "MEMO_TEXT"),
            Self::Id(id) => (id.to_string(), "MEMO_ID"),
            Self::Hash(bytes) => (STANDARD.encode(bytes), "MEMO_HASH"),
            Self::Return(bytes) => (STANDARD.encode(bytes), "MEMO_RETURN"),
        }
    }
}

fn decode_memo_hash(value: &str) -> Result<[u8; 32]> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| Sep7Error::malformed("memo", format!("invalid base64: {e}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        Sep7Error::malformed("memo", format!("expected a 32-byte hash, got {} bytes", bytes.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_classification() {
        assert!(Asset::native().is_native());
        assert!(!Asset::issued("USD", "GISSUER").is_native());
    }

    #[test]
    fn test_memo_round_trip() {
        let memos = [
            Memo::Text("order 42".to_string()),
            Memo::Id(42),
            Memo::Hash([7u8; 32]),
            Memo::Return([9u8; 32]),
        ];
        for memo in memos {
            let (value, memo_type) = memo.to_params();
            assert_eq!(Memo::from_params(Some(memo_type), &value).unwrap(), memo);
        }
    }

    #[test]
    fn test_memo_unknown_type_is_rejected() {
        let err = Memo::from_params(Some("MEMO_NONE"), "x").unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "memo_type", .. }));

        let err = Memo::from_params(None, "x").unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "memo_type", .. }));
    }

    #[test]
    fn test_memo_id_must_be_numeric() {
        let err = Memo::from_params(Some("MEMO_ID"), "not-a-number").unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "memo", .. }));
    }

    #[test]
    fn test_memo_hash_must_be_32_bytes() {
        let short = STANDARD.encode([1u8; 8]);
        let err = Memo::from_params(Some("MEMO_HASH"), &short).unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "memo", .. }));

        let err = Memo::from_params(Some("MEMO_RETURN"), "!!not base64!!").unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "memo", .. }));
    }
}
