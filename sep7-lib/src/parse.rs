//! Protocol gate and operation dispatch.
//!
//! [`is_sep7_uri`] answers "does this string even claim to be one of ours",
//! and [`parse_sep7_uri`] routes a candidate to the typed request for its
//! operation path.

use std::fmt;

use crate::pay::PayRequest;
use crate::tx::TransactionRequest;
use crate::uri::Sep7Uri;
use crate::{Result, Sep7Error};

/// A dispatched request, typed by its operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sep7Request {
    /// A `pay` request.
    Pay(PayRequest),
    /// A `tx` (sign-this-transaction) request.
    Transaction(TransactionRequest),
}

impl Sep7Request {
    /// The underlying request URI.
    pub fn uri(&self) -> &Sep7Uri {
        match self {
            Self::Pay(pay) => pay.uri(),
            Self::Transaction(tx) => tx.uri(),
        }
    }

    /// The operation path.
    pub fn operation(&self) -> &str {
        self.uri().operation()
    }
}

impl fmt::Display for Sep7Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Returns true if the candidate is a request URI for a known operation.
///
/// Only the two known operation prefixes count; the bare scheme with any
/// other path is not ours.
///
/// ```
/// use sep7_lib::is_sep7_uri;
///
/// assert!(is_sep7_uri("web+stellar:pay?destination=GABC"));
/// assert!(is_sep7_uri("web+stellar:tx?xdr=AAAA"));
/// assert!(!is_sep7_uri("web+stellar:refund"));
/// assert!(!is_sep7_uri("bitcoin:bc1q..."));
/// ```
pub fn is_sep7_uri(candidate: &str) -> bool {
    candidate.starts_with("web+stellar:tx") || candidate.starts_with("web+stellar:pay")
}

/// Parse a candidate string into the typed request for its operation.
///
/// Fails with [`Sep7Error::InvalidScheme`] unless [`is_sep7_uri`] holds.
/// The operation is then re-checked independently: anything but `tx` or
/// `pay` is [`Sep7Error::UnsupportedOperation`]. The double check is
/// deliberate; the prefix test is a fast gate, the dispatch owns the final
/// word on which operations exist.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug"))]
pub fn parse_sep7_uri(candidate: &str) -> Result<Sep7Request> {
    if !is_sep7_uri(candidate) {
        return Err(Sep7Error::InvalidScheme(candidate.to_string()));
    }

    let uri = Sep7Uri::parse(candidate)?;
    let operation = uri.operation().to_string();
    match operation.as_str() {
        "tx" => Ok(Sep7Request::Transaction(TransactionRequest::from_uri(uri)?)),
        "pay" => Ok(Sep7Request::Pay(PayRequest::from_uri(uri)?)),
        _ => Err(Sep7Error::UnsupportedOperation(operation)),
    }
}
