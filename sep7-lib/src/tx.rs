//! The `tx` request.
//!
//! A request to sign a specific transaction, carried as a base64 envelope in
//! the `xdr` parameter. The request may mark fields of the transaction as
//! replaceable; filling them in happens on the transaction's textual
//! representation, which is patched with assignment lines and re-parsed so
//! neither the original request nor the decoded transaction is ever mutated.

use std::collections::HashMap;
use std::ops::Deref;

use crate::replacement::{parse_replacements, serialize_replacements, Replacement, ReplacementValue};
use crate::traits::{TransactionCodec, TxrepCodec};
use crate::uri::Sep7Uri;
use crate::{Result, Sep7Error, PUBLIC_NETWORK_PASSPHRASE};

/// A parsed `tx` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    uri: Sep7Uri,
    xdr: String,
}

impl TransactionRequest {
    /// Parse a `tx` request from a URI string.
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_uri(Sep7Uri::parse(input)?)
    }

    /// Derive the typed request from an already-parsed entity.
    pub(crate) fn from_uri(uri: Sep7Uri) -> Result<Self> {
        let xdr = uri
            .get("xdr")
            .map(str::to_string)
            .ok_or(Sep7Error::MissingRequiredField("xdr"))?;
        Ok(Self { uri, xdr })
    }

    /// The underlying request URI.
    pub fn uri(&self) -> &Sep7Uri {
        &self.uri
    }

    /// Consume the request, yielding the underlying URI.
    pub fn into_uri(self) -> Sep7Uri {
        self.uri
    }

    /// The base64-encoded transaction envelope.
    pub fn xdr(&self) -> &str {
        &self.xdr
    }

    /// The replacements the request asks the signer to fill in, in request
    /// order. Empty when the `replace` parameter is absent.
    pub fn replacements(&self) -> Result<Vec<Replacement>> {
        match self.uri.get("replace") {
            Some(raw) => parse_replacements(raw),
            None => Ok(Vec::new()),
        }
    }

    /// The passphrase the envelope is decoded under: the public network's
    /// unless the request pins another one.
    fn network(&self) -> &str {
        match self.uri.network_passphrase() {
            Some(passphrase) if !self.uri.is_public_network() => passphrase,
            _ => PUBLIC_NETWORK_PASSPHRASE,
        }
    }

    /// Decode the request's transaction.
    pub fn transaction<C>(&self, codec: &C) -> Result<C::Transaction>
    where
        C: TransactionCodec,
    {
        codec.decode(&self.xdr, self.network())
    }

    /// Decode the request's transaction with replacement values filled in.
    ///
    /// `values` maps replacement ids to literal substitution text. For every
    /// replacement (in request order) whose id has a value, an assignment
    /// line `tx.<path>: <value>` is appended to the transaction's textual
    /// representation, which is then re-parsed under the same network.
    pub fn transaction_with_values<C>(
        &self,
        codec: &C,
        values: &HashMap<String, String>,
    ) -> Result<C::Transaction>
    where
        C: TxrepCodec,
    {
        let network = self.network();
        let transaction = codec.decode(&self.xdr, network)?;
        let mut text = codec.to_text(&transaction)?;
        for replacement in self.replacements()? {
            if let Some(value) = values.get(&replacement.id) {
                text.push_str(&format!("\ntx.{}: {}", replacement.path, value));
            }
        }
        codec.from_text(&text, network)
    }

    /// Apply replacement values and return a new request carrying the
    /// patched envelope.
    ///
    /// Works like [`TransactionRequest::transaction_with_values`], except
    /// the appended assignment lines carry the bare `<path>: <value>` form,
    /// the patched transaction is re-encoded into the clone's `xdr`
    /// parameter, its `network_passphrase` parameter is pinned, and every
    /// applied id is dropped from the clone's replacement list (ids without
    /// a value stay listed for later rounds). This instance stays unchanged.
    pub fn replace<C>(&self, codec: &C, values: &[ReplacementValue]) -> Result<TransactionRequest>
    where
        C: TxrepCodec,
    {
        let network = self.network().to_string();
        let transaction = codec.decode(&self.xdr, &network)?;
        let mut text = codec.to_text(&transaction)?;

        let targets = self.replacements()?;
        let mut remaining = targets.clone();
        for value in values {
            for target in targets.iter().filter(|target| target.id == value.id) {
                text.push_str(&format!("\n{}: {}", target.path, value.value));
            }
            remaining.retain(|target| target.id != value.id);
        }

        let patched = codec.from_text(&text, &network)?;
        let mut uri = self.uri.clone();
        uri.set_param("xdr", codec.encode(&patched)?);
        uri.set_param("network_passphrase", network);
        match serialize_replacements(&remaining) {
            Some(encoded) => uri.set_param("replace", encoded),
            None => uri.remove_param("replace"),
        }
        TransactionRequest::from_uri(uri)
    }
}

impl Deref for TransactionRequest {
    type Target = Sep7Uri;

    fn deref(&self) -> &Sep7Uri {
        &self.uri
    }
}

impl std::fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}
