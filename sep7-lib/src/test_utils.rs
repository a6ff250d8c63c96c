//! Test utilities for request-URI testing.
//!
//! A canned domain resolver and a line-oriented stand-in for the envelope
//! and textual codecs. The codec keeps a transaction as ordered
//! `name: value` fields, renders them one per line, and treats a later
//! assignment to a field as overriding the earlier one, which is exactly
//! the contract replacement application relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::traits::{DomainMetadata, DomainResolver, TransactionCodec, TxrepCodec};
use crate::{Result, Sep7Error};

/// Domain resolver answering from a fixed in-memory table.
#[derive(Clone, Debug, Default)]
pub struct MockResolver {
    domains: HashMap<String, DomainMetadata>,
}

impl MockResolver {
    /// An empty resolver; every lookup fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given metadata for a domain.
    pub fn with_domain(mut self, domain: impl Into<String>, metadata: DomainMetadata) -> Self {
        self.domains.insert(domain.into(), metadata);
        self
    }

    /// Serve a metadata document containing only a request signing key.
    pub fn with_signing_key(self, domain: impl Into<String>, key: impl Into<String>) -> Self {
        self.with_domain(
            domain,
            DomainMetadata {
                uri_request_signing_key: Some(key.into()),
                ..Default::default()
            },
        )
    }
}

#[async_trait]
impl DomainResolver for MockResolver {
    async fn resolve(&self, domain: &str) -> Result<DomainMetadata> {
        self.domains
            .get(domain)
            .cloned()
            .ok_or_else(|| Sep7Error::Resolver(format!("no metadata for {domain}")))
    }
}

/// Transaction type of [`TextCodec`]: a network passphrase plus ordered
/// named fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextTransaction {
    /// The passphrase the transaction was decoded or built under. Empty
    /// means "carries none".
    pub network_passphrase: String,
    fields: Vec<(String, String)>,
}

impl TextTransaction {
    /// An empty transaction under the given network.
    pub fn new(network_passphrase: impl Into<String>) -> Self {
        Self {
            network_passphrase: network_passphrase.into(),
            fields: Vec::new(),
        }
    }

    /// Add or overwrite a field, keeping field order stable.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name.into(), value.into());
        self
    }

    /// Look up a field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_field(&mut self, name: String, value: String) {
        match self.fields.iter().position(|(existing, _)| *existing == name) {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((name, value)),
        }
    }
}

/// Line-oriented envelope/textual codec over [`TextTransaction`].
///
/// The "envelope" is the base64 of the textual form; the textual form is one
/// `tx.<name>: <value>` line per field (a bare `<name>: <value>` line parses
/// too).
#[derive(Clone, Copy, Debug, Default)]
pub struct TextCodec;

impl TransactionCodec for TextCodec {
    type Transaction = TextTransaction;

    fn decode(&self, envelope: &str, network_passphrase: &str) -> Result<TextTransaction> {
        let bytes = STANDARD
            .decode(envelope)
            .map_err(|e| Sep7Error::Codec(format!("invalid envelope base64: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Sep7Error::Codec(format!("envelope is not UTF-8: {e}")))?;
        self.from_text(&text, network_passphrase)
    }

    fn encode(&self, transaction: &TextTransaction) -> Result<String> {
        let text = self.to_text(transaction)?;
        Ok(STANDARD.encode(text.as_bytes()))
    }

    fn network_passphrase(&self, transaction: &TextTransaction) -> Option<String> {
        if transaction.network_passphrase.is_empty() {
            None
        } else {
            Some(transaction.network_passphrase.clone())
        }
    }
}

impl TxrepCodec for TextCodec {
    fn to_text(&self, transaction: &TextTransaction) -> Result<String> {
        let lines: Vec<String> = transaction
            .fields
            .iter()
            .map(|(name, value)| format!("tx.{name}: {value}"))
            .collect();
        Ok(lines.join("\n"))
    }

    fn from_text(&self, text: &str, network_passphrase: &str) -> Result<TextTransaction> {
        let mut transaction = TextTransaction::new(network_passphrase);
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Sep7Error::Codec(format!("malformed line \"{line}\"")))?;
            let name = name.trim();
            let name = name.strip_prefix("tx.").unwrap_or(name);
            transaction.set_field(name.to_string(), value.trim().to_string());
        }
        Ok(transaction)
    }
}

/// Base64 "envelope" for a field list, for building `tx` test URIs.
pub fn encode_text_envelope(fields: &[(&str, &str)]) -> String {
    let text: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("tx.{name}: {value}"))
        .collect();
    STANDARD.encode(text.join("\n").as_bytes())
}
