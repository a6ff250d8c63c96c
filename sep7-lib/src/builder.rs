//! Request builders.
//!
//! Builders are the only mutable objects in the crate: an operation name
//! fixed at construction plus a staged parameter list. `build()` freezes the
//! staging into an immutable request. The typed builders seed their
//! operation's parameters from structured inputs so encoding stays symmetric
//! with the decode rules in [`crate::pay`] and [`crate::tx`].

use crate::pay::PayRequest;
use crate::replacement::{serialize_replacements, Replacement};
use crate::traits::TransactionCodec;
use crate::tx::TransactionRequest;
use crate::uri::Sep7Uri;
use crate::{Asset, Memo, Result, Sep7Error, PUBLIC_NETWORK_PASSPHRASE};

fn put(params: &mut Vec<(String, Option<String>)>, key: String, value: Option<String>) {
    match params.iter().position(|(existing, _)| *existing == key) {
        Some(index) => params[index].1 = value,
        None => params.push((key, value)),
    }
}

/// Generic request builder for any operation.
///
/// ```
/// use sep7_lib::UriBuilder;
///
/// let uri = UriBuilder::new("pay")
///     .set("destination", "GABC")
///     .set("amount", "10")
///     .build();
/// assert_eq!(uri.to_string(), "web+stellar:pay?destination=GABC&amount=10");
/// ```
#[derive(Clone, Debug)]
pub struct UriBuilder {
    operation: String,
    params: Vec<(String, Option<String>)>,
}

impl UriBuilder {
    /// Start building a request for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Vec::new(),
        }
    }

    /// The currently staged value for a key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Stage a parameter. Re-setting an existing key keeps its position.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        put(&mut self.params, key.into(), Some(value.into()));
        self
    }

    /// Clear a staged parameter: the built URI will omit it entirely rather
    /// than carry an empty value.
    pub fn unset(mut self, key: &str) -> Self {
        put(&mut self.params, key.to_string(), None);
        self
    }

    /// Pin the request to a network. Sugar for setting `network_passphrase`.
    pub fn use_network(self, passphrase: impl Into<String>) -> Self {
        self.set("network_passphrase", passphrase)
    }

    /// Freeze the staged parameters into a request URI.
    pub fn build(self) -> Sep7Uri {
        self.build_with(Vec::new())
    }

    /// Freeze with extra parameters merged over the staged ones (extra wins
    /// on conflict, keeping the conflicting key's position).
    pub fn build_with(self, extra: Vec<(String, Option<String>)>) -> Sep7Uri {
        let Self {
            operation,
            mut params,
        } = self;
        for (key, value) in extra {
            put(&mut params, key, value);
        }
        Sep7Uri::from_parts(
            operation,
            params
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value))),
        )
    }
}

/// Structured input for a `pay` request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentBlueprint {
    /// The account to be paid. Required.
    pub destination: String,
    /// The amount to request, if pinned.
    pub amount: Option<String>,
    /// The asset to request payment in. `None` and [`Asset::Native`] both
    /// mean the native asset and emit no asset parameters.
    pub asset: Option<Asset>,
    /// The memo to attach, if any.
    pub memo: Option<Memo>,
}

impl PaymentBlueprint {
    /// A blueprint paying `destination` with everything else left open.
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }
}

/// Builder for `pay` requests.
#[derive(Clone, Debug)]
pub struct PayRequestBuilder {
    inner: UriBuilder,
}

impl PayRequestBuilder {
    /// Seed a builder from a payment blueprint.
    pub fn new(blueprint: PaymentBlueprint) -> Self {
        let mut inner = UriBuilder::new("pay").set("destination", blueprint.destination);
        if let Some(amount) = blueprint.amount {
            inner = inner.set("amount", amount);
        }
        if let Some(Asset::Issued { code, issuer }) = blueprint.asset {
            inner = inner.set("asset_code", code).set("asset_issuer", issuer);
        }
        if let Some(memo) = blueprint.memo {
            let (value, memo_type) = memo.to_params();
            inner = inner.set("memo", value).set("memo_type", memo_type);
        }
        Self { inner }
    }

    /// Stage an arbitrary parameter (e.g. `msg`, `origin_domain`).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.set(key, value);
        self
    }

    /// Clear a staged parameter.
    pub fn unset(mut self, key: &str) -> Self {
        self.inner = self.inner.unset(key);
        self
    }

    /// Pin the request to a network.
    pub fn use_network(mut self, passphrase: impl Into<String>) -> Self {
        self.inner = self.inner.use_network(passphrase);
        self
    }

    /// Freeze into a `pay` request.
    pub fn build(self) -> Result<PayRequest> {
        PayRequest::from_uri(self.inner.build())
    }
}

/// Builder for `tx` requests.
#[derive(Clone, Debug)]
pub struct TransactionRequestBuilder {
    inner: UriBuilder,
    replacements: Vec<Replacement>,
}

impl TransactionRequestBuilder {
    /// Seed a builder from a transaction.
    ///
    /// The envelope is encoded into `xdr` immediately. `network_passphrase`
    /// is only emitted when the given network differs from the public one,
    /// or, failing that, when the transaction itself carries an explicit
    /// passphrase.
    pub fn for_transaction<C>(
        codec: &C,
        transaction: &C::Transaction,
        network: Option<&str>,
    ) -> Result<Self>
    where
        C: TransactionCodec,
    {
        let mut inner = UriBuilder::new("tx").set("xdr", codec.encode(transaction)?);
        match network {
            Some(passphrase) if passphrase != PUBLIC_NETWORK_PASSPHRASE => {
                inner = inner.use_network(passphrase);
            }
            _ => {
                if let Some(passphrase) = codec.network_passphrase(transaction) {
                    inner = inner.use_network(passphrase);
                }
            }
        }
        Ok(Self {
            inner,
            replacements: Vec::new(),
        })
    }

    /// Mark a field of the transaction as to-be-filled-in by the signer.
    pub fn add_replacement(mut self, replacement: Replacement) -> Self {
        self.replacements.push(replacement);
        self
    }

    /// Stage an arbitrary parameter (e.g. `msg`, `callback`).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.set(key, value);
        self
    }

    /// Clear a staged parameter.
    pub fn unset(mut self, key: &str) -> Self {
        self.inner = self.inner.unset(key);
        self
    }

    /// Pin the request to a network.
    pub fn use_network(mut self, passphrase: impl Into<String>) -> Self {
        self.inner = self.inner.use_network(passphrase);
        self
    }

    /// Freeze into a `tx` request, serializing the accumulated replacement
    /// list into the `replace` parameter (omitted when empty).
    pub fn build(self) -> Result<TransactionRequest> {
        for replacement in &self.replacements {
            for field in [&replacement.id, &replacement.path, &replacement.hint] {
                if field.contains(',') || field.contains(';') {
                    return Err(Sep7Error::malformed(
                        "replace",
                        format!("replacement field \"{field}\" contains a list delimiter"),
                    ));
                }
            }
        }
        let extra = vec![(
            "replace".to_string(),
            serialize_replacements(&self.replacements),
        )];
        TransactionRequest::from_uri(self.inner.build_with(extra))
    }
}
