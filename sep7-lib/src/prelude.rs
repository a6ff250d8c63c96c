//! Prelude module for convenient imports.
//!
//! Import everything with:
//!
//! ```rust
//! use sep7_lib::prelude::*;
//! ```

// Core types
pub use crate::{Asset, Memo, Sep7Uri};

// Error handling
pub use crate::errors::Sep7Error;
pub use crate::Result;

// Parsing and dispatch
pub use crate::parse::{is_sep7_uri, parse_sep7_uri, Sep7Request};

// Typed requests
pub use crate::pay::{PathPaymentOptions, PayRequest};
pub use crate::tx::TransactionRequest;

// Replacements
pub use crate::replacement::{Replacement, ReplacementValue};

// Builders
pub use crate::builder::{
    PayRequestBuilder, PaymentBlueprint, TransactionRequestBuilder, UriBuilder,
};

// Collaborator traits
pub use crate::traits::{
    DomainMetadata, DomainResolver, RequestSigner, SignatureVerifier, TransactionCodec, TxrepCodec,
};

// Network constants
pub use crate::{PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE};
