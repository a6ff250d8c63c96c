//! Error types for request-URI operations.

/// Comprehensive error type for request-URI operations.
///
/// Every variant is a hard construction-time or build-time failure. The one
/// deliberate exception in the crate is [`crate::Sep7Uri::verify_signature`],
/// which never surfaces an error and collapses every internal fault to
/// `false`.
#[derive(thiserror::Error, Debug)]
pub enum Sep7Error {
    /// The candidate string does not carry the `web+stellar:` scheme.
    #[error("not a web+stellar request URI: {0}")]
    InvalidScheme(String),

    /// The scheme was recognized but the operation path is unknown.
    #[error("request operation \"{0}\" is not supported")]
    UnsupportedOperation(String),

    /// A parameter the operation requires is absent.
    #[error("missing required parameter \"{0}\"")]
    MissingRequiredField(&'static str),

    /// A parameter is present but its value cannot be interpreted.
    #[error("malformed \"{field}\" parameter: {reason}")]
    MalformedField {
        /// Name of the offending parameter.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An option required to build a dependent operation was not supplied.
    #[error("missing option \"{0}\"")]
    MissingBuildOption(&'static str),

    /// The injected signer or verifier reported a fault.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The injected transaction or text codec reported a fault.
    #[error("transaction codec error: {0}")]
    Codec(String),

    /// Origin-domain metadata could not be resolved.
    #[error("domain resolution failed: {0}")]
    Resolver(String),

    /// The operation requires a feature flag that is not enabled.
    #[error("{0} support is not enabled")]
    Unimplemented(&'static str),
}

impl Sep7Error {
    /// Create a malformed-field error.
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Sep7Error::MissingRequiredField("destination");
        assert_eq!(err.to_string(), "missing required parameter \"destination\"");

        let err = Sep7Error::malformed("memo_type", "unknown memo type \"MEMO_NONE\"");
        assert!(err.to_string().contains("memo_type"));
        assert!(err.to_string().contains("MEMO_NONE"));
    }
}
