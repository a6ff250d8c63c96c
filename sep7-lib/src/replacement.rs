//! The replacement grammar.
//!
//! A `tx` request may mark fields of its transaction as "to be filled in by
//! the signer". The `replace` parameter carries those marks in a compact
//! textual list: entries separated by `;`, the `id,path,hint` fields of each
//! entry separated by `,`, the whole list optionally wrapped in `[...]`.
//!
//! ```
//! use sep7_lib::replacement::{parse_replacements, serialize_replacements, Replacement};
//!
//! let marks = vec![
//!     Replacement::new("X", "seqNum", "the sequence number"),
//!     Replacement::new("X", "sourceAccount", "the source account"),
//! ];
//! let encoded = serialize_replacements(&marks).unwrap();
//! assert_eq!(encoded, "[X,seqNum,the sequence number;X,sourceAccount,the source account]");
//! assert_eq!(parse_replacements(&encoded).unwrap(), marks);
//!
//! // The empty list has no encoding at all; the parameter is omitted.
//! assert_eq!(serialize_replacements(&[]), None);
//! ```

use std::collections::HashSet;

use crate::{Result, Sep7Error};

/// One substitution slot inside a transaction's textual representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    /// Name of the slot. Several replacements may share an id, in which
    /// case one supplied value fills all of their paths at once.
    pub id: String,
    /// Dotted field path into the transaction's textual representation.
    /// Unique within one replacement list.
    pub path: String,
    /// Human-readable description shown to the signer.
    pub hint: String,
}

impl Replacement {
    /// Create a replacement.
    pub fn new(id: impl Into<String>, path: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            hint: hint.into(),
        }
    }
}

/// A value to substitute into every replacement slot sharing `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementValue {
    /// The slot name being filled.
    pub id: String,
    /// The literal substitution text.
    pub value: String,
}

impl ReplacementValue {
    /// Create a replacement value.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Decode a `replace` parameter value into its ordered replacement list.
pub fn parse_replacements(input: &str) -> Result<Vec<Replacement>> {
    let inner = match input.strip_prefix('[') {
        Some(rest) => rest
            .strip_suffix(']')
            .ok_or_else(|| Sep7Error::malformed("replace", "unclosed bracket"))?,
        None => input,
    };
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut replacements = Vec::new();
    let mut seen_paths = HashSet::new();
    for entry in inner.split(';') {
        let mut fields = entry.splitn(4, ',');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(path), Some(hint), None) => {
                if !seen_paths.insert(path.to_string()) {
                    return Err(Sep7Error::malformed(
                        "replace",
                        format!("duplicate replacement path \"{path}\""),
                    ));
                }
                replacements.push(Replacement::new(id, path, hint));
            }
            _ => {
                return Err(Sep7Error::malformed(
                    "replace",
                    format!("expected \"id,path,hint\", got \"{entry}\""),
                ))
            }
        }
    }
    Ok(replacements)
}

/// Encode an ordered replacement list into a `replace` parameter value.
///
/// Returns `None` for the empty list so callers omit the parameter instead
/// of emitting degenerate brackets.
pub fn serialize_replacements(replacements: &[Replacement]) -> Option<String> {
    if replacements.is_empty() {
        return None;
    }
    let entries: Vec<String> = replacements
        .iter()
        .map(|r| format!("{},{},{}", r.id, r.path, r.hint))
        .collect();
    Some(format!("[{}]", entries.join(";")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let marks = vec![
            Replacement::new("X", "seqNum", "sequence number"),
            Replacement::new("Y", "operations[0].sourceAccount", "payer account"),
        ];
        let encoded = serialize_replacements(&marks).unwrap();
        assert_eq!(parse_replacements(&encoded).unwrap(), marks);
    }

    #[test]
    fn test_brackets_are_optional_when_decoding() {
        let bare = "X,seqNum,sequence number";
        let wrapped = "[X,seqNum,sequence number]";
        assert_eq!(
            parse_replacements(bare).unwrap(),
            parse_replacements(wrapped).unwrap()
        );
    }

    #[test]
    fn test_shared_ids_are_allowed() {
        let parsed = parse_replacements("[X,seqNum,h1;X,sourceAccount,h2]").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, parsed[1].id);
    }

    #[test]
    fn test_duplicate_paths_are_rejected() {
        let err = parse_replacements("[X,seqNum,h1;Y,seqNum,h2]").unwrap_err();
        assert!(matches!(err, Sep7Error::MalformedField { field: "replace", .. }));
    }

    #[test]
    fn test_field_count_mismatch_is_rejected() {
        assert!(parse_replacements("[X,seqNum]").is_err());
        assert!(parse_replacements("[X,seqNum,hint,extra]").is_err());
    }

    #[test]
    fn test_unclosed_bracket_is_rejected() {
        assert!(parse_replacements("[X,seqNum,hint").is_err());
    }

    #[test]
    fn test_hints_may_contain_colons() {
        let parsed = parse_replacements("[X,seqNum,hint: pick one]").unwrap();
        assert_eq!(parsed[0].hint, "hint: pick one");
    }

    #[test]
    fn test_empty_list_encodes_to_nothing() {
        assert_eq!(serialize_replacements(&[]), None);
        assert_eq!(parse_replacements("[]").unwrap(), Vec::new());
        assert_eq!(parse_replacements("").unwrap(), Vec::new());
    }
}
