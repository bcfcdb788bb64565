//! Error kinds surfaced at the core's public boundary (§7). The diff engine
//! itself is total once inputs are valid `Node`s — only path parsing,
//! traversal, and comparison setup can fail.

use thiserror::Error;

use crate::node::Kind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("path segment {segment:?} contains more than one '='")]
    AmbiguousKeyedSegment { segment: String },

    #[error("no entry named {name:?} found in the list at {prefix}")]
    NamedEntryNotFound { prefix: String, name: String },

    #[error("list index {index} is out of range at {prefix}")]
    IndexOutOfRange { prefix: String, index: usize },

    #[error("path segment {segment:?} has an unterminated escape sequence")]
    UnterminatedEscape { segment: String },

    #[error("slash-style paths must start with '/'")]
    MissingLeadingSlash,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraversalError {
    #[error("{prefix}: expected {expected}, found {found}")]
    KindMismatch {
        prefix: String,
        expected: Kind,
        found: Kind,
    },

    #[error("{prefix}: key {key:?} not found, available keys: {available:?}")]
    MissingKey {
        prefix: String,
        key: String,
        available: Vec<String>,
    },

    #[error("{prefix}: index {index} is out of range (length {length})")]
    IndexOutOfRange {
        prefix: String,
        index: usize,
        length: usize,
    },

    #[error("{prefix}: no entry with {key}={value:?}")]
    NoSuchKeyedEntry {
        prefix: String,
        key: String,
        value: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "'from' has {from} document(s) but 'to' has {to}; enable rename detection \
         or compare inputs with matching document counts"
    )]
    DocumentCountMismatch { from: usize, to: usize },

    #[error("change_root requires exactly one document, found {count}")]
    NotASingleDocument { count: usize },
}
