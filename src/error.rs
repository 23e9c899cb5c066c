use std::fmt;

use thiserror::Error;

use crate::dialect::Dialect;

// Error types for seat map extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Unsupported dialect{}", hint_suffix(.0))]
    UnsupportedDialect(Option<Dialect>),

    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),

    #[error("Unresolved {kind} reference: {id}")]
    UnresolvedReference { kind: ReferenceKind, id: String },

    #[error("Duplicate seat id: {0}")]
    DuplicateSeatId(String),
}

impl ExtractionError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        ExtractionError::MissingRequiredElement(path.into())
    }
}

fn hint_suffix(hint: &Option<Dialect>) -> String {
    match hint {
        Some(dialect) => format!(": no extractor registered for {}", dialect),
        None => String::new(),
    }
}

// Catalogue a cross-reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    OfferItem,
    SeatDefinition,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::OfferItem => write!(f, "offer item"),
            ReferenceKind::SeatDefinition => write!(f, "seat definition"),
        }
    }
}

// Errors for configuration values given as text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseValueError {
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("Unknown missing-value policy: {0}")]
    UnknownPolicy(String),
}
