use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::ExtractionConfig;
use crate::document::Document;
use crate::edist::EdistExtractor;
use crate::error::{ExtractionError, ParseValueError};
use crate::model::FlightRecord;
use crate::ota::OtaExtractor;

// Seat map document shapes the crate knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Dialect {
    Ota,
    Edist,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ota => write!(f, "OTA"),
            Dialect::Edist => write!(f, "EDIST"),
        }
    }
}

impl FromStr for Dialect {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OTA" => Ok(Dialect::Ota),
            "EDIST" => Ok(Dialect::Edist),
            _ => Err(ParseValueError::UnknownDialect(s.to_string())),
        }
    }
}

// Rule set turning one dialect's document tree into a FlightRecord
pub trait DialectExtractor: Send + Sync {
    fn dialect(&self) -> Dialect;

    // Whether the document carries this dialect's structural signature
    fn detect(&self, document: &Document<'_>) -> bool;

    // Build the record for the whole document or fail, never a partial record
    fn extract(
        &self,
        document: &Document<'_>,
        config: &ExtractionConfig,
    ) -> Result<FlightRecord, ExtractionError>;
}

// Ordered set of extractors, detection picks the first one that matches
pub struct DialectRegistry {
    extractors: Vec<Box<dyn DialectExtractor>>,
}

impl DialectRegistry {
    // Create a registry with no extractors
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    // When a dialect is registered twice the earlier extractor keeps winning
    // detection and lookups
    pub fn register(&mut self, extractor: impl DialectExtractor + 'static) {
        self.extractors.push(Box::new(extractor));
    }

    pub fn get(&self, dialect: Dialect) -> Option<&dyn DialectExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.dialect() == dialect)
            .map(|extractor| &**extractor)
    }

    pub fn detect(&self, document: &Document<'_>) -> Option<&dyn DialectExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.detect(document))
            .map(|extractor| &**extractor)
    }

    pub fn dialects(&self) -> Vec<Dialect> {
        self.extractors.iter().map(|e| e.dialect()).collect()
    }

    pub fn detect_and_extract(
        &self,
        document: &Document<'_>,
        config: &ExtractionConfig,
    ) -> Result<FlightRecord, ExtractionError> {
        let extractor = self
            .detect(document)
            .ok_or(ExtractionError::UnsupportedDialect(None))?;
        debug!(dialect = %extractor.dialect(), "detected seat map dialect");
        extractor.extract(document, config)
    }

    // Run the extractor for a caller-chosen dialect without content detection
    pub fn extract_as(
        &self,
        document: &Document<'_>,
        dialect: Dialect,
        config: &ExtractionConfig,
    ) -> Result<FlightRecord, ExtractionError> {
        let extractor = self
            .get(dialect)
            .ok_or(ExtractionError::UnsupportedDialect(Some(dialect)))?;
        debug!(%dialect, "extracting with dialect hint");
        extractor.extract(document, config)
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(OtaExtractor);
        registry.register(EdistExtractor);
        registry
    }
}
