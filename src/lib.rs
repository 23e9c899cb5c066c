// Seat map normalization for OpenTravel and IATA EDIST documents

pub mod config;
pub mod dialect;
pub mod document;
pub mod edist;
pub mod error;
pub mod extractor;
pub mod model;
pub mod ota;

// Re-export key types for convenience
pub use config::{ExtractionConfig, MissingValuePolicy};
pub use dialect::{Dialect, DialectExtractor, DialectRegistry};
pub use document::{Document, Node};
pub use edist::EdistExtractor;
pub use error::{ExtractionError, ParseValueError, ReferenceKind};
pub use extractor::{extract, SeatMapExtractor};
pub use model::{FlightRecord, RowRecord, SeatRecord};
pub use ota::OtaExtractor;
