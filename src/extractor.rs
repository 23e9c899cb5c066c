// Public entry point: raw bytes in, canonical flight record out
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::dialect::{Dialect, DialectRegistry};
use crate::document;
use crate::error::ExtractionError;
use crate::model::FlightRecord;

// Parses seat map documents and routes them to the matching dialect rules.
// Holds no per-document state, so one instance can be shared across threads.
pub struct SeatMapExtractor {
    registry: DialectRegistry,
    config: ExtractionConfig,
}

impl SeatMapExtractor {
    // Create an extractor for every built-in dialect with default options
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            registry: DialectRegistry::default(),
            config,
        }
    }

    pub fn with_registry(registry: DialectRegistry, config: ExtractionConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    // Extract a flight record, picking the dialect from the document content
    pub fn extract(&self, raw: &[u8]) -> Result<FlightRecord, ExtractionError> {
        let document = document::parse(raw)?;
        let record = self.registry.detect_and_extract(&document, &self.config)?;
        self.finish(record)
    }

    pub fn extract_str(&self, xml: &str) -> Result<FlightRecord, ExtractionError> {
        self.extract(xml.as_bytes())
    }

    // Extract with a caller-supplied dialect, skipping detection
    pub fn extract_as(&self, raw: &[u8], dialect: Dialect) -> Result<FlightRecord, ExtractionError> {
        let document = document::parse(raw)?;
        let record = self.registry.extract_as(&document, dialect, &self.config)?;
        self.finish(record)
    }

    // Dialect of a document without extracting it
    pub fn detect(&self, raw: &[u8]) -> Result<Dialect, ExtractionError> {
        let document = document::parse(raw)?;
        self.registry
            .detect(&document)
            .map(|extractor| extractor.dialect())
            .ok_or(ExtractionError::UnsupportedDialect(None))
    }

    fn finish(&self, record: FlightRecord) -> Result<FlightRecord, ExtractionError> {
        if self.config.validate_unique_seat_ids {
            if let Some(id) = record.duplicate_seat_id() {
                return Err(ExtractionError::DuplicateSeatId(id.to_string()));
            }
        }
        debug!(
            flight = %record.flight_number,
            rows = record.rows.len(),
            seats = record.seat_count(),
            "extracted seat map"
        );
        Ok(record)
    }
}

impl Default for SeatMapExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// Extract a flight record with the built-in dialects and default options
pub fn extract(raw: &[u8]) -> Result<FlightRecord, ExtractionError> {
    SeatMapExtractor::new().extract(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const OTA_SAMPLE: &str = include_str!("../samples/seatmap1.xml");
    const EDIST_SAMPLE: &str = include_str!("../samples/seatmap2.xml");

    const OTA_DUPLICATE_SEATS: &str = r#"
        <SeatMapResponse xmlns="http://www.opentravel.org/OTA/2003/05/common/">
          <FlightSegmentInfo FlightNumber="1" DepartureDateTime="2021-01-01T08:00:00">
            <DepartureAirport LocationCode="LAS"/><ArrivalAirport LocationCode="IAH"/>
          </FlightSegmentInfo>
          <RowInfo RowNumber="1">
            <SeatInfo><Summary SeatNumber="1A" AvailableInd="true"/></SeatInfo>
            <SeatInfo><Summary SeatNumber="1A" AvailableInd="false"/></SeatInfo>
          </RowInfo>
        </SeatMapResponse>"#;

    #[test]
    fn test_ota_sample() {
        let flight = extract(OTA_SAMPLE.as_bytes()).unwrap();

        assert_eq!(flight.flight_number, "3487");
        assert_eq!(flight.departure_time, "2020-11-22T15:30:00");
        assert_eq!(flight.departure_location, "LAS");
        assert_eq!(flight.arrival_location, "IAH");

        // one record per RowInfo and per SeatInfo
        assert_eq!(flight.rows.len(), OTA_SAMPLE.matches("<ns:RowInfo ").count());
        assert_eq!(flight.seat_count(), OTA_SAMPLE.matches("<ns:SeatInfo ").count());
        assert_eq!((flight.rows.len(), flight.seat_count()), (3, 7));
        assert!(flight.rows[1].seats.is_empty());

        let row = &flight.rows[0];
        assert_eq!(row.row_number, "1");
        assert_eq!(row.cabin_class, "First");
        let ids: Vec<_> = row.seats.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1A", "1B", "1E", "1F"]);

        let seat = flight.find_seat("1B").unwrap();
        assert_eq!(seat.available, "true");
        assert_eq!(seat.price, "16500");

        let seat = flight.find_seat("1A").unwrap();
        assert_eq!(seat.available, "false");
        assert_eq!(seat.price, "NA");

        let exit_seat = flight.find_seat("13C").unwrap();
        assert_eq!(exit_seat.additional_info["inExitRow"], "true");
        assert_eq!(exit_seat.additional_info["planeSection"], "Left");
    }

    #[test]
    fn test_edist_sample() {
        let flight = extract(EDIST_SAMPLE.as_bytes()).unwrap();

        assert_eq!(flight.flight_number, "1716");
        assert_eq!(flight.departure_time, "2020-11-2217:45:00");
        assert_eq!(flight.departure_location, "LAS");
        assert_eq!(flight.arrival_location, "DEN");
        assert_eq!(flight.rows.len(), 3);

        for row in &flight.rows {
            assert_eq!(row.cabin_class, "NA");
            for seat in &row.seats {
                assert!(seat.id.starts_with(&row.row_number));
            }
        }

        let seat = flight.find_seat("8A").unwrap();
        assert_eq!(seat.available, "True");
        assert_eq!(seat.price, "45.00");
        assert_eq!(
            seat.additional_info["seatProperties"],
            serde_json::json!(["WINDOW", "AVAILABLE", "PREFERENTIAL"])
        );

        let seat = flight.find_seat("8C").unwrap();
        assert_eq!(seat.available, "False");
        assert_eq!(seat.price, "NA");

        let seat = flight.find_seat("20F").unwrap();
        assert_eq!(seat.price, "24.00");
    }

    #[test]
    fn test_detect_samples() {
        let extractor = SeatMapExtractor::new();
        assert_eq!(extractor.detect(OTA_SAMPLE.as_bytes()), Ok(Dialect::Ota));
        assert_eq!(extractor.detect(EDIST_SAMPLE.as_bytes()), Ok(Dialect::Edist));
        assert_eq!(
            extractor.detect(b"<Other/>"),
            Err(ExtractionError::UnsupportedDialect(None))
        );
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        for cut in [10, OTA_SAMPLE.len() / 2, OTA_SAMPLE.len() - 5] {
            let result = extract(&OTA_SAMPLE.as_bytes()[..cut]);
            assert!(
                matches!(result, Err(ExtractionError::MalformedXml(_))),
                "cut at {}: {:?}",
                cut,
                result
            );
        }
    }

    #[test]
    fn test_deeply_nested_document_is_malformed() {
        let depth = 100_000;
        let xml = format!(
            r#"<SeatMapResponse xmlns="http://www.opentravel.org/OTA/2003/05/common/">{}{}</SeatMapResponse>"#,
            "<RowInfo>".repeat(depth),
            "</RowInfo>".repeat(depth)
        );
        assert!(matches!(
            extract(xml.as_bytes()),
            Err(ExtractionError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_dialect_hint() {
        let extractor = SeatMapExtractor::new();
        let flight = extractor
            .extract_as(EDIST_SAMPLE.as_bytes(), Dialect::Edist)
            .unwrap();
        assert_eq!(flight.flight_number, "1716");

        // the wrong hint fails inside the chosen rules instead of falling back
        let result = extractor.extract_as(EDIST_SAMPLE.as_bytes(), Dialect::Ota);
        assert!(matches!(
            result,
            Err(ExtractionError::MissingRequiredElement(_))
        ));
    }

    #[test]
    fn test_duplicate_seat_validation() {
        let lenient = SeatMapExtractor::new();
        assert_eq!(
            lenient.extract_str(OTA_DUPLICATE_SEATS).unwrap().seat_count(),
            2
        );

        let strict = SeatMapExtractor::with_config(ExtractionConfig {
            validate_unique_seat_ids: true,
            ..ExtractionConfig::default()
        });
        assert_eq!(
            strict.extract_str(OTA_DUPLICATE_SEATS),
            Err(ExtractionError::DuplicateSeatId("1A".to_string()))
        );
        assert!(strict.extract_str(OTA_SAMPLE).is_ok());
    }

    #[test]
    fn test_shared_extractor_across_threads() {
        let extractor = Arc::new(SeatMapExtractor::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let extractor = Arc::clone(&extractor);
                thread::spawn(move || {
                    let sample = if i % 2 == 0 { OTA_SAMPLE } else { EDIST_SAMPLE };
                    extractor.extract_str(sample).map(|f| f.flight_number)
                })
            })
            .collect();

        let numbers: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();
        assert_eq!(numbers, vec!["3487", "1716", "3487", "1716"]);
    }
}
