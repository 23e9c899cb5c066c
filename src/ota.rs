// OpenTravel SeatMapResponse rules
use serde_json::Map;
use tracing::trace;

use crate::config::ExtractionConfig;
use crate::dialect::{Dialect, DialectExtractor};
use crate::document::{
    self, child, required_attr, required_child, required_find, Document, Name, Node,
};
use crate::error::ExtractionError;
use crate::model::{FlightRecord, RowRecord, SeatRecord, NOT_AVAILABLE};

pub const OTA_NAMESPACE: &str = "http://www.opentravel.org/OTA/2003/05/common/";

const SEAT_MAP_RESPONSE: Name = (OTA_NAMESPACE, "SeatMapResponse");
const FLIGHT_SEGMENT_INFO: Name = (OTA_NAMESPACE, "FlightSegmentInfo");
const DEPARTURE_AIRPORT: Name = (OTA_NAMESPACE, "DepartureAirport");
const ARRIVAL_AIRPORT: Name = (OTA_NAMESPACE, "ArrivalAirport");
const ROW_INFO: Name = (OTA_NAMESPACE, "RowInfo");
const SEAT_INFO: Name = (OTA_NAMESPACE, "SeatInfo");
const SUMMARY: Name = (OTA_NAMESPACE, "Summary");
const SERVICE: Name = (OTA_NAMESPACE, "Service");
const FEE: Name = (OTA_NAMESPACE, "Fee");

#[derive(Debug, Clone, Copy, Default)]
pub struct OtaExtractor;

impl DialectExtractor for OtaExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Ota
    }

    fn detect(&self, document: &Document<'_>) -> bool {
        document::contains(document, SEAT_MAP_RESPONSE)
    }

    fn extract(
        &self,
        document: &Document<'_>,
        config: &ExtractionConfig,
    ) -> Result<FlightRecord, ExtractionError> {
        let response = required_find(document.root(), SEAT_MAP_RESPONSE)?;
        let segment = required_child(response, FLIGHT_SEGMENT_INFO)?;

        let rows = response
            .descendants()
            .filter(|node| node.has_tag_name(ROW_INFO))
            .map(|row| extract_row(row, config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FlightRecord {
            flight_number: required_attr(segment, "FlightNumber")?.to_string(),
            departure_time: required_attr(segment, "DepartureDateTime")?.to_string(),
            departure_location: required_attr(
                required_child(segment, DEPARTURE_AIRPORT)?,
                "LocationCode",
            )?
            .to_string(),
            arrival_location: required_attr(
                required_child(segment, ARRIVAL_AIRPORT)?,
                "LocationCode",
            )?
            .to_string(),
            rows,
        })
    }
}

fn extract_row(row: Node<'_, '_>, config: &ExtractionConfig) -> Result<RowRecord, ExtractionError> {
    let row_number = required_attr(row, "RowNumber")?.to_string();
    let seats = row
        .descendants()
        .filter(|node| node.has_tag_name(SEAT_INFO))
        .map(|seat| extract_seat(seat, config))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(row = %row_number, seats = seats.len(), "extracted OTA row");

    Ok(RowRecord {
        row_number,
        cabin_class: row.attribute("CabinType").unwrap_or(NOT_AVAILABLE).to_string(),
        seats,
    })
}

fn extract_seat(seat: Node<'_, '_>, config: &ExtractionConfig) -> Result<SeatRecord, ExtractionError> {
    let summary = required_child(seat, SUMMARY)?;

    // Only seats that are for sale carry a Service/Fee
    let price = match child(seat, SERVICE) {
        Some(service) => Some(required_attr(required_child(service, FEE)?, "Amount")?.to_string()),
        None => None,
    };

    let mut record = SeatRecord::new(
        required_attr(summary, "SeatNumber")?.to_string(),
        summary.attribute("AvailableInd").unwrap_or(NOT_AVAILABLE).to_string(),
        price,
    );
    record.additional_info = additional_info(seat, config);
    Ok(record)
}

fn additional_info(seat: Node<'_, '_>, config: &ExtractionConfig) -> Map<String, serde_json::Value> {
    let mut info = Map::new();
    for (key, attribute) in [("planeSection", "PlaneSection"), ("inExitRow", "ExitRowInd")] {
        if let Some(value) = config.missing_values.render(seat.attribute(attribute)) {
            info.insert(key.to_string(), value);
        }
    }
    info
}
