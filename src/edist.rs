// IATA EDIST seat availability rules
//
// Prices live in the ALaCarteOffer catalogue and seat properties in the
// SeatDefinitionList; seats only carry references into both, so the two
// indices are built once per document before any row is read.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::ExtractionConfig;
use crate::dialect::{Dialect, DialectExtractor};
use crate::document::{
    child, find, required_attr, required_child, required_find, required_text, Document, Name, Node,
};
use crate::error::{ExtractionError, ReferenceKind};
use crate::model::{FlightRecord, RowRecord, SeatRecord, NOT_AVAILABLE};

pub const EDIST_NAMESPACE: &str = "http://www.iata.org/IATA/EDIST/2017.2";

// Seat definition that marks a seat as available for selection
pub const AVAILABLE_SEAT_DEFINITION: &str = "SD4";

const ALACARTE_OFFER: Name = (EDIST_NAMESPACE, "ALaCarteOffer");
const SIMPLE_CURRENCY_PRICE: Name = (EDIST_NAMESPACE, "SimpleCurrencyPrice");
const SEAT_DEFINITION_LIST: Name = (EDIST_NAMESPACE, "SeatDefinitionList");
const TEXT: Name = (EDIST_NAMESPACE, "Text");
const FLIGHT_NUMBER: Name = (EDIST_NAMESPACE, "FlightNumber");
const DEPARTURE: Name = (EDIST_NAMESPACE, "Departure");
const ARRIVAL: Name = (EDIST_NAMESPACE, "Arrival");
const DATE: Name = (EDIST_NAMESPACE, "Date");
const TIME: Name = (EDIST_NAMESPACE, "Time");
const AIRPORT_CODE: Name = (EDIST_NAMESPACE, "AirportCode");
const ROW: Name = (EDIST_NAMESPACE, "Row");
const NUMBER: Name = (EDIST_NAMESPACE, "Number");
const SEAT: Name = (EDIST_NAMESPACE, "Seat");
const COLUMN: Name = (EDIST_NAMESPACE, "Column");
const SEAT_DEFINITION_REF: Name = (EDIST_NAMESPACE, "SeatDefinitionRef");
const OFFER_ITEM_REFS: Name = (EDIST_NAMESPACE, "OfferItemRefs");

#[derive(Debug, Clone, Copy, Default)]
pub struct EdistExtractor;

impl DialectExtractor for EdistExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Edist
    }

    fn detect(&self, document: &Document<'_>) -> bool {
        document.descendants().any(|node| {
            node.has_tag_name(ALACARTE_OFFER) || node.has_tag_name(SEAT_DEFINITION_LIST)
        })
    }

    fn extract(
        &self,
        document: &Document<'_>,
        _config: &ExtractionConfig,
    ) -> Result<FlightRecord, ExtractionError> {
        let root = document.root();
        let offers = OfferPriceIndex::build(document)?;
        let definitions =
            SeatDefinitionIndex::build(required_find(root, SEAT_DEFINITION_LIST)?)?;
        debug!(
            offer_items = offers.len(),
            seat_definitions = definitions.len(),
            "built EDIST reference indices"
        );

        let departure = required_find(root, DEPARTURE)?;
        let arrival = required_find(root, ARRIVAL)?;

        let rows = root
            .descendants()
            .filter(|node| node.has_tag_name(ROW))
            .map(|row| extract_row(row, &offers, &definitions))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FlightRecord {
            flight_number: required_text(required_find(root, FLIGHT_NUMBER)?)?.to_string(),
            // date and time are joined verbatim, no parsing
            departure_time: format!(
                "{}{}",
                required_text(required_child(departure, DATE)?)?,
                required_text(required_child(departure, TIME)?)?
            ),
            departure_location: required_text(required_child(departure, AIRPORT_CODE)?)?
                .to_string(),
            arrival_location: required_text(required_child(arrival, AIRPORT_CODE)?)?.to_string(),
            rows,
        })
    }
}

// Offer item id to price text, from the document's a-la-carte catalogue
#[derive(Debug, Default)]
pub struct OfferPriceIndex {
    prices: HashMap<String, String>,
}

impl OfferPriceIndex {
    // A document without an ALaCarteOffer yields an empty index
    pub fn build(document: &Document<'_>) -> Result<Self, ExtractionError> {
        let mut prices = HashMap::new();
        if let Some(offer) = find(document.root(), ALACARTE_OFFER) {
            for item in offer.children().filter(Node::is_element) {
                let id = required_attr(item, "OfferItemID")?;
                let price = required_text(required_find(item, SIMPLE_CURRENCY_PRICE)?)?;
                prices.insert(id.to_string(), price.to_string());
            }
        }
        Ok(Self { prices })
    }

    pub fn price(&self, offer_item_id: &str) -> Option<&str> {
        self.prices.get(offer_item_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn resolve(&self, offer_item_id: &str) -> Result<String, ExtractionError> {
        self.price(offer_item_id)
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::UnresolvedReference {
                kind: ReferenceKind::OfferItem,
                id: offer_item_id.to_string(),
            })
    }
}

// Seat definitions in list order, indexed by SeatDefinitionID.
// Every definition sharing an id is kept.
#[derive(Debug, Default)]
pub struct SeatDefinitionIndex {
    descriptions: Vec<String>,
    positions: HashMap<String, Vec<usize>>,
}

impl SeatDefinitionIndex {
    pub fn build(list: Node<'_, '_>) -> Result<Self, ExtractionError> {
        let mut index = Self::default();
        for definition in list.children().filter(Node::is_element) {
            let id = required_attr(definition, "SeatDefinitionID")?;
            let description = required_text(required_find(definition, TEXT)?)?;
            index
                .positions
                .entry(id.to_string())
                .or_default()
                .push(index.descriptions.len());
            index.descriptions.push(description.to_string());
        }
        Ok(index)
    }

    // Number of definitions in the list
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    // Descriptions of the referenced definitions, ordered as in the list
    // rather than as referenced
    pub fn describe(&self, references: &[&str]) -> Result<Vec<String>, ExtractionError> {
        let mut positions = Vec::new();
        for id in references {
            let matches = self.positions.get(*id).ok_or_else(|| {
                ExtractionError::UnresolvedReference {
                    kind: ReferenceKind::SeatDefinition,
                    id: id.to_string(),
                }
            })?;
            positions.extend_from_slice(matches);
        }
        positions.sort_unstable();
        positions.dedup();

        Ok(positions
            .into_iter()
            .map(|position| self.descriptions[position].clone())
            .collect())
    }
}

fn extract_row(
    row: Node<'_, '_>,
    offers: &OfferPriceIndex,
    definitions: &SeatDefinitionIndex,
) -> Result<RowRecord, ExtractionError> {
    let row_number = required_text(required_child(row, NUMBER)?)?.to_string();
    let seats = row
        .descendants()
        .filter(|node| node.has_tag_name(SEAT))
        .map(|seat| extract_seat(seat, &row_number, offers, definitions))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(row = %row_number, seats = seats.len(), "extracted EDIST row");

    Ok(RowRecord {
        row_number,
        // cabin is not encoded per row in this dialect
        cabin_class: NOT_AVAILABLE.to_string(),
        seats,
    })
}

fn extract_seat(
    seat: Node<'_, '_>,
    row_number: &str,
    offers: &OfferPriceIndex,
    definitions: &SeatDefinitionIndex,
) -> Result<SeatRecord, ExtractionError> {
    let column = required_text(required_child(seat, COLUMN)?)?;
    let references = seat
        .children()
        .filter(|node| node.has_tag_name(SEAT_DEFINITION_REF))
        .map(required_text)
        .collect::<Result<Vec<_>, _>>()?;

    let properties = definitions.describe(&references)?;
    let available = references.contains(&AVAILABLE_SEAT_DEFINITION);
    let price = child(seat, OFFER_ITEM_REFS)
        .map(|offer_ref| required_text(offer_ref).and_then(|id| offers.resolve(id)))
        .transpose()?;

    let mut record = SeatRecord::new(
        format!("{}{}", row_number, column),
        availability_text(available).to_string(),
        price,
    );
    record.additional_info = Map::from_iter([(
        "seatProperties".to_string(),
        Value::from(properties),
    )]);
    Ok(record)
}

fn availability_text(available: bool) -> &'static str {
    if available {
        "True"
    } else {
        "False"
    }
}
