//! The Event Ingestor (C4): a thin adapter translating the server's
//! round response into the mirror's event representation, then driving
//! `apply_events` + `advance_to`. Observation-only fields (cumulative
//! cost, server-issued penalties) never back-propagate into inventory.

use crate::catalog::StaticCatalog;
use crate::models::class::ClassVec;
use crate::models::flight::Flight;
use crate::models::mirror::{MirrorEvent, MirrorState};
use crate::time::Clock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHour {
    pub day: u32,
    pub hour: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePassengers {
    pub first: i64,
    pub business: i64,
    pub premium_economy: i64,
    pub economy: i64,
}

impl From<WirePassengers> for ClassVec<i64> {
    fn from(p: WirePassengers) -> Self {
        ClassVec::new(p.first, p.business, p.premium_economy, p.economy)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "eventType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightEvent {
    Scheduled(ScheduledPayload),
    CheckedIn(CheckedInPayload),
    Landed(LandedPayload),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPayload {
    pub flight_number: String,
    pub flight_id: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure: DayHour,
    pub arrival: DayHour,
    pub passengers: WirePassengers,
    pub aircraft_type: String,
    pub distance: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInPayload {
    pub flight_id: String,
    pub passengers: WirePassengers,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandedPayload {
    pub flight_id: String,
    pub arrival: DayHour,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub code: String,
    pub flight_id: Option<String>,
    pub flight_number: Option<String>,
    pub issued_day: u32,
    pub issued_hour: u32,
    pub penalty: f64,
    pub reason: String,
}

/// Translates wire events into the mirror's internal representation,
/// preserving the server's delivery order.
pub fn translate(events: &[FlightEvent]) -> Vec<MirrorEvent> {
    events
        .iter()
        .map(|e| match e {
            FlightEvent::Scheduled(p) => {
                let flight = Flight::new(
                    p.flight_id.clone(),
                    p.origin_airport.clone(),
                    p.destination_airport.clone(),
                    Clock::absolute_hour(p.departure.day, p.departure.hour),
                    Clock::absolute_hour(p.arrival.day, p.arrival.hour),
                    p.aircraft_type.clone(),
                    p.distance,
                    p.passengers.into(),
                );
                MirrorEvent::Scheduled(flight)
            }
            FlightEvent::CheckedIn(p) => {
                MirrorEvent::CheckedIn { flight_id: p.flight_id.clone(), actual_passengers: p.passengers.into(), actual_distance: p.distance }
            }
            FlightEvent::Landed(p) => {
                MirrorEvent::Landed { flight_id: p.flight_id.clone(), actual_arrival_hour: Clock::absolute_hour(p.arrival.day, p.arrival.hour) }
            }
        })
        .collect()
}

/// The observation-only parts of a round response: never fed back into
/// inventory, only exposed to the monitoring surface.
pub struct IngestOutcome {
    pub penalties: Vec<Penalty>,
}

/// Ingests one round response: translate, apply, advance, record
/// cumulative cost (§4.4).
pub fn ingest(
    mirror: &mut MirrorState,
    catalog: &StaticCatalog,
    events: &[FlightEvent],
    server_hour: u32,
    total_cost: f64,
    penalties: Vec<Penalty>,
) -> IngestOutcome {
    let translated = translate(events);
    mirror.apply_events(catalog, &translated);
    mirror.advance_to(catalog, server_hour + 1);
    mirror.set_cumulative_cost(total_cost);
    IngestOutcome { penalties }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_preserves_order_and_maps_fields() {
        let events = vec![FlightEvent::CheckedIn(CheckedInPayload {
            flight_id: "F1".into(),
            passengers: WirePassengers { first: 1, business: 2, premium_economy: 3, economy: 4 },
            distance: Some(510.0),
        })];
        let translated = translate(&events);
        assert_eq!(translated.len(), 1);
        match &translated[0] {
            MirrorEvent::CheckedIn { flight_id, actual_passengers, actual_distance } => {
                assert_eq!(flight_id, "F1");
                assert_eq!(actual_passengers.sum(), 10);
                assert_eq!(*actual_distance, Some(510.0));
            }
            _ => panic!("expected CheckedIn"),
        }
    }
}
