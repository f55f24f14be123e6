mod csv_loader;

pub use csv_loader::{load_from_csv, CatalogPaths};

use crate::models::class::{Class, ClassVec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no hub airport declared in the static catalog")]
    MissingHub,
    #[error("multiple hub airports declared: {0} and {1}")]
    DuplicateHub(String, String),
    #[error("flight {flight_id} references unknown aircraft type {aircraft_type}")]
    UnknownAircraftType { flight_id: String, aircraft_type: String },
    #[error("flight {flight_id} references unknown airport {airport}")]
    UnknownAirport { flight_id: String, airport: String },
    #[error("airport code missing or empty in row {row}")]
    MissingAirportCode { row: usize },
    #[error("aircraft type code missing or empty in row {row}")]
    MissingAircraftTypeCode { row: usize },
    #[error("flight id missing or empty in row {row}")]
    MissingFlightId { row: usize },
    #[error("failed to read static table {path}: {source}")]
    Io { path: String, #[source] source: csv::Error },
    #[error("malformed numeric field {field} in row {row}: {value}")]
    BadNumber { field: &'static str, row: usize, value: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KitClassMeta {
    pub cost: f64,
    pub weight_kg: f64,
    pub lead_time_hours: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub is_hub: bool,
    pub storage_capacity: ClassVec<i64>,
    pub loading_cost: ClassVec<f64>,
    pub processing_cost: ClassVec<f64>,
    pub processing_hours: ClassVec<u32>,
    pub initial_inventory: ClassVec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftType {
    pub code: String,
    pub kit_capacity: ClassVec<i64>,
    pub fuel_cost_per_km: f64,
}

/// Defaults applied to missing non-key per-class fields (§4.1). Surfaced
/// as warnings by the loader, never applied silently.
pub struct CatalogDefaults;

impl CatalogDefaults {
    pub const STORAGE_CAPACITY: i64 = 100;
    pub const LOADING_COST: f64 = 10.0;
    pub const PROCESSING_COST: f64 = 5.0;
    pub const PROCESSING_HOURS: u32 = 2;
    pub const INITIAL_INVENTORY_HUB: i64 = 50;
    pub const INITIAL_INVENTORY_OUTSTATION: i64 = 20;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightTemplate {
    pub flight_id: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: u32,
    pub scheduled_arrival: u32,
    pub planned_passengers: ClassVec<i64>,
    pub planned_distance: f64,
    pub aircraft_type: String,
}

/// Immutable, process-lifetime record of airports, aircraft types, the
/// flight schedule and kit-class metadata. Built once at session start;
/// every lookup is infallible once construction succeeds.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    airports: HashMap<String, Airport>,
    aircraft: HashMap<String, AircraftType>,
    flights: HashMap<String, FlightTemplate>,
    hub_code: String,
    kit_meta: ClassVec<KitClassMeta>,
}

impl StaticCatalog {
    pub fn new(
        airports: Vec<Airport>,
        aircraft: Vec<AircraftType>,
        flights: Vec<FlightTemplate>,
        kit_meta: ClassVec<KitClassMeta>,
    ) -> Result<Self, ConfigError> {
        let mut hub_code: Option<String> = None;
        let mut by_code = HashMap::new();
        for a in airports {
            if a.is_hub {
                if let Some(existing) = &hub_code {
                    return Err(ConfigError::DuplicateHub(existing.clone(), a.code.clone()));
                }
                hub_code = Some(a.code.clone());
            }
            by_code.insert(a.code.clone(), a);
        }
        let hub_code = hub_code.ok_or(ConfigError::MissingHub)?;

        let aircraft_by_code: HashMap<_, _> = aircraft.into_iter().map(|a| (a.code.clone(), a)).collect();

        for f in &flights {
            if !aircraft_by_code.contains_key(&f.aircraft_type) {
                return Err(ConfigError::UnknownAircraftType {
                    flight_id: f.flight_id.clone(),
                    aircraft_type: f.aircraft_type.clone(),
                });
            }
            if !by_code.contains_key(&f.origin) {
                return Err(ConfigError::UnknownAirport { flight_id: f.flight_id.clone(), airport: f.origin.clone() });
            }
            if !by_code.contains_key(&f.destination) {
                return Err(ConfigError::UnknownAirport { flight_id: f.flight_id.clone(), airport: f.destination.clone() });
            }
        }

        let flights_by_id = flights.into_iter().map(|f| (f.flight_id.clone(), f)).collect();

        Ok(Self { airports: by_code, aircraft: aircraft_by_code, flights: flights_by_id, hub_code, kit_meta })
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn aircraft(&self, code: &str) -> Option<&AircraftType> {
        self.aircraft.get(code)
    }

    pub fn flight_template(&self, flight_id: &str) -> Option<&FlightTemplate> {
        self.flights.get(flight_id)
    }

    pub fn kit_meta(&self, class: Class) -> &KitClassMeta {
        &self.kit_meta.values()[class.index()]
    }

    pub fn all_airports(&self) -> impl Iterator<Item = &Airport> {
        self.airports.values()
    }

    pub fn all_flights(&self) -> impl Iterator<Item = &FlightTemplate> {
        self.flights.values()
    }

    pub fn hub(&self) -> &Airport {
        self.airports.get(&self.hub_code).expect("hub code always resolves by construction")
    }

    pub fn hub_code(&self) -> &str {
        &self.hub_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(code: &str, is_hub: bool) -> Airport {
        Airport {
            code: code.to_string(),
            is_hub,
            storage_capacity: ClassVec::new(100, 100, 100, 100),
            loading_cost: ClassVec::new(10.0, 10.0, 10.0, 10.0),
            processing_cost: ClassVec::new(5.0, 5.0, 5.0, 5.0),
            processing_hours: ClassVec::new(2, 2, 2, 2),
            initial_inventory: ClassVec::new(50, 50, 50, 50),
        }
    }

    fn kit_meta() -> ClassVec<KitClassMeta> {
        let meta = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 24 };
        ClassVec::new(meta, meta, meta, meta)
    }

    #[test]
    fn rejects_missing_hub() {
        let err = StaticCatalog::new(vec![airport("X", false)], vec![], vec![], kit_meta()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingHub));
    }

    #[test]
    fn rejects_duplicate_hub() {
        let err = StaticCatalog::new(vec![airport("H1", true), airport("H2", true)], vec![], vec![], kit_meta()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateHub(_, _)));
    }

    #[test]
    fn resolves_hub_lookup() {
        let catalog = StaticCatalog::new(vec![airport("H", true), airport("X", false)], vec![], vec![], kit_meta()).unwrap();
        assert_eq!(catalog.hub().code, "H");
        assert_eq!(catalog.hub_code(), "H");
    }
}
