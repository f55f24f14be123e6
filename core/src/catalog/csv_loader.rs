//! Semicolon-delimited static table loader (§6.2). Grounded on the
//! `csv` crate usage pattern in the retrieval pack; the teacher itself
//! has no file-format adapter since its agents/transactions are
//! constructed in-process.

use super::{Airport, AircraftType, CatalogDefaults, ConfigError, FlightTemplate, KitClassMeta, StaticCatalog};
use crate::models::class::{Class, ClassVec};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

pub struct CatalogPaths<'a> {
    pub airports: &'a Path,
    pub aircraft_types: &'a Path,
    pub flight_plan: &'a Path,
    /// Per-class kit cost/weight/lead-time. Not one of §6.2's three named
    /// tables; the catalog needs this data from somewhere and the spec is
    /// silent on its source table, so a fourth semicolon-delimited table
    /// is added here (see DESIGN.md).
    pub kit_classes: &'a Path,
}

pub fn load_from_csv(paths: CatalogPaths) -> Result<StaticCatalog, ConfigError> {
    let airports = load_airports(paths.airports)?;
    let aircraft = load_aircraft(paths.aircraft_types)?;
    let kit_meta = load_kit_classes(paths.kit_classes)?;
    let flights = load_flight_plan(paths.flight_plan)?;
    StaticCatalog::new(airports, aircraft, flights, kit_meta)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, ConfigError> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })
}

fn io_err(path: &Path, source: csv::Error) -> ConfigError {
    ConfigError::Io { path: path.display().to_string(), source }
}

fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers.iter().enumerate().map(|(i, h)| (h.trim().to_string(), i)).collect()
}

fn parse_f64(field: &str, row: usize, name: &'static str, default: f64) -> Result<f64, ConfigError> {
    if field.trim().is_empty() {
        tracing::warn!(row, field = name, default, "missing field, applying catalog default");
        return Ok(default);
    }
    field.trim().parse().map_err(|_| ConfigError::BadNumber { field: name, row, value: field.to_string() })
}

fn parse_i64(field: &str, row: usize, name: &'static str, default: i64) -> Result<i64, ConfigError> {
    if field.trim().is_empty() {
        tracing::warn!(row, field = name, default, "missing field, applying catalog default");
        return Ok(default);
    }
    field.trim().parse().map_err(|_| ConfigError::BadNumber { field: name, row, value: field.to_string() })
}

fn parse_u32(field: &str, row: usize, name: &'static str, default: u32) -> Result<u32, ConfigError> {
    if field.trim().is_empty() {
        tracing::warn!(row, field = name, default, "missing field, applying catalog default");
        return Ok(default);
    }
    field.trim().parse().map_err(|_| ConfigError::BadNumber { field: name, row, value: field.to_string() })
}

fn field<'r>(record: &'r csv::StringRecord, idx: &HashMap<String, usize>, key: &str) -> Option<&'r str> {
    idx.get(key).and_then(|&i| record.get(i))
}

fn class_vec_i64(
    record: &csv::StringRecord,
    idx: &HashMap<String, usize>,
    prefix: &'static str,
    row: usize,
    default: i64,
) -> Result<ClassVec<i64>, ConfigError> {
    let get = |suffix: &str| -> Result<i64, ConfigError> {
        match field(record, idx, &format!("{prefix}_{suffix}")) {
            Some(v) => parse_i64(v, row, prefix, default),
            None => Ok(default),
        }
    };
    Ok(ClassVec::new(get("first")?, get("business")?, get("premium_economy")?, get("economy")?))
}

fn class_vec_f64(
    record: &csv::StringRecord,
    idx: &HashMap<String, usize>,
    prefix: &'static str,
    row: usize,
    default: f64,
) -> Result<ClassVec<f64>, ConfigError> {
    let get = |suffix: &str| -> Result<f64, ConfigError> {
        match field(record, idx, &format!("{prefix}_{suffix}")) {
            Some(v) => parse_f64(v, row, prefix, default),
            None => Ok(default),
        }
    };
    Ok(ClassVec::new(get("first")?, get("business")?, get("premium_economy")?, get("economy")?))
}

fn class_vec_u32(
    record: &csv::StringRecord,
    idx: &HashMap<String, usize>,
    prefix: &'static str,
    row: usize,
    default: u32,
) -> Result<ClassVec<u32>, ConfigError> {
    let get = |suffix: &str| -> Result<u32, ConfigError> {
        match field(record, idx, &format!("{prefix}_{suffix}")) {
            Some(v) => parse_u32(v, row, prefix, default),
            None => Ok(default),
        }
    };
    Ok(ClassVec::new(get("first")?, get("business")?, get("premium_economy")?, get("economy")?))
}

fn load_airports(path: &Path) -> Result<Vec<Airport>, ConfigError> {
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| io_err(path, e))?.clone();
    let idx = header_index(&headers);
    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| io_err(path, e))?;
        let code = field(&record, &idx, "code").unwrap_or("").trim().to_string();
        if code.is_empty() {
            return Err(ConfigError::MissingAirportCode { row });
        }
        let is_hub = field(&record, &idx, "is_hub").map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes")).unwrap_or(false);
        let default_initial =
            if is_hub { CatalogDefaults::INITIAL_INVENTORY_HUB } else { CatalogDefaults::INITIAL_INVENTORY_OUTSTATION };
        out.push(Airport {
            code,
            is_hub,
            storage_capacity: class_vec_i64(&record, &idx, "storage_capacity", row, CatalogDefaults::STORAGE_CAPACITY)?,
            loading_cost: class_vec_f64(&record, &idx, "loading_cost", row, CatalogDefaults::LOADING_COST)?,
            processing_cost: class_vec_f64(&record, &idx, "processing_cost", row, CatalogDefaults::PROCESSING_COST)?,
            processing_hours: class_vec_u32(&record, &idx, "processing_time", row, CatalogDefaults::PROCESSING_HOURS)?,
            initial_inventory: class_vec_i64(&record, &idx, "initial_inventory", row, default_initial)?,
        });
    }
    Ok(out)
}

fn load_aircraft(path: &Path) -> Result<Vec<AircraftType>, ConfigError> {
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| io_err(path, e))?.clone();
    let idx = header_index(&headers);
    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| io_err(path, e))?;
        let code = field(&record, &idx, "type_code").unwrap_or("").trim().to_string();
        if code.is_empty() {
            return Err(ConfigError::MissingAircraftTypeCode { row });
        }
        let fuel_cost_per_km = match field(&record, &idx, "fuel_cost_per_km") {
            Some(v) => parse_f64(v, row, "fuel_cost_per_km", 0.0)?,
            None => 0.0,
        };
        out.push(AircraftType {
            code,
            kit_capacity: class_vec_i64(&record, &idx, "kit_capacity", row, CatalogDefaults::STORAGE_CAPACITY)?,
            fuel_cost_per_km,
        });
    }
    Ok(out)
}

fn load_kit_classes(path: &Path) -> Result<ClassVec<KitClassMeta>, ConfigError> {
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| io_err(path, e))?.clone();
    let idx = header_index(&headers);
    let empty = KitClassMeta { cost: 0.0, weight_kg: 1.0, lead_time_hours: 24 };
    let mut meta = ClassVec::new(empty, empty, empty, empty);
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| io_err(path, e))?;
        let class_name = field(&record, &idx, "class").unwrap_or("").trim().to_lowercase();
        let class = match class_name.as_str() {
            "first" => Class::First,
            "business" => Class::Business,
            "premium_economy" | "premiumeconomy" => Class::PremiumEconomy,
            "economy" => Class::Economy,
            other => {
                tracing::warn!(row, class = other, "unrecognized kit class, skipping row");
                continue;
            }
        };
        let cost = match field(&record, &idx, "cost") {
            Some(v) => parse_f64(v, row, "cost", 0.0)?,
            None => 0.0,
        };
        let weight_kg = match field(&record, &idx, "weight_kg") {
            Some(v) => parse_f64(v, row, "weight_kg", 1.0)?,
            None => 1.0,
        };
        let lead_time_hours = match field(&record, &idx, "lead_time_hours") {
            Some(v) => parse_u32(v, row, "lead_time_hours", 24)?,
            None => 24,
        };
        meta[class] = KitClassMeta { cost, weight_kg, lead_time_hours };
    }
    Ok(meta)
}

fn load_flight_plan(path: &Path) -> Result<Vec<FlightTemplate>, ConfigError> {
    let mut rdr = open(path)?;
    let headers = rdr.headers().map_err(|e| io_err(path, e))?.clone();
    let idx = header_index(&headers);
    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| io_err(path, e))?;
        let flight_id = field(&record, &idx, "flight_id").unwrap_or("").trim().to_string();
        if flight_id.is_empty() {
            return Err(ConfigError::MissingFlightId { row });
        }
        let flight_number = field(&record, &idx, "flight_number").unwrap_or("").trim().to_string();
        let origin = field(&record, &idx, "origin").unwrap_or("").trim().to_string();
        let destination = field(&record, &idx, "destination").unwrap_or("").trim().to_string();
        let dep_day = match field(&record, &idx, "scheduled_departure_day") {
            Some(v) => parse_u32(v, row, "scheduled_departure_day", 0)?,
            None => 0,
        };
        let dep_hour = match field(&record, &idx, "scheduled_departure_hour") {
            Some(v) => parse_u32(v, row, "scheduled_departure_hour", 0)?,
            None => 0,
        };
        let arr_day = match field(&record, &idx, "scheduled_arrival_day") {
            Some(v) => parse_u32(v, row, "scheduled_arrival_day", 0)?,
            None => 0,
        };
        let arr_hour = match field(&record, &idx, "scheduled_arrival_hour") {
            Some(v) => parse_u32(v, row, "scheduled_arrival_hour", 0)?,
            None => 0,
        };
        let planned_distance = match field(&record, &idx, "planned_distance") {
            Some(v) => parse_f64(v, row, "planned_distance", 0.0)?,
            None => 0.0,
        };
        let aircraft_type = field(&record, &idx, "aircraft_type").unwrap_or("").trim().to_string();
        out.push(FlightTemplate {
            flight_id,
            flight_number,
            origin,
            destination,
            scheduled_departure: crate::time::Clock::absolute_hour(dep_day, dep_hour),
            scheduled_arrival: crate::time::Clock::absolute_hour(arr_day, arr_hour),
            planned_passengers: class_vec_i64(&record, &idx, "planned_passengers", row, 0)?,
            planned_distance,
            aircraft_type,
        });
    }
    Ok(out)
}
