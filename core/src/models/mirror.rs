//! The State Mirror (C3): a time-indexed projection of inventories,
//! in-transit/processing movements and pending purchases, reconstructed
//! incrementally from the server's event stream. Grounded on the
//! teacher's `SimulationState` (single-writer, event-driven, referential
//! integrity checked at construction and on replay).

use super::class::{Class, ClassVec};
use super::flight::{Flight, Phase};
use super::movement::KitMovement;
use crate::catalog::StaticCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The mirror's input contract: the three event kinds the server can
/// report (§4.3). DEPARTED is not listed here — it is implicit, applied
/// during `advance_to` once a CHECKED_IN flight's scheduled_departure is
/// reached.
#[derive(Debug, Clone)]
pub enum MirrorEvent {
    Scheduled(Flight),
    CheckedIn { flight_id: String, actual_passengers: ClassVec<i64>, actual_distance: Option<f64> },
    Landed { flight_id: String, actual_arrival_hour: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorAnomalyKind {
    UnknownFlight,
    PhaseRegression,
    NegativeBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorAnomaly {
    pub kind: MirrorAnomalyKind,
    pub flight_id: Option<String>,
    pub airport: Option<String>,
    pub hour: u32,
}

const ANOMALY_LOG_CAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorState {
    current_hour: u32,
    inventory: HashMap<String, ClassVec<i64>>,
    pending: Vec<KitMovement>,
    flights: HashMap<String, Flight>,
    cumulative_cost: f64,
    anomalies: Vec<MirrorAnomaly>,
}

impl MirrorState {
    /// Seeds inventory from the catalog's initial per-airport figures.
    /// Called once at session start (lifecycle note, §3).
    pub fn new(catalog: &StaticCatalog) -> Self {
        let inventory = catalog.all_airports().map(|a| (a.code.clone(), a.initial_inventory)).collect();
        Self {
            current_hour: 0,
            inventory,
            pending: Vec::new(),
            flights: HashMap::new(),
            cumulative_cost: 0.0,
            anomalies: Vec::new(),
        }
    }

    pub fn current_hour(&self) -> u32 {
        self.current_hour
    }

    pub fn cumulative_cost(&self) -> f64 {
        self.cumulative_cost
    }

    pub fn set_cumulative_cost(&mut self, cost: f64) {
        self.cumulative_cost = cost;
    }

    pub fn flight(&self, flight_id: &str) -> Option<&Flight> {
        self.flights.get(flight_id)
    }

    pub fn flights_iter(&self) -> impl Iterator<Item = &Flight> {
        self.flights.values()
    }

    pub fn inventory_at(&self, airport_code: &str) -> ClassVec<i64> {
        self.inventory.get(airport_code).copied().unwrap_or_else(ClassVec::zero)
    }

    pub fn pending_movements(&self) -> &[KitMovement] {
        &self.pending
    }

    pub fn anomalies(&self) -> &[MirrorAnomaly] {
        &self.anomalies
    }

    fn push_anomaly(&mut self, kind: MirrorAnomalyKind, flight_id: Option<String>, airport: Option<String>) {
        self.anomalies.push(MirrorAnomaly { kind, flight_id, airport, hour: self.current_hour });
        if self.anomalies.len() > ANOMALY_LOG_CAP {
            let overflow = self.anomalies.len() - ANOMALY_LOG_CAP;
            self.anomalies.drain(0..overflow);
        }
    }

    /// Applies a batch of events in the order the server delivered them
    /// (§4.3). Never panics on inconsistent projection — records a
    /// `MirrorAnomaly` and continues with the server's state as truth.
    pub fn apply_events(&mut self, catalog: &StaticCatalog, events: &[MirrorEvent]) {
        for event in events {
            match event {
                MirrorEvent::Scheduled(flight) => self.apply_scheduled(flight.clone()),
                MirrorEvent::CheckedIn { flight_id, actual_passengers, actual_distance } => {
                    self.apply_checked_in(flight_id, *actual_passengers, *actual_distance)
                }
                MirrorEvent::Landed { flight_id, actual_arrival_hour } => {
                    self.apply_landed(catalog, flight_id, *actual_arrival_hour)
                }
            }
        }
    }

    fn apply_scheduled(&mut self, flight: Flight) {
        if let Some(existing) = self.flights.get(&flight.id) {
            if existing.phase != Phase::Announced {
                let id = flight.id.clone();
                self.push_anomaly(MirrorAnomalyKind::PhaseRegression, Some(id), None);
                return;
            }
        }
        self.flights.insert(flight.id.clone(), flight);
    }

    fn apply_checked_in(&mut self, flight_id: &str, actual_passengers: ClassVec<i64>, actual_distance: Option<f64>) {
        match self.flights.get_mut(flight_id) {
            Some(f) => {
                f.phase = Phase::CheckedIn;
                f.actual_passengers = Some(actual_passengers);
                if let Some(d) = actual_distance {
                    f.actual_distance = Some(d);
                }
            }
            None => self.push_anomaly(MirrorAnomalyKind::UnknownFlight, Some(flight_id.to_string()), None),
        }
    }

    fn apply_landed(&mut self, catalog: &StaticCatalog, flight_id: &str, actual_arrival_hour: u32) {
        let destination = match self.flights.get_mut(flight_id) {
            Some(f) => {
                f.phase = Phase::Landed;
                f.destination.clone()
            }
            None => {
                self.push_anomaly(MirrorAnomalyKind::UnknownFlight, Some(flight_id.to_string()), None);
                return;
            }
        };

        let mut removed_quantities = None;
        self.pending.retain(|m| match m {
            KitMovement::InTransit { flight_id: id, quantities, .. } if id == flight_id => {
                removed_quantities = Some(*quantities);
                false
            }
            _ => true,
        });

        let Some(quantities) = removed_quantities else {
            self.push_anomaly(MirrorAnomalyKind::UnknownFlight, Some(flight_id.to_string()), Some(destination));
            return;
        };

        if let Some(airport) = catalog.airport(&destination) {
            for class in Class::ALL {
                let qty = quantities[class];
                if qty == 0 {
                    continue;
                }
                let ready_hour = actual_arrival_hour + airport.processing_hours[class];
                let mut per_class = ClassVec::zero();
                per_class[class] = qty;
                self.pending.push(KitMovement::Processing { airport: destination.clone(), ready_hour, quantities: per_class });
            }
        }
    }

    /// Advances the mirror hour by hour up to `h`, processing implicit
    /// departures and due movements at each boundary and evaluating I3
    /// (§4.3). `h` must not regress (I-P2).
    pub fn advance_to(&mut self, catalog: &StaticCatalog, h: u32) {
        assert!(h >= self.current_hour, "advance_to must not move backwards");
        for hour in (self.current_hour + 1)..=h {
            self.process_departures(hour);
            self.process_movements_due(catalog, hour);
            self.evaluate_negative_balances(hour);
        }
        self.current_hour = h;
    }

    fn process_departures(&mut self, hour: u32) {
        let departing: Vec<String> =
            self.flights.values().filter(|f| f.phase == Phase::CheckedIn && f.scheduled_departure == hour).map(|f| f.id.clone()).collect();

        for id in departing {
            let (destination, arrive_hour, k) = {
                let f = self.flights.get_mut(&id).expect("collected id exists in self.flights");
                let k = f.committed_load.unwrap_or_else(ClassVec::zero);
                f.phase = Phase::Departed;
                (f.destination.clone(), f.scheduled_arrival, k)
            };
            // k was already reserved out of origin inventory by commit_load;
            // departure just moves the reservation into the InTransit queue.
            self.pending.push(KitMovement::InTransit { flight_id: id, destination, arrive_hour, quantities: k });
        }
    }

    fn process_movements_due(&mut self, catalog: &StaticCatalog, hour: u32) {
        let mut due = Vec::new();
        self.pending.retain(|m| {
            if m.ready_hour() == hour {
                due.push(m.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        for m in due {
            match m {
                KitMovement::InTransit { .. } => {
                    // arrival alone schedules nothing; processing begins at LANDED.
                }
                KitMovement::Processing { airport, quantities, .. } => {
                    let inv = self.inventory.entry(airport).or_insert_with(ClassVec::zero);
                    *inv = inv.add(&quantities);
                }
                KitMovement::PurchaseDelivery { quantities, .. } => {
                    let inv = self.inventory.entry(catalog.hub_code().to_string()).or_insert_with(ClassVec::zero);
                    *inv = inv.add(&quantities);
                }
            }
        }
    }

    fn evaluate_negative_balances(&mut self, hour: u32) {
        let negatives: Vec<String> =
            self.inventory.iter().filter(|(_, inv)| !inv.is_all_nonneg()).map(|(code, _)| code.clone()).collect();
        for airport in negatives {
            self.anomalies.push(MirrorAnomaly {
                kind: MirrorAnomalyKind::NegativeBalance,
                flight_id: None,
                airport: Some(airport),
                hour,
            });
        }
        if self.anomalies.len() > ANOMALY_LOG_CAP {
            let overflow = self.anomalies.len() - ANOMALY_LOG_CAP;
            self.anomalies.drain(0..overflow);
        }
    }

    /// Commits a load decision for `flight_id`, reserving K at origin
    /// immediately. A second commit for the same flight overwrites the
    /// first rather than adding to it (§9's Open Question resolution).
    pub fn commit_load(&mut self, flight_id: &str, k: ClassVec<i64>) {
        let Some(origin) = self.flights.get(flight_id).map(|f| f.origin.clone()) else {
            self.push_anomaly(MirrorAnomalyKind::UnknownFlight, Some(flight_id.to_string()), None);
            return;
        };
        let previous = self.flights.get(flight_id).and_then(|f| f.committed_load);
        let inv = self.inventory.entry(origin).or_insert_with(ClassVec::zero);
        if let Some(prev) = previous {
            *inv = inv.add(&prev);
        }
        *inv = inv.sub(&k);
        if let Some(f) = self.flights.get_mut(flight_id) {
            f.committed_load = Some(k);
        }
    }

    /// Commits a purchase order, splitting it into up to four
    /// `PurchaseDelivery` movements. A class-`c` purchase becomes
    /// available no earlier than `lead_time[c] + hub.processing_hours[c]`
    /// after the order is placed (B2) — the hub still has to process
    /// newly arrived stock before it is loadable.
    pub fn commit_purchase(&mut self, catalog: &StaticCatalog, q: ClassVec<i64>) {
        let hub_processing = catalog.hub().processing_hours;
        for class in Class::ALL {
            let qty = q[class];
            if qty == 0 {
                continue;
            }
            let ready_hour = self.current_hour + catalog.kit_meta(class).lead_time_hours + hub_processing[class];
            let mut per_class = ClassVec::zero();
            per_class[class] = qty;
            self.pending.push(KitMovement::PurchaseDelivery { ready_hour, quantities: per_class });
        }
    }

    pub fn total_inventory(&self) -> i64 {
        self.inventory.values().map(|v| v.sum()).sum()
    }

    /// Everything not sitting in an airport's free inventory but already
    /// committed into the pool: movements in transit, awaiting hub
    /// processing or delivery, plus loads committed but not yet departed
    /// (reserved out of origin inventory by `commit_load`, but not yet an
    /// InTransit movement) — so `total_inventory() + total_pending()` is
    /// conserved from the moment a purchase or load is committed onward:
    /// `advance_to` only moves committed quantities between buckets, it
    /// never creates or destroys them.
    pub fn total_pending(&self) -> i64 {
        let queued: i64 = self
            .pending
            .iter()
            .map(|m| match m {
                KitMovement::InTransit { quantities, .. } => quantities.sum(),
                KitMovement::Processing { quantities, .. } => quantities.sum(),
                KitMovement::PurchaseDelivery { quantities, .. } => quantities.sum(),
            })
            .sum();
        let reserved: i64 = self
            .flights
            .values()
            .filter(|f| !f.has_departed())
            .filter_map(|f| f.committed_load)
            .map(|k| k.sum())
            .sum();
        queued + reserved
    }

    pub fn scheduled_deliveries_by(&self, class: Class, eta: u32, catalog: &StaticCatalog) -> i64 {
        let hub_code = catalog.hub_code();
        self.pending
            .iter()
            .filter_map(|m| match m {
                KitMovement::Processing { airport, ready_hour, quantities } if airport == hub_code && *ready_hour <= eta => {
                    Some(quantities[class])
                }
                KitMovement::PurchaseDelivery { ready_hour, quantities } if *ready_hour <= eta => Some(quantities[class]),
                _ => None,
            })
            .sum()
    }

    pub fn demand_before(&self, class: Class, eta: u32) -> i64 {
        self.flights.values().filter(|f| f.scheduled_departure < eta).map(|f| f.effective_passengers()[class]).sum()
    }
}
