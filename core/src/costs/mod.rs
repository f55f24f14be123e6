//! The Cost/Penalty Model (C2): pure, referentially transparent functions
//! over plain data. The source of truth for the optimizer's objective —
//! grounded on the teacher's `CostRates`/`CostBreakdown` split between a
//! calibration struct and the formulas that consume it.

use crate::catalog::{AircraftType, Airport, KitClassMeta};
use crate::models::class::{Class, ClassVec};
use serde::{Deserialize, Serialize};

/// Calibration constants for the penalty model (§4.2), analogous to the
/// teacher's `CostRates`. Overridable from `RunConfig`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PenaltyRates {
    pub neg_factor: f64,
    pub over_factor: f64,
    pub overload_factor: f64,
    pub unful_factor: f64,
    pub incorrect_factor: f64,
}

impl Default for PenaltyRates {
    fn default() -> Self {
        Self {
            neg_factor: 1000.0,
            over_factor: 50.0,
            overload_factor: 5.0,
            unful_factor: 0.003,
            incorrect_factor: 10_000.0,
        }
    }
}

impl PenaltyRates {
    /// The distance at which loading one extra kit costs as much as the
    /// expected unfulfilled-passenger penalty for one unit of shortfall
    /// (§4.2) — ≈333km at the calibrated defaults.
    pub fn break_even_distance_km(&self) -> f64 {
        1.0 / self.unful_factor
    }
}

pub fn loading_cost(origin: &Airport, k: &ClassVec<i64>) -> f64 {
    Class::ALL.iter().map(|&c| k[c] as f64 * origin.loading_cost[c]).sum()
}

pub fn movement_cost(distance: f64, aircraft: &AircraftType, kit_meta: &ClassVec<KitClassMeta>, k: &ClassVec<i64>) -> f64 {
    let weight: f64 = Class::ALL.iter().map(|&c| k[c] as f64 * kit_meta[c].weight_kg).sum();
    distance * aircraft.fuel_cost_per_km * weight
}

pub fn processing_cost(destination: &Airport, k: &ClassVec<i64>) -> f64 {
    Class::ALL.iter().map(|&c| k[c] as f64 * destination.processing_cost[c]).sum()
}

pub fn purchase_cost(q: &ClassVec<i64>, kit_meta: &ClassVec<KitClassMeta>) -> f64 {
    Class::ALL.iter().map(|&c| q[c] as f64 * kit_meta[c].cost).sum()
}

pub fn negative_inventory_penalty(rates: &PenaltyRates, inv: &ClassVec<i64>) -> f64 {
    rates.neg_factor * Class::ALL.iter().map(|&c| (-inv[c]).max(0) as f64).sum::<f64>()
}

pub fn overstock_penalty(rates: &PenaltyRates, airport: &Airport, inv: &ClassVec<i64>) -> f64 {
    rates.over_factor * Class::ALL.iter().map(|&c| (inv[c] - airport.storage_capacity[c]).max(0) as f64).sum::<f64>()
}

pub fn overload_penalty(rates: &PenaltyRates, distance: f64, aircraft: &AircraftType, kit_meta: &ClassVec<KitClassMeta>, k: &ClassVec<i64>) -> f64 {
    rates.overload_factor
        * distance
        * aircraft.fuel_cost_per_km
        * Class::ALL.iter().map(|&c| kit_meta[c].cost * (k[c] - aircraft.kit_capacity[c]).max(0) as f64).sum::<f64>()
}

pub fn unfulfilled_penalty(rates: &PenaltyRates, distance: f64, kit_meta: &ClassVec<KitClassMeta>, passengers: &ClassVec<i64>, k: &ClassVec<i64>) -> f64 {
    rates.unful_factor * distance * Class::ALL.iter().map(|&c| kit_meta[c].cost * (passengers[c] - k[c]).max(0) as f64).sum::<f64>()
}

pub fn incorrect_load_penalty(rates: &PenaltyRates, count: u32) -> f64 {
    rates.incorrect_factor * count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport() -> Airport {
        Airport {
            code: "X".into(),
            is_hub: false,
            storage_capacity: ClassVec::new(10, 10, 10, 10),
            loading_cost: ClassVec::new(10.0, 10.0, 10.0, 10.0),
            processing_cost: ClassVec::new(5.0, 5.0, 5.0, 5.0),
            processing_hours: ClassVec::new(2, 2, 2, 2),
            initial_inventory: ClassVec::new(20, 20, 20, 20),
        }
    }

    fn aircraft() -> AircraftType {
        AircraftType { code: "T1".into(), kit_capacity: ClassVec::new(2, 5, 3, 10), fuel_cost_per_km: 0.01 }
    }

    fn kit_meta() -> ClassVec<KitClassMeta> {
        let meta = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 24 };
        ClassVec::new(meta, meta, meta, meta)
    }

    #[test]
    fn break_even_matches_calibrated_default() {
        let rates = PenaltyRates::default();
        assert!((rates.break_even_distance_km() - 333.333).abs() < 1.0);
    }

    #[test]
    fn overload_outweighs_unfulfilled_at_long_distance() {
        // S3: BUSINESS capacity 5, actual passengers 7, distance 2000km.
        let rates = PenaltyRates::default();
        let a = aircraft();
        let meta = kit_meta();
        let distance = 2000.0;
        let overloaded = ClassVec::new(0, 7, 0, 0);
        let capped = ClassVec::new(0, 5, 0, 0);
        let passengers = ClassVec::new(0, 7, 0, 0);

        let cost_overloaded = overload_penalty(&rates, distance, &a, &meta, &overloaded)
            + unfulfilled_penalty(&rates, distance, &meta, &passengers, &overloaded);
        let cost_capped = overload_penalty(&rates, distance, &a, &meta, &capped)
            + unfulfilled_penalty(&rates, distance, &meta, &passengers, &capped);

        assert!(cost_capped < cost_overloaded);
    }

    #[test]
    fn negative_and_overstock_penalties_are_zero_within_bounds() {
        let rates = PenaltyRates::default();
        let inv = ClassVec::new(5, 5, 5, 5);
        assert_eq!(negative_inventory_penalty(&rates, &inv), 0.0);
        assert_eq!(overstock_penalty(&rates, &airport(), &inv), 0.0);
    }
}
