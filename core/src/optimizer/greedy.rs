//! A deterministic greedy baseline: reserve each loadable flight's
//! expected passenger load (plus a buffer on long legs) chronologically
//! against available inventory, then size a purchase order off
//! projected hub stock at each class's earliest possible delivery time.
//! Injected into every generation of the genetic search (§4.6) as a
//! monotone-non-worse floor.

use super::{Decision, OptimizationContext, MAX_PURCHASE_PER_CLASS};
use crate::catalog::StaticCatalog;
use crate::models::class::{Class, ClassVec};
use crate::models::mirror::MirrorState;
use std::collections::HashMap;

const BREAK_EVEN_DISTANCE_KM: f64 = 333.0;

pub fn baseline(ctx: &OptimizationContext) -> Decision {
    Decision { loads: greedy_loads(ctx), purchases: purchase_suggestion(ctx) }
}

fn greedy_loads(ctx: &OptimizationContext) -> HashMap<String, ClassVec<i64>> {
    let mut loads = HashMap::new();
    let mut reserved: HashMap<String, ClassVec<i64>> = HashMap::new();

    for flight_id in &ctx.horizon.loadable_flights {
        let Some(flight) = ctx.mirror.flight(flight_id) else { continue };
        let Some(origin) = ctx.catalog.airport(&flight.origin) else { continue };
        let Some(aircraft) = ctx.catalog.aircraft(&flight.aircraft_type_code) else { continue };
        let passengers = flight.effective_passengers();
        let distance = flight.effective_distance();
        let buffer = if distance >= BREAK_EVEN_DISTANCE_KM || !origin.is_hub { 1 } else { 0 };

        let already_reserved = reserved.get(&flight.origin).copied().unwrap_or_else(ClassVec::zero);
        let available = ctx.mirror.inventory_at(&flight.origin).sub(&already_reserved);

        let k = ClassVec::from_fn(|c| {
            let desired = passengers[c] + buffer;
            desired.min(aircraft.kit_capacity[c]).min(available[c].max(0))
        });

        let entry = reserved.entry(flight.origin.clone()).or_insert_with(ClassVec::zero);
        *entry = entry.add(&k);
        loads.insert(flight_id.clone(), k);
    }
    loads
}

/// The §4.6 purchase sub-policy, evaluated independently for each class.
pub(crate) fn purchase_suggestion(ctx: &OptimizationContext) -> ClassVec<i64> {
    let catalog = ctx.catalog;
    let mirror = ctx.mirror;
    let hub = catalog.hub();

    ClassVec::from_fn(|class| suggest_for_class(catalog, mirror, hub.code.as_str(), class))
}

fn suggest_for_class(catalog: &StaticCatalog, mirror: &MirrorState, hub_code: &str, class: Class) -> i64 {
    let meta = catalog.kit_meta(class);
    let hub = catalog.hub();
    let now = mirror.current_hour();
    let eta = now + meta.lead_time_hours + hub.processing_hours[class];

    let hub_inventory = mirror.inventory_at(hub_code)[class];
    let scheduled_arrivals = mirror.scheduled_deliveries_by(class, eta, catalog);
    let demand_before_eta = mirror.demand_before(class, eta);
    let stock_at_eta = hub_inventory + scheduled_arrivals - demand_before_eta;

    let mut quantity = if stock_at_eta < 0 {
        ((-stock_at_eta) as f64 * 1.3).ceil() as i64
    } else {
        let demand_next_48h = horizon_demand_window(mirror, class, eta, eta + 48);
        let half_threshold = (demand_next_48h as f64 * 0.5).ceil() as i64;
        if stock_at_eta < half_threshold {
            half_threshold - stock_at_eta
        } else {
            let demand_remaining = horizon_demand_window(mirror, class, now, now + crate::time::SESSION_LENGTH_HOURS);
            if hub_inventory < demand_remaining {
                demand_remaining - hub_inventory
            } else {
                0
            }
        }
    };

    let projected_hub_at_eta = hub_inventory + scheduled_arrivals;
    let headroom = (hub.storage_capacity[class] - projected_hub_at_eta).max(0);
    quantity = quantity.min(headroom).min(MAX_PURCHASE_PER_CLASS).max(0);
    quantity
}

fn horizon_demand_window(mirror: &MirrorState, class: Class, from: u32, to: u32) -> i64 {
    mirror
        .flights_iter()
        .filter(|f| f.scheduled_departure >= from && f.scheduled_departure < to)
        .map(|f| f.effective_passengers()[class])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AircraftType, Airport, KitClassMeta};
    use crate::horizon::HorizonView;
    use crate::models::flight::{Flight, Phase};
    use crate::models::mirror::MirrorEvent;
    use crate::costs::PenaltyRates;

    fn catalog() -> StaticCatalog {
        let meta = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 10 };
        let airport = |code: &str, is_hub: bool| Airport {
            code: code.to_string(),
            is_hub,
            storage_capacity: ClassVec::new(100, 100, 100, 100),
            loading_cost: ClassVec::new(10.0, 10.0, 10.0, 10.0),
            processing_cost: ClassVec::new(5.0, 5.0, 5.0, 5.0),
            processing_hours: ClassVec::new(2, 2, 2, 2),
            initial_inventory: ClassVec::new(5, 5, 5, 5),
        };
        let aircraft = AircraftType { code: "T1".into(), kit_capacity: ClassVec::new(2, 5, 3, 10), fuel_cost_per_km: 0.01 };
        StaticCatalog::new(
            vec![airport("H", true), airport("X", false)],
            vec![aircraft],
            vec![],
            ClassVec::new(meta, meta, meta, meta),
        )
        .unwrap()
    }

    #[test]
    fn greedy_never_exceeds_available_inventory_or_capacity() {
        let cat = catalog();
        let mut mirror = MirrorState::new(&cat);
        let mut f = Flight::new("F1".into(), "H".into(), "X".into(), 5, 10, "T1".into(), 500.0, ClassVec::new(10, 10, 10, 10));
        f.phase = Phase::CheckedIn;
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(f)]);
        let horizon = HorizonView { current_hour: 0, loadable_flights: vec!["F1".to_string()], forecast_demand: ClassVec::zero() };
        let ctx = OptimizationContext {
            catalog: &cat,
            mirror: &mirror,
            horizon: &horizon,
            penalty_rates: PenaltyRates::default(),
            purchase_horizon_hours: 72,
        };
        let loads = greedy_loads(&ctx);
        let k = loads["F1"];
        let aircraft = cat.aircraft("T1").unwrap();
        for c in Class::ALL {
            assert!(k[c] <= aircraft.kit_capacity[c]);
            assert!(k[c] <= 5);
        }
    }
}
