//! The Decision Optimizer (C6): turns a horizon view into a loading and
//! purchasing decision that minimizes the objective of §4.2, subject to
//! the hard constraints of §4.6. Two sub-modules implement the two
//! layers described there: a deterministic greedy baseline, and a
//! population-based search seeded on top of it.

pub mod genetic;
pub mod greedy;

use crate::catalog::{KitClassMeta, StaticCatalog};
use crate::costs::{self, PenaltyRates};
use crate::horizon::HorizonView;
use crate::models::class::{Class, ClassVec};
use crate::models::mirror::MirrorState;
use crate::models::movement::KitMovement;
use std::collections::HashMap;

/// The API's hard per-class purchase ceiling (§6.1).
pub const MAX_PURCHASE_PER_CLASS: i64 = 42_000;

/// A single round's decision: per-flight loads and one hub purchase
/// order.
#[derive(Debug, Clone, Default)]
pub struct Decision {
    pub loads: HashMap<String, ClassVec<i64>>,
    pub purchases: ClassVec<i64>,
}

pub struct OptimizationContext<'a> {
    pub catalog: &'a StaticCatalog,
    pub mirror: &'a MirrorState,
    pub horizon: &'a HorizonView,
    pub penalty_rates: PenaltyRates,
    pub purchase_horizon_hours: u32,
}

pub(crate) fn kit_meta_vec(catalog: &StaticCatalog) -> ClassVec<KitClassMeta> {
    ClassVec::from_fn(|c| *catalog.kit_meta(c))
}

/// The objective function (§4.2): sum of loading/movement/processing
/// costs and overload/unfulfilled penalties for every loadable flight,
/// the purchase cost, and a forward-projected capacity penalty over the
/// purchase horizon.
pub fn objective(ctx: &OptimizationContext, decision: &Decision) -> f64 {
    let meta = kit_meta_vec(ctx.catalog);
    let mut total = 0.0;

    for flight_id in &ctx.horizon.loadable_flights {
        let Some(flight) = ctx.mirror.flight(flight_id) else { continue };
        let Some(origin) = ctx.catalog.airport(&flight.origin) else { continue };
        let Some(destination) = ctx.catalog.airport(&flight.destination) else { continue };
        let Some(aircraft) = ctx.catalog.aircraft(&flight.aircraft_type_code) else { continue };
        let k = decision.loads.get(flight_id).copied().unwrap_or_else(ClassVec::zero);
        let passengers = flight.effective_passengers();
        let distance = flight.effective_distance();

        total += costs::loading_cost(origin, &k);
        total += costs::movement_cost(distance, aircraft, &meta, &k);
        total += costs::processing_cost(destination, &k);
        total += costs::overload_penalty(&ctx.penalty_rates, distance, aircraft, &meta, &k);
        total += costs::unfulfilled_penalty(&ctx.penalty_rates, distance, &meta, &passengers, &k);
    }

    total += costs::purchase_cost(&decision.purchases, &meta);
    total += project_capacity_penalties(ctx, decision);
    total
}

/// Projects per-airport inventory forward through the purchase horizon
/// by layering this round's loads/purchases on top of the mirror's
/// existing pending movements, accumulating negative-inventory and
/// overstock penalties at each hour boundary. A deliberate simplification
/// of a full discrete-event re-simulation (see DESIGN.md): only the two
/// capacity-bound penalties depend on projected inventory, so a direct
/// running-balance walk suffices without re-deriving flight phases.
fn project_capacity_penalties(ctx: &OptimizationContext, decision: &Decision) -> f64 {
    let mut inventory: HashMap<String, ClassVec<i64>> =
        ctx.catalog.all_airports().map(|a| (a.code.clone(), ctx.mirror.inventory_at(&a.code))).collect();

    for flight_id in &ctx.horizon.loadable_flights {
        let Some(flight) = ctx.mirror.flight(flight_id) else { continue };
        let k = decision.loads.get(flight_id).copied().unwrap_or_else(ClassVec::zero);
        let entry = inventory.entry(flight.origin.clone()).or_insert_with(ClassVec::zero);
        *entry = entry.sub(&k);
    }

    let mut scheduled: HashMap<(u32, String), ClassVec<i64>> = HashMap::new();
    for m in ctx.mirror.pending_movements() {
        match m {
            KitMovement::Processing { airport, ready_hour, quantities } => {
                let slot = scheduled.entry((*ready_hour, airport.clone())).or_insert_with(ClassVec::zero);
                *slot = slot.add(quantities);
            }
            KitMovement::PurchaseDelivery { ready_hour, quantities } => {
                let slot = scheduled.entry((*ready_hour, ctx.catalog.hub_code().to_string())).or_insert_with(ClassVec::zero);
                *slot = slot.add(quantities);
            }
            KitMovement::InTransit { .. } => {}
        }
    }
    for class in Class::ALL {
        let qty = decision.purchases[class];
        if qty == 0 {
            continue;
        }
        let ready_hour =
            ctx.mirror.current_hour() + ctx.catalog.kit_meta(class).lead_time_hours + ctx.catalog.hub().processing_hours[class];
        let mut per_class = ClassVec::zero();
        per_class[class] = qty;
        let slot = scheduled.entry((ready_hour, ctx.catalog.hub_code().to_string())).or_insert_with(ClassVec::zero);
        *slot = slot.add(&per_class);
    }

    let end = ctx.mirror.current_hour() + ctx.purchase_horizon_hours;

    let mut penalty = 0.0;
    for hour in (ctx.mirror.current_hour() + 1)..=end {
        for (code, airport) in ctx.catalog.all_airports().map(|a| (a.code.clone(), a)) {
            if let Some(delta) = scheduled.get(&(hour, code.clone())) {
                let entry = inventory.entry(code.clone()).or_insert_with(ClassVec::zero);
                *entry = entry.add(delta);
            }
            let inv = inventory.get(&code).copied().unwrap_or_else(ClassVec::zero);
            penalty += costs::negative_inventory_penalty(&ctx.penalty_rates, &inv);
            penalty += costs::overstock_penalty(&ctx.penalty_rates, airport, &inv);
        }
    }
    penalty
}
