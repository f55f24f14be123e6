//! The Horizon View (C5): a read-only projection over the mirror's
//! flights, narrowing the world down to what the optimizer needs this
//! round — the flights that can still be loaded, and the demand a
//! purchase placed now could possibly arrive in time to cover.

use crate::catalog::StaticCatalog;
use crate::models::class::ClassVec;
use crate::models::mirror::MirrorState;
use serde::{Deserialize, Serialize};

/// Window sizes for the two horizon projections (§4.5), overridable
/// from `RunConfig`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HorizonConfig {
    pub load_hours: u32,
    pub purchase_hours: u32,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self { load_hours: 6, purchase_hours: 72 }
    }
}

#[derive(Debug, Clone)]
pub struct HorizonView {
    pub current_hour: u32,
    /// CHECKED_IN flights departing within `load_hours`, chronological.
    pub loadable_flights: Vec<String>,
    /// Per-class passenger demand over `purchase_hours`, excluding
    /// flights a purchase placed now could not possibly reach.
    pub forecast_demand: ClassVec<i64>,
}

pub fn compute(catalog: &StaticCatalog, mirror: &MirrorState, current_hour: u32, config: HorizonConfig) -> HorizonView {
    let load_end = current_hour + config.load_hours;
    let mut loadable: Vec<(u32, String)> = mirror
        .flights_iter()
        .filter(|f| f.is_loadable() && f.scheduled_departure >= current_hour && f.scheduled_departure < load_end)
        .map(|f| (f.scheduled_departure, f.id.clone()))
        .collect();
    loadable.sort();
    let loadable_flights = loadable.into_iter().map(|(_, id)| id).collect();

    let purchase_end = current_hour + config.purchase_hours;
    let hub = catalog.hub();
    let forecast_demand = ClassVec::from_fn(|class| {
        let reachable_from = current_hour + catalog.kit_meta(class).lead_time_hours + hub.processing_hours[class];
        mirror
            .flights_iter()
            .filter(|f| {
                f.scheduled_departure >= current_hour.max(reachable_from) && f.scheduled_departure < purchase_end
            })
            .map(|f| f.effective_passengers()[class])
            .sum()
    });

    HorizonView { current_hour, loadable_flights, forecast_demand }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class::Class as C;
    use crate::models::flight::{Flight, Phase};
    use crate::models::mirror::MirrorEvent;
    use crate::catalog::{AircraftType, Airport, FlightTemplate, KitClassMeta};

    fn catalog() -> StaticCatalog {
        let meta = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 10 };
        let airport = |code: &str, is_hub: bool| Airport {
            code: code.to_string(),
            is_hub,
            storage_capacity: ClassVec::new(100, 100, 100, 100),
            loading_cost: ClassVec::new(10.0, 10.0, 10.0, 10.0),
            processing_cost: ClassVec::new(5.0, 5.0, 5.0, 5.0),
            processing_hours: ClassVec::new(2, 2, 2, 2),
            initial_inventory: ClassVec::new(50, 50, 50, 50),
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

    fn flight(id: &str, dep: u32, phase: Phase) -> Flight {
        let mut f = Flight::new(id.into(), "H".into(), "X".into(), dep, dep + 5, "T1".into(), 500.0, ClassVec::new(1, 1, 1, 1));
        f.phase = phase;
        f
    }

    #[test]
    fn loadable_window_excludes_non_checked_in_and_out_of_window() {
        let cat = catalog();
        let mut mirror = MirrorState::new(&cat);
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(flight("F1", 5, Phase::CheckedIn))]);
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(flight("F2", 5, Phase::Announced))]);
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(flight("F3", 50, Phase::CheckedIn))]);
        let view = compute(&cat, &mirror, 0, HorizonConfig::default());
        assert_eq!(view.loadable_flights, vec!["F1".to_string()]);
    }

    #[test]
    fn forecast_excludes_flights_unreachable_by_purchase() {
        let cat = catalog();
        let mut mirror = MirrorState::new(&cat);
        // lead_time=10, hub processing_hours=2 -> reachable_from = 0+10+2 = 12
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(flight("F1", 5, Phase::CheckedIn))]);
        mirror.apply_events(&cat, &[MirrorEvent::Scheduled(flight("F2", 20, Phase::CheckedIn))]);
        let view = compute(&cat, &mirror, 0, HorizonConfig::default());
        assert_eq!(view.forecast_demand[C::First], 1);
    }
}
