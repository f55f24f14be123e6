//! Literal scenario tests drawn from the engine's acceptance scenarios:
//! concrete networks with concrete numbers, checked against concrete
//! expected outcomes rather than property-style invariants.

use kitctl_core::catalog::{AircraftType, Airport, FlightTemplate, KitClassMeta, StaticCatalog};
use kitctl_core::costs::PenaltyRates;
use kitctl_core::horizon::{self, HorizonConfig};
use kitctl_core::models::{Class, ClassVec, Flight, MirrorState, Phase};
use kitctl_core::models::mirror::MirrorEvent;
use kitctl_core::optimizer::{greedy, OptimizationContext};
use kitctl_core::validator;

fn airport(code: &str, is_hub: bool, initial: ClassVec<i64>) -> Airport {
    Airport {
        code: code.to_string(),
        is_hub,
        storage_capacity: ClassVec::new(1000, 1000, 1000, 1000),
        loading_cost: ClassVec::new(10.0, 10.0, 10.0, 10.0),
        processing_cost: ClassVec::new(5.0, 5.0, 5.0, 5.0),
        processing_hours: ClassVec::new(2, 2, 2, 2),
        initial_inventory: initial,
    }
}

fn aircraft(code: &str, capacity: ClassVec<i64>) -> AircraftType {
    AircraftType { code: code.to_string(), kit_capacity: capacity, fuel_cost_per_km: 0.01 }
}

fn default_kit_meta() -> ClassVec<KitClassMeta> {
    let meta = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 24 };
    ClassVec::new(meta, meta, meta, meta)
}

/// S1: a single checked-in flight is loaded with its exact passenger
/// count plus at most a one-unit long-haul buffer per class, never
/// exceeding aircraft capacity, and the committed load reserves
/// inventory immediately.
#[test]
fn s1_baseline_round_loads_passengers_plus_bounded_buffer() {
    let catalog = StaticCatalog::new(
        vec![airport("H", true, ClassVec::new(10, 10, 10, 50)), airport("X", false, ClassVec::new(5, 5, 5, 5))],
        vec![aircraft("T", ClassVec::new(2, 5, 3, 10))],
        vec![FlightTemplate {
            flight_id: "F".into(),
            flight_number: "AB1".into(),
            origin: "H".into(),
            destination: "X".into(),
            scheduled_departure: 5,
            scheduled_arrival: 10,
            planned_passengers: ClassVec::new(1, 3, 2, 8),
            planned_distance: 500.0,
            aircraft_type: "T".into(),
        }],
        default_kit_meta(),
    )
    .unwrap();

    let mut mirror = MirrorState::new(&catalog);
    let template = catalog.flight_template("F").unwrap().clone();
    let flight = Flight::new(
        template.flight_id,
        template.origin,
        template.destination,
        template.scheduled_departure,
        template.scheduled_arrival,
        template.aircraft_type,
        template.planned_distance,
        template.planned_passengers,
    );
    mirror.apply_events(&catalog, &[MirrorEvent::Scheduled(flight)]);
    mirror.advance_to(&catalog, 4);
    mirror.apply_events(
        &catalog,
        &[MirrorEvent::CheckedIn { flight_id: "F".into(), actual_passengers: ClassVec::new(1, 3, 2, 8), actual_distance: None }],
    );

    let view = horizon::compute(&catalog, &mirror, mirror.current_hour(), HorizonConfig::default());
    let ctx = OptimizationContext {
        catalog: &catalog,
        mirror: &mirror,
        horizon: &view,
        penalty_rates: PenaltyRates::default(),
        purchase_horizon_hours: 72,
    };
    let decision = greedy::baseline(&ctx);
    let k = decision.loads["F"];
    let passengers = ClassVec::new(1, 3, 2, 8);
    let capacity = ClassVec::new(2, 5, 3, 10);
    for c in Class::ALL {
        assert!(k[c] >= passengers[c], "class {c:?} under-loaded");
        assert!(k[c] <= passengers[c] + 1, "class {c:?} buffer too large");
        assert!(k[c] <= capacity[c], "class {c:?} exceeds aircraft capacity");
    }

    let report = validator::validate(&catalog, &mirror, &decision);
    let repaired = report.repaired_decision;
    mirror.commit_load("F", repaired.loads["F"]);
    assert!(mirror.inventory_at("H").is_all_nonneg());
    mirror.advance_to(&catalog, 6);
    assert_eq!(mirror.pending_movements().len(), 1);
}

/// S2: a long lead time plus concentrated near-term demand forces a
/// purchase even though current hub stock looks adequate at a glance.
#[test]
fn s2_purchase_timing_orders_ahead_of_a_long_lead_time() {
    let mut meta = default_kit_meta();
    meta[Class::First] = KitClassMeta { cost: 100.0, weight_kg: 2.0, lead_time_hours: 48 };
    let mut hub = airport("H", true, ClassVec::new(2, 10, 10, 10));
    hub.processing_hours[Class::First] = 6;
    let catalog = StaticCatalog::new(
        vec![hub, airport("X", false, ClassVec::new(5, 5, 5, 5))],
        vec![aircraft("T", ClassVec::new(2, 5, 3, 10))],
        (0..3)
            .map(|i| FlightTemplate {
                flight_id: format!("F{i}"),
                flight_number: format!("AB{i}"),
                origin: "H".into(),
                destination: "X".into(),
                scheduled_departure: 10 + i * 15,
                scheduled_arrival: 15 + i * 15,
                planned_passengers: ClassVec::new(1, 0, 0, 0),
                planned_distance: 500.0,
                aircraft_type: "T".into(),
            })
            .collect(),
        meta,
    )
    .unwrap();

    let mut mirror = MirrorState::new(&catalog);
    for ft in catalog.all_flights().cloned().collect::<Vec<_>>() {
        let flight = Flight::new(
            ft.flight_id,
            ft.origin,
            ft.destination,
            ft.scheduled_departure,
            ft.scheduled_arrival,
            ft.aircraft_type,
            ft.planned_distance,
            ft.planned_passengers,
        );
        mirror.apply_events(&catalog, &[MirrorEvent::Scheduled(flight)]);
    }

    let view = horizon::compute(&catalog, &mirror, 0, HorizonConfig::default());
    let ctx = OptimizationContext {
        catalog: &catalog,
        mirror: &mirror,
        horizon: &view,
        penalty_rates: PenaltyRates::default(),
        purchase_horizon_hours: 72,
    };
    let decision = greedy::baseline(&ctx);
    assert!(decision.purchases[Class::First] >= 1, "expected a FIRST purchase to cover the 48h lead time");
}

/// S3: overload penalties dominate unfulfilled-passenger penalties at
/// long distance, so the optimizer must prefer clamping to capacity.
#[test]
fn s3_overload_avoidance_prefers_clamped_capacity_at_long_distance() {
    let catalog = StaticCatalog::new(
        vec![airport("H", true, ClassVec::new(10, 10, 10, 10)), airport("X", false, ClassVec::new(5, 5, 5, 5))],
        vec![aircraft("T", ClassVec::new(2, 5, 3, 10))],
        vec![FlightTemplate {
            flight_id: "F".into(),
            flight_number: "AB1".into(),
            origin: "H".into(),
            destination: "X".into(),
            scheduled_departure: 5,
            scheduled_arrival: 10,
            planned_passengers: ClassVec::new(0, 7, 0, 0),
            planned_distance: 2000.0,
            aircraft_type: "T".into(),
        }],
        default_kit_meta(),
    )
    .unwrap();
    let mut mirror = MirrorState::new(&catalog);
    let mut f = Flight::new("F".into(), "H".into(), "X".into(), 5, 10, "T".into(), 2000.0, ClassVec::new(0, 7, 0, 0));
    f.phase = Phase::CheckedIn;
    f.actual_passengers = Some(ClassVec::new(0, 7, 0, 0));
    mirror.apply_events(&catalog, &[MirrorEvent::Scheduled(f)]);

    let view = horizon::compute(&catalog, &mirror, 0, HorizonConfig::default());
    let ctx = OptimizationContext {
        catalog: &catalog,
        mirror: &mirror,
        horizon: &view,
        penalty_rates: PenaltyRates::default(),
        purchase_horizon_hours: 72,
    };
    let decision = greedy::baseline(&ctx);
    assert_eq!(decision.loads["F"][Class::Business], 5, "optimizer must clamp to the aircraft's BUSINESS capacity");
}

/// B2: a purchase placed at hour h for class c is not scheduled to
/// arrive before h + lead_time[c] + hub.processing_hours[c].
#[test]
fn b2_purchase_never_arrives_before_lead_time_plus_processing() {
    let catalog = StaticCatalog::new(
        vec![airport("H", true, ClassVec::new(0, 0, 0, 0))],
        vec![aircraft("T", ClassVec::new(2, 5, 3, 10))],
        vec![],
        default_kit_meta(),
    )
    .unwrap();
    let mut mirror = MirrorState::new(&catalog);
    mirror.commit_purchase(&catalog, ClassVec::new(5, 0, 0, 0));
    let earliest = catalog.kit_meta(Class::First).lead_time_hours + catalog.hub().processing_hours[Class::First];
    mirror.advance_to(&catalog, earliest.saturating_sub(1).max(1));
    assert_eq!(mirror.inventory_at("H")[Class::First], 0, "kits must not arrive before lead_time elapses");
    mirror.advance_to(&catalog, earliest);
    assert_eq!(mirror.inventory_at("H")[Class::First], 5);
}
