//! The Validator (C7): a last clamp-and-warn pass before a decision is
//! submitted to the server. Never hard-rejects a fixable issue — an
//! out-of-range load is repaired and logged, not thrown away, matching
//! the mirror's own fail-soft philosophy.

use crate::catalog::StaticCatalog;
use crate::models::class::Class;
use crate::models::mirror::MirrorState;
use crate::optimizer::{Decision, MAX_PURCHASE_PER_CLASS};

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub flight_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub repaired_decision: Decision,
}

pub fn validate(catalog: &StaticCatalog, mirror: &MirrorState, decision: &Decision) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (flight_id, k) in &decision.loads {
        let Some(flight) = mirror.flight(flight_id) else {
            report.warnings.push(ValidationIssue {
                flight_id: Some(flight_id.clone()),
                message: "load submitted for unknown flight, dropping".to_string(),
            });
            continue;
        };
        if flight.has_departed() {
            report.warnings.push(ValidationIssue {
                flight_id: Some(flight_id.clone()),
                message: "load submitted for a flight that has already departed, dropping".to_string(),
            });
            continue;
        }
        let Some(aircraft) = catalog.aircraft(&flight.aircraft_type_code) else {
            report.warnings.push(ValidationIssue {
                flight_id: Some(flight_id.clone()),
                message: "flight references unknown aircraft type, dropping load".to_string(),
            });
            continue;
        };
        let available = mirror.inventory_at(&flight.origin);
        let mut clamped = false;
        let mut repaired = *k;
        for class in Class::ALL {
            let cap = aircraft.kit_capacity[class].min(available[class].max(0)).min(MAX_PURCHASE_PER_CLASS);
            if repaired[class] > cap || repaired[class] < 0 {
                repaired[class] = repaired[class].clamp(0, cap);
                clamped = true;
            }
        }
        if clamped {
            report.warnings.push(ValidationIssue {
                flight_id: Some(flight_id.clone()),
                message: "load clamped to aircraft capacity and available inventory".to_string(),
            });
        }
        report.repaired_decision.loads.insert(flight_id.clone(), repaired);
    }

    let mut purchases = decision.purchases;
    let mut purchase_clamped = false;
    for class in Class::ALL {
        let clamped = purchases[class].clamp(0, MAX_PURCHASE_PER_CLASS);
        if clamped != purchases[class] {
            purchase_clamped = true;
        }
        purchases[class] = clamped;
    }
    if purchase_clamped {
        report.warnings.push(ValidationIssue { flight_id: None, message: "purchase order clamped to the per-class API ceiling".to_string() });
    }
    report.repaired_decision.purchases = purchases;

    report
}
