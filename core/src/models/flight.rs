use super::class::ClassVec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Announced,
    CheckedIn,
    Departed,
    Landed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: u32,
    pub scheduled_arrival: u32,
    pub aircraft_type_code: String,
    pub distance: f64,
    pub planned_passengers: ClassVec<i64>,
    pub actual_passengers: Option<ClassVec<i64>>,
    pub actual_distance: Option<f64>,
    pub phase: Phase,
    /// Kits already committed to this flight by a load submission.
    /// Reconciled into an InTransit movement when the flight departs.
    pub committed_load: Option<ClassVec<i64>>,
}

impl Flight {
    pub fn new(
        id: String,
        origin: String,
        destination: String,
        scheduled_departure: u32,
        scheduled_arrival: u32,
        aircraft_type_code: String,
        distance: f64,
        planned_passengers: ClassVec<i64>,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            scheduled_departure,
            scheduled_arrival,
            aircraft_type_code,
            distance,
            planned_passengers,
            actual_passengers: None,
            actual_distance: None,
            phase: Phase::Announced,
            committed_load: None,
        }
    }

    /// The actual passenger vector once CHECKED_IN, else the planned one.
    pub fn effective_passengers(&self) -> ClassVec<i64> {
        self.actual_passengers.unwrap_or(self.planned_passengers)
    }

    /// Planned distance until CHECKED_IN, then actual distance if
    /// present, else planned (§9's resolution of this Open Question).
    pub fn effective_distance(&self) -> f64 {
        match self.phase {
            Phase::Announced => self.distance,
            _ => self.actual_distance.unwrap_or(self.distance),
        }
    }

    pub fn is_loadable(&self) -> bool {
        matches!(self.phase, Phase::CheckedIn)
    }

    pub fn has_departed(&self) -> bool {
        matches!(self.phase, Phase::Departed | Phase::Landed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Flight {
        Flight::new("F1".into(), "H".into(), "X".into(), 5, 10, "T1".into(), 500.0, ClassVec::new(1, 3, 2, 8))
    }

    #[test]
    fn effective_passengers_falls_back_to_planned() {
        let f = sample();
        assert_eq!(f.effective_passengers(), ClassVec::new(1, 3, 2, 8));
    }

    #[test]
    fn effective_distance_uses_actual_once_checked_in() {
        let mut f = sample();
        f.phase = Phase::CheckedIn;
        f.actual_distance = Some(520.0);
        assert_eq!(f.effective_distance(), 520.0);
        f.actual_distance = None;
        assert_eq!(f.effective_distance(), 500.0);
    }

    #[test]
    fn loadability_tracks_phase() {
        let mut f = sample();
        assert!(!f.is_loadable());
        f.phase = Phase::CheckedIn;
        assert!(f.is_loadable());
        f.phase = Phase::Departed;
        assert!(!f.is_loadable());
        assert!(f.has_departed());
    }
}
