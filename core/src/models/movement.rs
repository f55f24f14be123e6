use super::class::ClassVec;
use serde::{Deserialize, Serialize};

/// An entry in the mirror's pending-movement queue (I4). Ordered by
/// `ready_hour`; ties break purchases before processing completions
/// before arrivals, then by the secondary key, for deterministic replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KitMovement {
    InTransit { flight_id: String, destination: String, arrive_hour: u32, quantities: ClassVec<i64> },
    Processing { airport: String, ready_hour: u32, quantities: ClassVec<i64> },
    PurchaseDelivery { ready_hour: u32, quantities: ClassVec<i64> },
}

impl KitMovement {
    pub fn ready_hour(&self) -> u32 {
        match self {
            KitMovement::InTransit { arrive_hour, .. } => *arrive_hour,
            KitMovement::Processing { ready_hour, .. } => *ready_hour,
            KitMovement::PurchaseDelivery { ready_hour, .. } => *ready_hour,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            KitMovement::PurchaseDelivery { .. } => 0,
            KitMovement::Processing { .. } => 1,
            KitMovement::InTransit { .. } => 2,
        }
    }

    fn tiebreak_key(&self) -> &str {
        match self {
            KitMovement::PurchaseDelivery { .. } => "",
            KitMovement::Processing { airport, .. } => airport,
            KitMovement::InTransit { flight_id, .. } => flight_id,
        }
    }

    pub fn sort_key(&self) -> (u32, u8, &str) {
        (self.ready_hour(), self.kind_rank(), self.tiebreak_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_orders_purchases_before_processing_before_arrivals() {
        let purchase = KitMovement::PurchaseDelivery { ready_hour: 5, quantities: ClassVec::zero() };
        let processing = KitMovement::Processing { airport: "H".into(), ready_hour: 5, quantities: ClassVec::zero() };
        let transit = KitMovement::InTransit {
            flight_id: "F1".into(),
            destination: "X".into(),
            arrive_hour: 5,
            quantities: ClassVec::zero(),
        };
        let mut movements = vec![transit.clone(), processing.clone(), purchase.clone()];
        movements.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        assert_eq!(movements[0], purchase);
        assert_eq!(movements[1], processing);
        assert_eq!(movements[2], transit);
    }
}
