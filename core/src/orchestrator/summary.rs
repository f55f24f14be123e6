//! The monitoring snapshot (§6.3): a plain data struct published after
//! every round, read by the CLI/monitoring surface through a shared
//! `Arc<RwLock<_>>`. Deliberately not `arc-swap` — nothing else in the
//! pack reaches for it, and one writer per round makes an `RwLock`'s
//! contention cost negligible (see DESIGN.md).

use crate::events::Penalty;
use crate::models::class::ClassVec;
use crate::orchestrator::OrchestratorState;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    pub by_airport: HashMap<String, ClassVec<i64>>,
}

#[derive(Debug, Clone)]
pub struct RoundHistoryEntry {
    pub round: u32,
    pub loads_submitted: usize,
    pub purchases_submitted: ClassVec<i64>,
    pub round_total_cost: f64,
    pub penalties: Vec<Penalty>,
}

#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub state: OrchestratorState,
    pub round: u32,
    pub day: u32,
    pub hour: u32,
    pub total_cost: f64,
    pub cumulative_loads_submitted: usize,
    pub cumulative_purchases: ClassVec<i64>,
    pub recent_penalties: Vec<Penalty>,
    pub inventory: InventorySnapshot,
    pub history: Vec<RoundHistoryEntry>,
}

impl Default for RoundSummary {
    fn default() -> Self {
        Self {
            state: OrchestratorState::Idle,
            round: 0,
            day: 0,
            hour: 0,
            total_cost: 0.0,
            cumulative_loads_submitted: 0,
            cumulative_purchases: ClassVec::zero(),
            recent_penalties: Vec::new(),
            inventory: InventorySnapshot::default(),
            history: Vec::new(),
        }
    }
}
