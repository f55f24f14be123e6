//! The Round Orchestrator (C8): the state machine that drives one
//! session end-to-end — ingest, horizon, optimize, validate, commit,
//! submit, record — and the only component that owns a live
//! `EvaluationClient`. Grounded on the teacher's top-level simulation
//! driver: an explicit state enum, a `tick()` that advances exactly one
//! round, and no global singleton.

pub mod checkpoint;
pub mod summary;

use crate::catalog::{ConfigError, StaticCatalog};
use crate::costs::PenaltyRates;
use crate::events;
use crate::horizon::{self, HorizonConfig};
use crate::models::mirror::MirrorState;
use crate::optimizer::{genetic, OptimizationContext};
use crate::rng::RngManager;
use crate::time::SESSION_LENGTH_HOURS;
use crate::transport::{EvaluationClient, FlightLoad, PlayRoundRequest, SessionId, TransportError};
use crate::validator;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use summary::{RoundHistoryEntry, RoundSummary};
use thiserror::Error;

const HISTORY_CAP: usize = 50;
const RECENT_PENALTIES_CAP: usize = 20;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("protocol violation: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Starting,
    Running,
    Stopping,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub api_key: String,
    pub rng_seed: u64,
    pub round_budget: Duration,
    pub optimizer_deadline: Duration,
    pub penalty_rates: PenaltyRates,
    pub horizon: HorizonConfig,
}

pub struct RoundOrchestrator<C: EvaluationClient> {
    client: C,
    catalog: StaticCatalog,
    mirror: MirrorState,
    rng: RngManager,
    config: OrchestratorConfig,
    session: Option<SessionId>,
    state: OrchestratorState,
    round: u32,
    cumulative_loads_submitted: usize,
    cumulative_purchases: crate::models::class::ClassVec<i64>,
    summary: Arc<RwLock<RoundSummary>>,
}

impl<C: EvaluationClient> RoundOrchestrator<C> {
    pub fn new(client: C, catalog: StaticCatalog, config: OrchestratorConfig) -> Self {
        let mirror = MirrorState::new(&catalog);
        let rng = RngManager::new(config.rng_seed);
        Self {
            client,
            catalog,
            mirror,
            rng,
            config,
            session: None,
            state: OrchestratorState::Idle,
            round: 0,
            cumulative_loads_submitted: 0,
            cumulative_purchases: crate::models::class::ClassVec::zero(),
            summary: Arc::new(RwLock::new(RoundSummary::default())),
        }
    }

    pub fn summary_handle(&self) -> Arc<RwLock<RoundSummary>> {
        Arc::clone(&self.summary)
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        self.state = OrchestratorState::Starting;
        let session = self.client.start_session(&self.config.api_key)?;
        self.session = Some(session);
        self.state = OrchestratorState::Running;
        self.publish_summary(Vec::new());
        Ok(())
    }

    pub fn run_to_completion(&mut self) -> Result<(), EngineError> {
        while self.state == OrchestratorState::Running {
            self.tick()?;
        }
        Ok(())
    }

    /// Runs exactly one round: ingest -> horizon -> optimize -> validate
    /// -> commit -> submit -> record (§4.8).
    pub fn tick(&mut self) -> Result<(), EngineError> {
        let started_at = Instant::now();
        let session = self.session.clone().ok_or_else(|| EngineError::Protocol("tick called before start".to_string()))?;

        let view = horizon::compute(&self.catalog, &self.mirror, self.mirror.current_hour(), self.config.horizon);
        let ctx = OptimizationContext {
            catalog: &self.catalog,
            mirror: &self.mirror,
            horizon: &view,
            penalty_rates: self.config.penalty_rates,
            purchase_horizon_hours: self.config.horizon.purchase_hours,
        };
        let deadline = Instant::now() + self.config.optimizer_deadline;
        let decision = genetic::optimize(&ctx, &mut self.rng, deadline);

        let report = validator::validate(&self.catalog, &self.mirror, &decision);
        for warning in &report.warnings {
            tracing::warn!(flight_id = ?warning.flight_id, message = %warning.message, "decision repaired by validator");
        }
        if !report.errors.is_empty() {
            self.state = OrchestratorState::Failed;
            return Err(EngineError::Protocol(format!("validator produced {} unrepairable errors", report.errors.len())));
        }
        let decision = report.repaired_decision;

        for (flight_id, k) in &decision.loads {
            self.mirror.commit_load(flight_id, *k);
        }
        if decision.purchases.sum() > 0 {
            self.mirror.commit_purchase(&self.catalog, decision.purchases);
        }

        let flight_loads: Vec<FlightLoad> =
            decision.loads.iter().map(|(flight_id, k)| FlightLoad { flight_id: flight_id.clone(), loaded_kits: (*k).into() }).collect();
        let request = PlayRoundRequest {
            day: self.mirror.current_hour() / crate::time::HOURS_PER_DAY,
            hour: self.mirror.current_hour() % crate::time::HOURS_PER_DAY,
            flight_loads,
            kit_purchasing_orders: decision.purchases.into(),
        };

        let response = match self.client.play_round(&session, &self.config.api_key, request) {
            Ok(resp) => resp,
            Err(e @ TransportError::ValidationRejected(_)) => {
                tracing::error!(error = %e, "server rejected the round submission, ending session");
                self.state = OrchestratorState::Failed;
                let _ = self.client.end_session(&session, &self.config.api_key);
                return Err(EngineError::Transport(e));
            }
            Err(e) => {
                self.state = OrchestratorState::Failed;
                return Err(EngineError::Transport(e));
            }
        };

        let server_hour = crate::time::Clock::absolute_hour(response.day, response.hour);
        let outcome = events::ingest(&mut self.mirror, &self.catalog, &response.flight_updates, server_hour, response.total_cost, response.penalties);

        self.round += 1;
        let loads_submitted = decision.loads.len();
        self.cumulative_loads_submitted += loads_submitted;
        self.cumulative_purchases = self.cumulative_purchases.add(&decision.purchases);
        self.publish_round_history(loads_submitted, decision.purchases, response.total_cost, outcome.penalties.clone());
        self.publish_summary(outcome.penalties);

        let elapsed = started_at.elapsed();
        if elapsed > self.config.round_budget {
            tracing::warn!(round = self.round, elapsed_ms = elapsed.as_millis(), "round exceeded its time budget");
        }

        if self.round >= SESSION_LENGTH_HOURS || self.mirror.current_hour() >= SESSION_LENGTH_HOURS {
            self.state = OrchestratorState::Stopping;
            self.stop()?;
        }

        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), EngineError> {
        if let Some(session) = self.session.clone() {
            self.client.end_session(&session, &self.config.api_key)?;
        }
        self.state = OrchestratorState::Done;
        self.publish_summary(Vec::new());
        Ok(())
    }

    fn publish_round_history(
        &mut self,
        loads_submitted: usize,
        purchases: crate::models::class::ClassVec<i64>,
        round_total_cost: f64,
        penalties: Vec<crate::events::Penalty>,
    ) {
        let mut summary = self.summary.write().expect("summary lock poisoned");
        summary.history.push(RoundHistoryEntry { round: self.round, loads_submitted, purchases_submitted: purchases, round_total_cost, penalties });
        if summary.history.len() > HISTORY_CAP {
            let overflow = summary.history.len() - HISTORY_CAP;
            summary.history.drain(0..overflow);
        }
    }

    fn publish_summary(&self, new_penalties: Vec<crate::events::Penalty>) {
        let mut summary = self.summary.write().expect("summary lock poisoned");
        summary.state = self.state;
        summary.round = self.round;
        summary.day = self.mirror.current_hour() / crate::time::HOURS_PER_DAY;
        summary.hour = self.mirror.current_hour() % crate::time::HOURS_PER_DAY;
        summary.total_cost = self.mirror.cumulative_cost();
        summary.cumulative_loads_submitted = self.cumulative_loads_submitted;
        summary.cumulative_purchases = self.cumulative_purchases;
        summary.inventory.by_airport =
            self.catalog.all_airports().map(|a| (a.code.clone(), self.mirror.inventory_at(&a.code))).collect();
        summary.recent_penalties.extend(new_penalties);
        if summary.recent_penalties.len() > RECENT_PENALTIES_CAP {
            let overflow = summary.recent_penalties.len() - RECENT_PENALTIES_CAP;
            summary.recent_penalties.drain(0..overflow);
        }
    }
}
