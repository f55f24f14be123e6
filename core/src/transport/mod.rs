//! The Transport Adapter (C9): everything that crosses the wire to the
//! evaluation server, behind a trait so the orchestrator never depends
//! on `reqwest` directly (§6.1).

pub mod fake;
pub mod http;

use crate::events::{FlightEvent, Penalty};
use crate::models::class::ClassVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireClassVec {
    pub first: i64,
    pub business: i64,
    pub premium_economy: i64,
    pub economy: i64,
}

impl From<ClassVec<i64>> for WireClassVec {
    fn from(v: ClassVec<i64>) -> Self {
        use crate::models::class::Class;
        Self { first: v[Class::First], business: v[Class::Business], premium_economy: v[Class::PremiumEconomy], economy: v[Class::Economy] }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLoad {
    pub flight_id: String,
    pub loaded_kits: WireClassVec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRoundRequest {
    pub day: u32,
    pub hour: u32,
    pub flight_loads: Vec<FlightLoad>,
    pub kit_purchasing_orders: WireClassVec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRoundResponse {
    pub day: u32,
    pub hour: u32,
    pub flight_updates: Vec<FlightEvent>,
    pub penalties: Vec<Penalty>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndResponse {
    pub penalties: Vec<Penalty>,
    pub total_cost: f64,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server error (status {0})")]
    ServerError(u16),
    #[error("server rejected the submission as invalid: {0}")]
    ValidationRejected(String),
    #[error("server no longer recognizes the session")]
    SessionLost,
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Everything the orchestrator needs from the evaluation server,
/// abstracted so a scripted fake can stand in for it in tests.
pub trait EvaluationClient {
    fn start_session(&self, api_key: &str) -> Result<SessionId, TransportError>;
    fn play_round(&self, session: &SessionId, api_key: &str, request: PlayRoundRequest) -> Result<PlayRoundResponse, TransportError>;
    fn end_session(&self, session: &SessionId, api_key: &str) -> Result<EndResponse, TransportError>;
}
