//! Core decision-engine library: the static catalog, state mirror,
//! cost model, horizon view, optimizer, validator, transport adapter
//! and round orchestrator that together play one 720-hour rotable-kit
//! logistics session against an external evaluation server.

pub mod catalog;
pub mod costs;
pub mod events;
pub mod horizon;
pub mod models;
pub mod optimizer;
pub mod orchestrator;
pub mod rng;
pub mod time;
pub mod transport;
pub mod validator;

pub use catalog::{ConfigError, StaticCatalog};
pub use models::{Class, ClassVec, Flight, MirrorState, Phase};
pub use optimizer::Decision;
pub use orchestrator::{EngineError, OrchestratorConfig, OrchestratorState, RoundOrchestrator};
pub use rng::RngManager;
pub use time::Clock;
