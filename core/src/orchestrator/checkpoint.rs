//! Checkpointing (R1): a serialized mirror snapshot paired with a hash
//! of the configuration that produced it, so a restored checkpoint can
//! refuse to resume under a configuration it wasn't built for. Grounded
//! on the teacher's `checkpoint.rs::compute_config_hash` canonical-JSON
//! hashing approach.

use crate::models::mirror::MirrorState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("checkpoint was produced under a different configuration (checkpoint hash {checkpoint_hash}, expected {expected_hash})")]
    ConfigMismatch { checkpoint_hash: String, expected_hash: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub config_hash: String,
    pub mirror: MirrorState,
}

pub fn checkpoint(mirror: &MirrorState, config_hash: String) -> Checkpoint {
    Checkpoint { config_hash, mirror: mirror.clone() }
}

pub fn restore(checkpoint: Checkpoint, expected_hash: &str) -> Result<MirrorState, CheckpointError> {
    if checkpoint.config_hash != expected_hash {
        return Err(CheckpointError::ConfigMismatch { checkpoint_hash: checkpoint.config_hash, expected_hash: expected_hash.to_string() });
    }
    Ok(checkpoint.mirror)
}

/// Hashes a config's canonical JSON form, independent of struct field
/// declaration order (R1's round-trip law needs this stable across
/// equivalent representations).
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, CheckpointError> {
    let value = serde_json::to_value(config)?;
    let canonical = canonicalize(value);
    let bytes = serde_json::to_vec(&canonical)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            serde_json::to_value(sorted).expect("BTreeMap<String, Value> always serializes")
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
