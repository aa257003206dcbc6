//! Fact normalization.
//!
//! The automation engine reports a large, loosely structured fact payload
//! per host. This module maps the interesting entries into
//! [`NormalizedFacts`]. Each lookup is a separate extraction step that
//! fails naming its own field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

/// Raw facts for one host, keyed by engine fact name. Ephemeral — discarded
/// once normalized.
pub type RawFactPayload = HashMap<String, Value>;

const FACT_DISTRIBUTION: &str = "ansible_distribution";
const FACT_PROCESSOR_CORES: &str = "ansible_processor_cores";
const FACT_MEMORY: &str = "ansible_memory_mb";
const FACT_MOUNTS: &str = "ansible_mounts";

/// The stable fact schema returned to callers.
///
/// Values are passed through as reported by the engine — no unit
/// conversion is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFacts {
    /// Lowercased OS distribution name
    pub os: String,
    /// Reported core count
    pub cpus: u64,
    /// Total memory, unit as reported by the source
    pub memory: u64,
    /// Total size of the first listed mount
    pub space: u64,
}

/// Extract the stable fact schema from a host's raw payload.
///
/// All four lookups are independent; the first one that fails aborts the
/// normalization with an error naming the field and host. No partial
/// record is ever returned.
pub fn normalize_facts(
    host: &str,
    payload: &RawFactPayload,
) -> Result<NormalizedFacts, TransportError> {
    let os = distribution(payload, host)?.to_lowercase();
    let cpus = processor_cores(payload, host)?;
    let memory = memory_total(payload, host)?;
    let space = first_mount_size(payload, host)?;

    Ok(NormalizedFacts {
        os,
        cpus,
        memory,
        space,
    })
}

fn extraction(host: &str, field: &str) -> TransportError {
    TransportError::Extraction {
        host: host.to_string(),
        field: field.to_string(),
    }
}

fn distribution<'a>(payload: &'a RawFactPayload, host: &str) -> Result<&'a str, TransportError> {
    payload
        .get(FACT_DISTRIBUTION)
        .and_then(Value::as_str)
        .ok_or_else(|| extraction(host, FACT_DISTRIBUTION))
}

fn processor_cores(payload: &RawFactPayload, host: &str) -> Result<u64, TransportError> {
    payload
        .get(FACT_PROCESSOR_CORES)
        .and_then(Value::as_u64)
        .ok_or_else(|| extraction(host, FACT_PROCESSOR_CORES))
}

fn memory_total(payload: &RawFactPayload, host: &str) -> Result<u64, TransportError> {
    payload
        .get(FACT_MEMORY)
        .and_then(|v| v.get("real"))
        .and_then(|v| v.get("total"))
        .and_then(Value::as_u64)
        .ok_or_else(|| extraction(host, "ansible_memory_mb.real.total"))
}

fn first_mount_size(payload: &RawFactPayload, host: &str) -> Result<u64, TransportError> {
    payload
        .get(FACT_MOUNTS)
        .and_then(Value::as_array)
        .and_then(|mounts| mounts.first())
        .and_then(|mount| mount.get("size_total"))
        .and_then(Value::as_u64)
        .ok_or_else(|| extraction(host, "ansible_mounts[0].size_total"))
}
