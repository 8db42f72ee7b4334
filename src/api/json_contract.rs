use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

use super::BindingSnapshot;

pub const BINDING_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: BindingSnapshot,
}

impl BindingSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> DashboardResult<String> {
        let payload = BindingSnapshotJsonContractV1 {
            schema_version: BINDING_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DashboardError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> DashboardResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<BindingSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: BindingSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DashboardError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != BINDING_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(DashboardError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
