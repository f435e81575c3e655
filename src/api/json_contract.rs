use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Surface;

use super::{ViewportController, ViewportSnapshot};

pub const VIEWPORT_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Versioned envelope for exported viewport snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ViewportSnapshot,
}

impl From<ViewportSnapshot> for ViewportSnapshotJsonContractV1 {
    fn from(snapshot: ViewportSnapshot) -> Self {
        Self {
            schema_version: VIEWPORT_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot,
        }
    }
}

impl ViewportSnapshot {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let contract = ViewportSnapshotJsonContractV1::from(self.clone());
        Ok(serde_json::to_string_pretty(&contract)?)
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<Self>(input) {
            return Ok(snapshot);
        }
        let contract = serde_json::from_str::<ViewportSnapshotJsonContractV1>(input)
            .map_err(|e| ChartError::InvalidData(format!("viewport snapshot json: {e}")))?;
        match contract.schema_version {
            VIEWPORT_SNAPSHOT_JSON_SCHEMA_V1 => Ok(contract.snapshot),
            other => Err(ChartError::InvalidData(format!(
                "viewport snapshot schema version {other} is not supported"
            ))),
        }
    }
}

impl<T: Sync, S: Surface> ViewportController<T, S> {
    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
