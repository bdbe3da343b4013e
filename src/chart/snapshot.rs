use serde::{Deserialize, Serialize};

use crate::axis::{Axis, AxisCollection, AxisId, AxisKind};
use crate::core::{PlotArea, Viewport};
use crate::error::{ChartError, ChartResult, Diagnostic};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Resolved state of one axis after a redraw.
///
/// Extremes are real values; tick positions and the interval stay in axis
/// units (log10 on logarithmic axes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSnapshot {
    pub id: AxisId,
    pub collection: AxisCollection,
    pub kind: AxisKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub data_min: Option<f64>,
    pub data_max: Option<f64>,
    pub user_min: Option<f64>,
    pub user_max: Option<f64>,
    pub tick_interval: f64,
    pub tick_positions: Vec<f64>,
    pub minor_tick_positions: Vec<f64>,
    pub trans_a: f64,
    pub stagger_lines: usize,
    #[serde(default)]
    pub tick_amount: Option<usize>,
}

impl AxisSnapshot {
    #[must_use]
    pub fn of(axis: &Axis) -> Self {
        let extremes = axis.get_extremes();
        Self {
            id: axis.id(),
            collection: axis.collection(),
            kind: axis.kind(),
            min: extremes.min,
            max: extremes.max,
            data_min: extremes.data_min,
            data_max: extremes.data_max,
            user_min: extremes.user_min,
            user_max: extremes.user_max,
            tick_interval: axis.tick_interval(),
            tick_positions: axis.tick_positions().to_vec(),
            minor_tick_positions: axis.minor_tick_positions().to_vec(),
            trans_a: axis.trans_a(),
            stagger_lines: axis.stagger_lines(),
            tick_amount: axis.tick_amount(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub viewport: Viewport,
    pub plot_area: PlotArea,
    pub axes: Vec<AxisSnapshot>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&AxisSnapshot> {
        self.axes.iter().find(|axis| axis.id == id)
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned v1 payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}
