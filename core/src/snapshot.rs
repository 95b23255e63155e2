//! Snapshot serialization: an owned, immutable copy of what the
//! presentation layer renders.
//!
//! Consumers that outlive a dispatch call take a snapshot instead of
//! holding a reference into the engine's state.

use crate::{
    filter::FilterState,
    reducer::{AppState, LoadPhase},
    types::Revision,
    view::{DashboardView, ViewSettings},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub revision: Revision,
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub total_records: usize,
    pub filtered_records: usize,
    pub filters: FilterState,
    pub settings: ViewSettings,
    pub view: DashboardView,
}

impl From<&AppState> for DashboardSnapshot {
    fn from(state: &AppState) -> Self {
        Self {
            revision: state.revision(),
            phase: state.phase(),
            error: state.error().map(str::to_string),
            total_records: state.records().len(),
            filtered_records: state.filtered_count(),
            filters: state.filters().clone(),
            settings: *state.settings(),
            view: state.view().clone(),
        }
    }
}
