use crate::{
    filter::{FilterPatch, SelectionDimension},
    record::{EmergencyFundingAct, FinancialRecord},
    view::ViewSettings,
};
use serde::{Deserialize, Serialize};

/// Every state transition the reducer understands.
/// Load actions come from the record loader; the rest from user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardAction {
    // ── Load lifecycle ────────────────────────────
    LoadStart,
    LoadSuccess { records: Vec<FinancialRecord> },
    LoadError { message: String },

    // ── Filters ───────────────────────────────────
    SetFilter { patch: FilterPatch },
    ResetFilters,
    /// Pie-slice click: add or remove one act.
    ToggleEmergencyFunding { act: EmergencyFundingAct },
    /// Bar or map click: add or remove one value.
    ToggleSelection {
        dimension: SelectionDimension,
        value: String,
    },

    // ── Presentation ──────────────────────────────
    SetViewSettings { settings: ViewSettings },
}

impl DashboardAction {
    /// Stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadStart => "load_start",
            Self::LoadSuccess { .. } => "load_success",
            Self::LoadError { .. } => "load_error",
            Self::SetFilter { .. } => "set_filter",
            Self::ResetFilters => "reset_filters",
            Self::ToggleEmergencyFunding { .. } => "toggle_emergency_funding",
            Self::ToggleSelection { .. } => "toggle_selection",
            Self::SetViewSettings { .. } => "set_view_settings",
        }
    }

    /// LOAD_START, LOAD_SUCCESS and LOAD_ERROR. Only the engine's load
    /// boundary may issue these.
    pub fn is_load_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::LoadStart | Self::LoadSuccess { .. } | Self::LoadError { .. }
        )
    }
}
