//! The reducer: the only function that produces a new `AppState`.
//!
//! RULES:
//!   - Every transition is total: no panics, no errors.
//!   - LOAD_SUCCESS with an invalid record set becomes a load error.
//!   - An action whose precondition does not hold returns the state
//!     unchanged, with the same revision.
//!   - Every effective transition bumps `revision` by exactly one.
//!   - The filtered subset is never stored; only its count and the
//!     view models derived from it.

use crate::{
    action::DashboardAction,
    filter::{apply_filters, FilterState},
    loader::validate_record_set,
    record::FinancialRecord,
    types::Revision,
    view::{build_view, DashboardView, ViewSettings},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle phase of the record load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Uninitialized,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub struct AppState {
    phase: LoadPhase,
    records: Option<Arc<[FinancialRecord]>>,
    filters: FilterState,
    settings: ViewSettings,
    view: DashboardView,
    filtered_count: usize,
    error: Option<String>,
    revision: Revision,
}

impl AppState {
    pub fn new(settings: ViewSettings) -> Self {
        let filters = FilterState::default();
        let (filtered_count, view) = derive(&[], &filters, &settings);
        Self {
            phase: LoadPhase::Uninitialized,
            records: None,
            filters,
            settings,
            view,
            filtered_count,
            error: None,
            revision: 0,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// True once any load has succeeded, even if a later reload failed.
    pub fn has_records(&self) -> bool {
        self.records.is_some()
    }

    /// The full, unfiltered record set. Empty before the first load.
    pub fn records(&self) -> &[FinancialRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Re-run the filter engine over the current records and filters.
    pub fn filtered_records(&self) -> Vec<&FinancialRecord> {
        apply_filters(self.records(), &self.filters)
    }

    fn rederive(&mut self) {
        let (filtered_count, view) = derive(self.records(), &self.filters, &self.settings);
        self.filtered_count = filtered_count;
        self.view = view;
    }

    /// Install new filters and re-derive, unless nothing changed.
    fn with_filters(&self, filters: FilterState) -> AppState {
        if filters == self.filters {
            log::debug!("filters unchanged; keeping revision {}", self.revision);
            return self.clone();
        }
        let mut next = self.clone();
        next.filters = filters;
        next.rederive();
        next.revision += 1;
        log::debug!(
            "filters now [{}]: {} of {} records",
            next.filters.active_dimensions().join(", "),
            next.filtered_count,
            next.records().len(),
        );
        next
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

fn derive(
    records: &[FinancialRecord],
    filters: &FilterState,
    settings: &ViewSettings,
) -> (usize, DashboardView) {
    let filtered = apply_filters(records, filters);
    let view = build_view(&filtered, settings);
    (filtered.len(), view)
}

/// Apply one action to the current state, producing the next state.
pub fn reduce(state: &AppState, action: DashboardAction) -> AppState {
    match action {
        DashboardAction::LoadStart => {
            if state.is_loading() {
                log::warn!("load_start ignored: a load is already in progress");
                return state.clone();
            }
            let mut next = state.clone();
            next.phase = LoadPhase::Loading;
            next.error = None;
            next.revision += 1;
            next
        }

        DashboardAction::LoadSuccess { records } => {
            if !state.is_loading() {
                log::warn!("load_success ignored: no load in progress");
                return state.clone();
            }
            let mut next = state.clone();
            if let Err(e) = validate_record_set(&records) {
                log::warn!("load_success rejected: {e}");
                next.phase = LoadPhase::Error;
                next.error = Some(e.to_string());
                next.revision += 1;
                return next;
            }
            next.records = Some(Arc::from(records));
            next.filters = FilterState::default();
            next.phase = LoadPhase::Ready;
            next.rederive();
            next.revision += 1;
            next
        }

        DashboardAction::LoadError { message } => {
            if !state.is_loading() {
                log::warn!("load_error ignored: no load in progress");
                return state.clone();
            }
            let mut next = state.clone();
            next.phase = LoadPhase::Error;
            next.error = Some(message);
            next.revision += 1;
            next
        }

        DashboardAction::SetFilter { patch } => {
            if !state.has_records() {
                log::debug!("set_filter ignored: no records loaded");
                return state.clone();
            }
            let mut filters = state.filters.clone();
            filters.apply_patch(&patch);
            state.with_filters(filters)
        }

        DashboardAction::ResetFilters => {
            let mut next = state.clone();
            next.filters = FilterState::default();
            next.rederive();
            next.revision += 1;
            next
        }

        DashboardAction::ToggleEmergencyFunding { act } => {
            if !state.has_records() {
                log::debug!("toggle_emergency_funding ignored: no records loaded");
                return state.clone();
            }
            let mut filters = state.filters.clone();
            filters.toggle_emergency_funding(act);
            state.with_filters(filters)
        }

        DashboardAction::ToggleSelection { dimension, value } => {
            if !state.has_records() {
                log::debug!("toggle_selection ignored: no records loaded");
                return state.clone();
            }
            let mut filters = state.filters.clone();
            if !filters.toggle_selection(dimension, &value) {
                log::warn!(
                    "toggle_selection ignored: '{value}' is not a valid {dimension:?} value"
                );
                return state.clone();
            }
            state.with_filters(filters)
        }

        DashboardAction::SetViewSettings { settings } => {
            if settings == state.settings {
                return state.clone();
            }
            let mut next = state.clone();
            next.settings = settings;
            next.rederive();
            next.revision += 1;
            next
        }
    }
}
