//! The dashboard engine: owner of the single `AppState`.
//!
//! RULES:
//!   - State only changes through `reduce`. User actions enter through
//!     `dispatch`; LOAD_* actions only through the load boundary.
//!   - Consumers get `&AppState` or an owned `DashboardSnapshot`.
//!   - At most one record load is outstanding, tracked by a `LoadTicket`.
//!     The guard is the outstanding ticket, not the load phase.
//!   - Load I/O happens outside the reducer; its outcome comes back
//!     through `finish_load` as LOAD_SUCCESS or LOAD_ERROR.

use crate::{
    action::DashboardAction,
    config::DashboardConfig,
    error::{DashboardError, DashboardResult},
    listener::StateListener,
    loader::{validate_record_set, RecordLoader},
    record::FinancialRecord,
    reducer::{reduce, AppState},
    snapshot::DashboardSnapshot,
    view::ViewSettings,
};

/// Proof that a load was started. Consumed by `finish_load`.
#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
}

pub struct DashboardEngine {
    state: AppState,
    listeners: Vec<Box<dyn StateListener>>,
    load_generation: u64,
    outstanding_load: Option<u64>,
}

impl DashboardEngine {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            state: AppState::new(settings),
            listeners: Vec::new(),
            load_generation: 0,
            outstanding_load: None,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.view)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from(&self.state)
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn subscribe(&mut self, listener: Box<dyn StateListener>) {
        log::debug!("listener '{}' subscribed", listener.name());
        self.listeners.push(listener);
    }

    /// Run one user action through the reducer. Load lifecycle actions
    /// are rejected here; they only enter through `begin_load` and
    /// `finish_load`.
    pub fn dispatch(&mut self, action: DashboardAction) -> DashboardResult<&AppState> {
        if action.is_load_lifecycle() {
            log::warn!("{} rejected: use begin_load/finish_load", action.kind());
            return Err(DashboardError::LoadActionRejected(action.kind()));
        }
        Ok(self.apply(action))
    }

    /// Start a load. Fails if one is already outstanding.
    pub fn begin_load(&mut self) -> DashboardResult<LoadTicket> {
        if self.outstanding_load.is_some() {
            return Err(DashboardError::LoadInProgress);
        }
        self.load_generation += 1;
        self.outstanding_load = Some(self.load_generation);
        self.apply(DashboardAction::LoadStart);
        Ok(LoadTicket {
            generation: self.load_generation,
        })
    }

    /// Deliver the outcome of the load `ticket` was issued for.
    /// Record sets that fail validation are turned into a load error.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: DashboardResult<Vec<FinancialRecord>>,
    ) -> &AppState {
        if self.outstanding_load != Some(ticket.generation) {
            log::warn!("stale load ticket {} ignored", ticket.generation);
            return &self.state;
        }
        self.outstanding_load = None;

        let outcome = outcome.and_then(|records| {
            validate_record_set(&records)?;
            Ok(records)
        });
        let action = match outcome {
            Ok(records) => {
                log::info!("load {}: {} records", ticket.generation, records.len());
                DashboardAction::LoadSuccess { records }
            }
            Err(e) => {
                log::warn!("load {} failed: {e}", ticket.generation);
                DashboardAction::LoadError {
                    message: e.to_string(),
                }
            }
        };
        self.apply(action)
    }

    /// Run a loader synchronously between `begin_load` and `finish_load`.
    pub fn load_with(&mut self, loader: &mut dyn RecordLoader) -> DashboardResult<&AppState> {
        let ticket = self.begin_load()?;
        log::info!("loading records from {}", loader.describe());
        let outcome = loader.load();
        Ok(self.finish_load(ticket, outcome))
    }

    /// Listeners hear about an action only when the state actually changed.
    fn apply(&mut self, action: DashboardAction) -> &AppState {
        let kind = action.kind();
        let next = reduce(&self.state, action);
        if next.revision() == self.state.revision() {
            log::trace!("{kind}: no change at revision {}", next.revision());
            return &self.state;
        }

        self.state = next;
        log::debug!(
            "{kind}: revision {} phase {:?} ({} of {} records)",
            self.state.revision(),
            self.state.phase(),
            self.state.filtered_count(),
            self.state.records().len(),
        );
        for listener in &mut self.listeners {
            listener.on_state_changed(&self.state, kind);
        }
        &self.state
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}
