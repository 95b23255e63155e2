//! Change notification for presentation-side consumers.
//!
//! RULE: listeners observe, they never mutate. They receive a shared
//! reference to the new state after every effective transition and must
//! route any reaction back through `DashboardEngine::dispatch`.

use crate::reducer::AppState;

pub trait StateListener {
    /// Stable name used in log lines.
    fn name(&self) -> &'static str;

    /// Called once per effective transition, after the state is replaced.
    /// `action` is the `DashboardAction::kind()` that caused it.
    fn on_state_changed(&mut self, state: &AppState, action: &'static str);
}
