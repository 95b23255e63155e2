//! Shared primitive types used across the dashboard core.

/// A stable, unique identifier for a financial record.
pub type RecordId = String;

/// A currency amount in dollars. Obligations are signed, outlays are not.
pub type Amount = f64;

/// Monotonic counter bumped by every effective state transition.
pub type Revision = u64;
