//! Record loaders: the inbound side of the load boundary.
//!
//! RULE: loaders do all the I/O. The reducer only sees the outcome,
//! delivered as LOAD_SUCCESS or LOAD_ERROR by the engine.

use crate::{
    error::{DashboardError, DashboardResult},
    record::{FinancialRecord, FiscalCalendar, NewRecord},
};
use std::collections::HashSet;
use std::path::PathBuf;

/// Anything that can produce the full record set.
pub trait RecordLoader {
    /// Short label used in log lines.
    fn describe(&self) -> String;

    fn load(&mut self) -> DashboardResult<Vec<FinancialRecord>>;
}

/// Reads a JSON array of records from a file.
pub struct JsonFileLoader {
    path: PathBuf,
    calendar: FiscalCalendar,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>, calendar: FiscalCalendar) -> Self {
        Self {
            path: path.into(),
            calendar,
        }
    }
}

impl RecordLoader for JsonFileLoader {
    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }

    fn load(&mut self) -> DashboardResult<Vec<FinancialRecord>> {
        let content = std::fs::read_to_string(&self.path)?;
        parse_records(&content, self.calendar)
            .map_err(|e| DashboardError::LoadFailed(format!("{}: {e}", self.path.display())))
    }
}

/// Parse a JSON array of records, deriving fiscal fields and rejecting
/// duplicate ids.
pub fn parse_records(
    json: &str,
    calendar: FiscalCalendar,
) -> DashboardResult<Vec<FinancialRecord>> {
    let drafts: Vec<NewRecord> = serde_json::from_str(json)?;
    let records = drafts
        .into_iter()
        .map(|draft| draft.into_record(calendar))
        .collect::<DashboardResult<Vec<_>>>()?;
    ensure_unique_ids(&records)?;
    Ok(records)
}

/// Every row passes `FinancialRecord::validate` and no id repeats.
pub fn validate_record_set(records: &[FinancialRecord]) -> DashboardResult<()> {
    records.iter().try_for_each(FinancialRecord::validate)?;
    ensure_unique_ids(records)
}

pub fn ensure_unique_ids(records: &[FinancialRecord]) -> DashboardResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            return Err(DashboardError::DuplicateRecordId(record.id.clone()));
        }
    }
    Ok(())
}
