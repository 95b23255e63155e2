//! Filter criteria and the filter engine.
//!
//! RULE: `FilterState` is pure criteria. It never holds records, and the
//! filtered subset is always re-derived from (records, filters).

use crate::{
    geography::StateCode,
    record::{EmergencyFundingAct, FinancialRecord, RecordSource},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    All,
    /// obligation_amount > 0
    Allocation,
    /// obligation_amount < 0
    Deallocation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[default]
    All,
    /// obligation_amount != 0
    Commitment,
    /// outlay != 0
    Payment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceFilter {
    #[default]
    All,
    Contracts,
    FinancialAssistance,
}

impl DataSourceFilter {
    fn admits(&self, source: RecordSource) -> bool {
        match self {
            Self::All => true,
            Self::Contracts => source == RecordSource::Contracts,
            Self::FinancialAssistance => source == RecordSource::Assistance,
        }
    }
}

/// Inclusive date bounds. An unset bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// The multi-select string dimensions that chart clicks toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionDimension {
    State,
    Recipient,
    Program,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub activity_type: ActivityType,
    pub transaction_type: TransactionType,
    pub data_source: DataSourceFilter,
    pub emergency_funding: BTreeSet<EmergencyFundingAct>,
    pub states: BTreeSet<StateCode>,
    pub recipients: BTreeSet<String>,
    pub programs: BTreeSet<String>,
    pub date_range: DateRange,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the dimensions currently constraining the result.
    pub fn active_dimensions(&self) -> Vec<&'static str> {
        let mut active = Vec::new();
        if self.activity_type != ActivityType::All {
            active.push("activity_type");
        }
        if self.transaction_type != TransactionType::All {
            active.push("transaction_type");
        }
        if self.data_source != DataSourceFilter::All {
            active.push("data_source");
        }
        if !self.emergency_funding.is_empty() {
            active.push("emergency_funding");
        }
        if !self.states.is_empty() {
            active.push("states");
        }
        if !self.recipients.is_empty() {
            active.push("recipients");
        }
        if !self.programs.is_empty() {
            active.push("programs");
        }
        if !self.date_range.is_unbounded() {
            active.push("date_range");
        }
        active
    }

    /// True iff the record satisfies every active dimension.
    /// Cheap scalar checks run first; the first failing check short-circuits.
    pub fn matches(&self, record: &FinancialRecord) -> bool {
        let activity_ok = match self.activity_type {
            ActivityType::All => true,
            ActivityType::Allocation => record.obligation_amount > 0.0,
            ActivityType::Deallocation => record.obligation_amount < 0.0,
        };
        if !activity_ok {
            return false;
        }

        let transaction_ok = match self.transaction_type {
            TransactionType::All => true,
            TransactionType::Commitment => record.obligation_amount != 0.0,
            TransactionType::Payment => record.outlay != 0.0,
        };
        if !transaction_ok || !self.data_source.admits(record.source) {
            return false;
        }

        admits(&self.emergency_funding, &record.emergency_funding)
            && admits(&self.states, &record.recipient_state)
            && admits(&self.recipients, &record.recipient)
            && admits(&self.programs, &record.program)
            && self.date_range.contains(record.date)
    }

    /// Overwrite every field present in the patch. Fields are replaced
    /// wholesale, never merged element-wise.
    pub fn apply_patch(&mut self, patch: &FilterPatch) {
        if let Some(activity_type) = patch.activity_type {
            self.activity_type = activity_type;
        }
        if let Some(transaction_type) = patch.transaction_type {
            self.transaction_type = transaction_type;
        }
        if let Some(data_source) = patch.data_source {
            self.data_source = data_source;
        }
        if let Some(acts) = &patch.emergency_funding {
            self.emergency_funding = acts.clone();
        }
        if let Some(states) = &patch.states {
            self.states = states.clone();
        }
        if let Some(recipients) = &patch.recipients {
            self.recipients = recipients.clone();
        }
        if let Some(programs) = &patch.programs {
            self.programs = programs.clone();
        }
        if let Some(date_range) = patch.date_range {
            self.date_range = date_range;
        }
    }

    /// Add the act if absent, remove it if present.
    pub fn toggle_emergency_funding(&mut self, act: EmergencyFundingAct) {
        if !self.emergency_funding.remove(&act) {
            self.emergency_funding.insert(act);
        }
    }

    /// Toggle a value in one of the selection sets. Returns false, leaving
    /// the filter untouched, when `value` is not a valid state code for the
    /// state dimension.
    pub fn toggle_selection(&mut self, dimension: SelectionDimension, value: &str) -> bool {
        match dimension {
            SelectionDimension::State => match StateCode::parse(value) {
                Ok(code) => toggle(&mut self.states, code),
                Err(_) => return false,
            },
            SelectionDimension::Recipient => toggle(&mut self.recipients, value.to_string()),
            SelectionDimension::Program => toggle(&mut self.programs, value.to_string()),
        }
        true
    }
}

fn admits<T: Ord>(selection: &BTreeSet<T>, value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

/// A partial filter update. Absent fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    pub activity_type: Option<ActivityType>,
    pub transaction_type: Option<TransactionType>,
    pub data_source: Option<DataSourceFilter>,
    pub emergency_funding: Option<BTreeSet<EmergencyFundingAct>>,
    pub states: Option<BTreeSet<StateCode>>,
    pub recipients: Option<BTreeSet<String>>,
    pub programs: Option<BTreeSet<String>>,
    pub date_range: Option<DateRange>,
}

impl FilterPatch {
    pub fn activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn data_source(mut self, data_source: DataSourceFilter) -> Self {
        self.data_source = Some(data_source);
        self
    }

    pub fn emergency_funding(
        mut self,
        acts: impl IntoIterator<Item = EmergencyFundingAct>,
    ) -> Self {
        self.emergency_funding = Some(acts.into_iter().collect());
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = StateCode>) -> Self {
        self.states = Some(states.into_iter().collect());
        self
    }

    pub fn recipients<S: Into<String>>(mut self, recipients: impl IntoIterator<Item = S>) -> Self {
        self.recipients = Some(recipients.into_iter().map(Into::into).collect());
        self
    }

    pub fn programs<S: Into<String>>(mut self, programs: impl IntoIterator<Item = S>) -> Self {
        self.programs = Some(programs.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }
}

/// Order-preserving subsequence of `records` matching every active filter.
pub fn apply_filters<'a>(
    records: &'a [FinancialRecord],
    filters: &FilterState,
) -> Vec<&'a FinancialRecord> {
    if filters.is_default() {
        return records.iter().collect();
    }
    records.iter().filter(|record| filters.matches(record)).collect()
}
