//! Aggregation engine: derives each chart's view model from a record subset.
//!
//! RULES:
//!   - Every function is pure and reads its input exactly once.
//!   - Input is whatever subset the caller filtered; nothing here filters.
//!   - Empty input yields zeroed or empty view models, never an error.
//!   - Deallocations are reported as non-negative magnitudes.

use crate::{
    geography::StateCode,
    record::{EmergencyFundingAct, FinancialRecord},
    types::Amount,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DEFAULT_TOP_N: usize = 10;

// ── View models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_allocations: Amount,
    /// Magnitude of all negative obligations.
    pub total_deallocations: Amount,
    /// total_allocations - total_deallocations
    pub net_obligations: Amount,
    pub total_outlays: Amount,
    /// Allocations authorized under an act other than "None".
    pub emergency_allocations: Amount,
    pub recipient_count: usize,
    pub program_count: usize,
    pub state_count: usize,
    pub record_count: usize,
}

/// One slice of the emergency-funding pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSlice {
    pub act: EmergencyFundingAct,
    pub amount: Amount,
    /// Fraction of the breakdown total, in [0, 1].
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityField {
    Recipient,
    Program,
}

impl EntityField {
    fn of<'r>(&self, record: &'r FinancialRecord) -> &'r str {
        match self {
            Self::Recipient => &record.recipient,
            Self::Program => &record.program,
        }
    }
}

/// One bar of a top-recipients or top-programs chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTotals {
    pub name: String,
    pub allocations: Amount,
    pub deallocations: Amount,
}

/// One region of the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntry {
    pub state: StateCode,
    pub state_name: String,
    pub allocations: Amount,
    pub deallocations: Amount,
    pub outlays: Amount,
    pub recipient_count: usize,
    pub program_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    /// "YYYY-MM"
    #[default]
    Month,
    /// "FY2021-Q1", from the record's derived fiscal fields.
    FiscalQuarter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub period: String,
    pub allocations: Amount,
    pub deallocations: Amount,
}

// ── Aggregations ─────────────────────────────────────────────────────────────

pub fn compute_summary<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
) -> SummaryMetrics {
    let mut summary = SummaryMetrics::default();
    let mut recipients: HashSet<&str> = HashSet::new();
    let mut programs: HashSet<&str> = HashSet::new();
    let mut states: HashSet<StateCode> = HashSet::new();

    for record in records {
        summary.record_count += 1;
        summary.total_allocations += record.allocation();
        summary.total_deallocations += record.deallocation();
        summary.total_outlays += record.outlay;
        if record.emergency_funding.is_emergency() {
            summary.emergency_allocations += record.allocation();
        }
        recipients.insert(&record.recipient);
        programs.insert(&record.program);
        states.insert(record.recipient_state);
    }

    summary.net_obligations = summary.total_allocations - summary.total_deallocations;
    summary.recipient_count = recipients.len();
    summary.program_count = programs.len();
    summary.state_count = states.len();
    summary
}

/// Allocations per act. Deallocations never count toward a slice.
pub fn compute_emergency_funding_breakdown<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
) -> Vec<FundingSlice> {
    let mut by_act: BTreeMap<EmergencyFundingAct, Amount> = BTreeMap::new();
    for record in records {
        if record.is_allocation() {
            *by_act.entry(record.emergency_funding).or_default() += record.obligation_amount;
        }
    }

    let total: Amount = by_act.values().sum();
    let mut slices: Vec<FundingSlice> = by_act
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(act, amount)| FundingSlice {
            act,
            amount,
            percentage: if total > 0.0 { amount / total } else { 0.0 },
        })
        .collect();

    slices.sort_by(|a, b| {
        descending(a.amount, b.amount).then_with(|| a.act.label().cmp(b.act.label()))
    });
    slices
}

/// Group by recipient or program and keep the `limit` largest by allocations.
pub fn compute_top_entities<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
    field: EntityField,
    limit: usize,
) -> Vec<EntityTotals> {
    let mut by_name: HashMap<&str, (Amount, Amount)> = HashMap::new();
    for record in records {
        let totals = by_name.entry(field.of(record)).or_default();
        totals.0 += record.allocation();
        totals.1 += record.deallocation();
    }

    let mut entities: Vec<EntityTotals> = by_name
        .into_iter()
        .map(|(name, (allocations, deallocations))| EntityTotals {
            name: name.to_string(),
            allocations,
            deallocations,
        })
        .collect();

    entities.sort_by(|a, b| {
        descending(a.allocations, b.allocations).then_with(|| a.name.cmp(&b.name))
    });
    entities.truncate(limit);
    entities
}

#[derive(Default)]
struct GeoAccumulator<'a> {
    allocations: Amount,
    deallocations: Amount,
    outlays: Amount,
    recipients: HashSet<&'a str>,
    programs: HashSet<&'a str>,
}

/// One entry per valid state/territory code, in code order. States with no
/// records in the input appear with zeros so the map domain is complete.
pub fn compute_geo_breakdown<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
) -> Vec<GeoEntry> {
    let mut by_state: HashMap<StateCode, GeoAccumulator<'a>> = HashMap::new();
    for record in records {
        let acc = by_state.entry(record.recipient_state).or_default();
        acc.allocations += record.allocation();
        acc.deallocations += record.deallocation();
        acc.outlays += record.outlay;
        acc.recipients.insert(&record.recipient);
        acc.programs.insert(&record.program);
    }

    StateCode::all()
        .map(|state| {
            let acc = by_state.remove(&state).unwrap_or_default();
            GeoEntry {
                state,
                state_name: state.name().to_string(),
                allocations: acc.allocations,
                deallocations: acc.deallocations,
                outlays: acc.outlays,
                recipient_count: acc.recipients.len(),
                program_count: acc.programs.len(),
            }
        })
        .collect()
}

/// Allocations and deallocations per period, ascending. Only periods
/// present in the input appear.
pub fn compute_time_series<'a>(
    records: impl IntoIterator<Item = &'a FinancialRecord>,
    bucket: TimeBucket,
) -> Vec<TimeSeriesPoint> {
    let mut by_period: BTreeMap<(i32, u32), (Amount, Amount)> = BTreeMap::new();
    for record in records {
        let key = match bucket {
            TimeBucket::Month => (record.date.year(), record.date.month()),
            TimeBucket::FiscalQuarter => (record.fiscal_year, u32::from(record.fiscal_period)),
        };
        let totals = by_period.entry(key).or_default();
        totals.0 += record.allocation();
        totals.1 += record.deallocation();
    }

    by_period
        .into_iter()
        .map(|((year, sub), (allocations, deallocations))| TimeSeriesPoint {
            period: match bucket {
                TimeBucket::Month => format!("{year:04}-{sub:02}"),
                TimeBucket::FiscalQuarter => format!("FY{year}-Q{sub}"),
            },
            allocations,
            deallocations,
        })
        .collect()
}

fn descending(a: Amount, b: Amount) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FiscalCalendar, NewRecord, RecordSource};
    use chrono::NaiveDate;

    fn record(id: &str, recipient: &str, amount: f64, act: EmergencyFundingAct) -> FinancialRecord {
        NewRecord {
            id: id.into(),
            source: RecordSource::Assistance,
            recipient: recipient.into(),
            recipient_state: StateCode::parse("WA").unwrap(),
            program: "Health Center Program".into(),
            object_class: None,
            emergency_funding: act,
            obligation_amount: amount,
            outlay: 0.0,
            date: NaiveDate::from_ymd_opt(2021, 11, 3).unwrap(),
        }
        .into_record(FiscalCalendar::Federal)
        .unwrap()
    }

    #[test]
    fn breakdown_ties_break_by_label() {
        let records = vec![
            record("1", "A", 50.0, EmergencyFundingAct::Other),
            record("2", "B", 50.0, EmergencyFundingAct::AmericanRescuePlan),
        ];
        let slices = compute_emergency_funding_breakdown(&records);
        assert_eq!(slices[0].act, EmergencyFundingAct::AmericanRescuePlan);
        assert_eq!(slices[1].act, EmergencyFundingAct::Other);
    }

    #[test]
    fn breakdown_omits_acts_with_only_deallocations() {
        let records = vec![
            record("1", "A", -40.0, EmergencyFundingAct::CaresAct),
            record("2", "B", 10.0, EmergencyFundingAct::Other),
        ];
        let slices = compute_emergency_funding_breakdown(&records);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].act, EmergencyFundingAct::Other);
        assert_eq!(slices[0].percentage, 1.0);
    }

    #[test]
    fn top_entities_ties_break_by_name() {
        let records = vec![
            record("1", "Zeta Labs", 10.0, EmergencyFundingAct::Other),
            record("2", "Alpha Health", 10.0, EmergencyFundingAct::Other),
            record("3", "Alpha Health", -4.0, EmergencyFundingAct::Other),
        ];
        let top = compute_top_entities(&records, EntityField::Recipient, 10);
        assert_eq!(top[0].name, "Alpha Health");
        assert_eq!(top[0].deallocations, 4.0);
        assert_eq!(top[1].name, "Zeta Labs");
    }

    #[test]
    fn fiscal_quarter_series_uses_derived_fields() {
        let records = vec![record("1", "A", 10.0, EmergencyFundingAct::Other)];
        let series = compute_time_series(&records, TimeBucket::FiscalQuarter);
        assert_eq!(series[0].period, "FY2022-Q1");
        let monthly = compute_time_series(&records, TimeBucket::Month);
        assert_eq!(monthly[0].period, "2021-11");
    }
}
