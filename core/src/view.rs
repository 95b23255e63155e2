//! The bundle of view models the presentation layer reads.

use crate::{
    aggregate::{
        compute_emergency_funding_breakdown, compute_geo_breakdown, compute_summary,
        compute_time_series, compute_top_entities, EntityField, EntityTotals, FundingSlice,
        GeoEntry, SummaryMetrics, TimeBucket, TimeSeriesPoint, DEFAULT_TOP_N,
    },
    record::FinancialRecord,
};
use serde::{Deserialize, Serialize};

/// Knobs that shape the derived view models but never the filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub top_n: usize,
    pub time_bucket: TimeBucket,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            time_bucket: TimeBucket::Month,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub summary: SummaryMetrics,
    pub emergency_funding: Vec<FundingSlice>,
    pub top_recipients: Vec<EntityTotals>,
    pub top_programs: Vec<EntityTotals>,
    pub geo: Vec<GeoEntry>,
    pub time_series: Vec<TimeSeriesPoint>,
}

impl DashboardView {
    /// True when the filtered subset was empty. Consumers render a
    /// "no data" state instead of charts.
    pub fn is_empty(&self) -> bool {
        self.summary.record_count == 0
    }
}

/// Run every aggregation over the same filtered subset.
pub fn build_view(records: &[&FinancialRecord], settings: &ViewSettings) -> DashboardView {
    let subset = || records.iter().copied();
    DashboardView {
        summary: compute_summary(subset()),
        emergency_funding: compute_emergency_funding_breakdown(subset()),
        top_recipients: compute_top_entities(subset(), EntityField::Recipient, settings.top_n),
        top_programs: compute_top_entities(subset(), EntityField::Program, settings.top_n),
        geo: compute_geo_breakdown(subset()),
        time_series: compute_time_series(subset(), settings.time_bucket),
    }
}
