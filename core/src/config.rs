use crate::{record::FiscalCalendar, view::ViewSettings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shape of the generated records for one source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub record_count: usize,
    /// Probability a record is an allocation rather than a deallocation.
    pub allocation_probability: f64,
    pub allocation_min: i64,
    pub allocation_max: i64,
    pub deallocation_min: i64,
    pub deallocation_max: i64,
    /// Probability a record also carries an outlay.
    pub outlay_probability: f64,
    pub outlay_min: i64,
    /// Upper outlay bound for deallocations; allocations are capped by
    /// their own obligation amount.
    pub outlay_deallocation_max: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contracts: SourceProfile,
    pub assistance: SourceProfile,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            start_date: ymd(2020, 1, 1),
            end_date: ymd(2023, 12, 31),
            contracts: SourceProfile {
                record_count: 1899,
                allocation_probability: 0.80,
                allocation_min: 100_000,
                allocation_max: 10_000_000,
                deallocation_min: 50_000,
                deallocation_max: 2_000_000,
                outlay_probability: 0.20,
                outlay_min: 50_000,
                outlay_deallocation_max: 1_000_000,
            },
            assistance: SourceProfile {
                record_count: 7610,
                allocation_probability: 0.85,
                allocation_min: 500_000,
                allocation_max: 50_000_000,
                deallocation_min: 100_000,
                deallocation_max: 5_000_000,
                outlay_probability: 0.25,
                outlay_min: 100_000,
                outlay_deallocation_max: 3_000_000,
            },
        }
    }
}

impl FixtureConfig {
    /// Reject profiles the generator cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.end_date < self.start_date {
            anyhow::bail!(
                "fixture end_date {} is before start_date {}",
                self.end_date,
                self.start_date
            );
        }
        for (name, profile) in [("contracts", &self.contracts), ("assistance", &self.assistance)] {
            profile
                .validate()
                .map_err(|e| anyhow::anyhow!("fixture.{name}: {e}"))?;
        }
        Ok(())
    }
}

impl SourceProfile {
    fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.allocation_probability)
            || !(0.0..=1.0).contains(&self.outlay_probability)
        {
            anyhow::bail!("probabilities must be within [0, 1]");
        }
        if self.allocation_min <= 0 || self.allocation_max < self.allocation_min {
            anyhow::bail!("allocation range must be positive and ordered");
        }
        if self.deallocation_min <= 0 || self.deallocation_max < self.deallocation_min {
            anyhow::bail!("deallocation range must be positive and ordered");
        }
        if self.outlay_min < 0 || self.outlay_deallocation_max < self.outlay_min {
            anyhow::bail!("outlay range must be non-negative and ordered");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub view: ViewSettings,
    pub fiscal_calendar: FiscalCalendar,
    pub fixture: FixtureConfig,
}

impl DashboardConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.fixture.validate()
    }

    /// Config with a small record set for use in tests.
    pub fn default_test() -> Self {
        let mut config = Self::default();
        config.fixture.contracts.record_count = 60;
        config.fixture.assistance.record_count = 240;
        config
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
