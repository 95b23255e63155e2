//! Deterministic sample-data generator: the default record producer.
//!
//! Generates contract records first, then assistance records, each from
//! its own RNG stream. Same seed + same config = identical record set,
//! ids included.

use crate::{
    catalog::Catalog,
    config::{FixtureConfig, SourceProfile},
    error::DashboardResult,
    geography::StateCode,
    loader::RecordLoader,
    record::{EmergencyFundingAct, FinancialRecord, FiscalCalendar, NewRecord, RecordSource},
    rng::{FixtureStream, SeededRng},
};
use chrono::{Days, NaiveDate};

pub fn generate_records(
    seed: u64,
    config: &FixtureConfig,
    calendar: FiscalCalendar,
) -> DashboardResult<Vec<FinancialRecord>> {
    config.validate()?;
    let states: Vec<StateCode> = StateCode::states_and_dc().collect();
    let mut records =
        Vec::with_capacity(config.contracts.record_count + config.assistance.record_count);

    for (stream, source, profile) in [
        (FixtureStream::Contracts, RecordSource::Contracts, &config.contracts),
        (FixtureStream::Assistance, RecordSource::Assistance, &config.assistance),
    ] {
        let mut rng = SeededRng::for_stream(seed, stream);
        for _ in 0..profile.record_count {
            let draft = draft_record(&mut rng, source, profile, config, &states);
            records.push(draft.into_record(calendar)?);
        }
    }

    log::debug!(
        "fixture: generated {} records from seed {seed}",
        records.len()
    );
    Ok(records)
}

fn draft_record(
    rng: &mut SeededRng,
    source: RecordSource,
    profile: &SourceProfile,
    config: &FixtureConfig,
    states: &[StateCode],
) -> NewRecord {
    let date = random_date(rng, config.start_date, config.end_date);

    let obligation = if rng.chance(profile.allocation_probability) {
        rng.int_between(profile.allocation_min, profile.allocation_max)
    } else {
        -rng.int_between(profile.deallocation_min, profile.deallocation_max)
    };

    // Most rows carry only an obligation; a minority also record an outlay.
    let outlay = if rng.chance(profile.outlay_probability) {
        let cap = if obligation > 0 { obligation } else { profile.outlay_deallocation_max };
        rng.int_between(profile.outlay_min.min(cap), cap)
    } else {
        0
    };

    let object_class = match source {
        RecordSource::Contracts => Some(Catalog::pick_object_class(rng).to_string()),
        RecordSource::Assistance => None,
    };

    NewRecord {
        id: random_id(rng),
        source,
        recipient: Catalog::pick_recipient(rng).to_string(),
        recipient_state: *rng.pick(states),
        program: Catalog::pick_program(rng).to_string(),
        object_class,
        emergency_funding: *rng.pick(&EmergencyFundingAct::ALL),
        obligation_amount: obligation as f64,
        outlay: outlay as f64,
        date,
    }
}

fn random_date(rng: &mut SeededRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    let offset = rng.int_between(0, span) as u64;
    start.checked_add_days(Days::new(offset)).unwrap_or(end)
}

/// A v4-shaped UUID drawn from the stream instead of the platform RNG.
fn random_id(rng: &mut SeededRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// Loader that generates the fixture record set.
pub struct FixtureLoader {
    seed: u64,
    config: FixtureConfig,
    calendar: FiscalCalendar,
}

impl FixtureLoader {
    pub fn new(seed: u64, config: FixtureConfig, calendar: FiscalCalendar) -> Self {
        Self { seed, config, calendar }
    }
}

impl RecordLoader for FixtureLoader {
    fn describe(&self) -> String {
        format!("fixture seed {}", self.seed)
    }

    fn load(&mut self) -> DashboardResult<Vec<FinancialRecord>> {
        generate_records(self.seed, &self.config, self.calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::error::DashboardError;

    #[test]
    fn record_counts_follow_profiles() {
        let config = DashboardConfig::default_test();
        let records = generate_records(1, &config.fixture, FiscalCalendar::Federal).unwrap();
        let contracts = records.iter().filter(|r| r.source == RecordSource::Contracts).count();
        assert_eq!(contracts, 60);
        assert_eq!(records.len(), 300);
    }

    #[test]
    fn invalid_profile_is_rejected_before_generation() {
        let mut config = DashboardConfig::default_test();
        config.fixture.contracts.outlay_deallocation_max = -1;
        let mut loader = FixtureLoader::new(4, config.fixture, FiscalCalendar::Federal);
        let err = loader.load().unwrap_err();
        assert!(matches!(err, DashboardError::Other(_)), "got {err:?}");
        assert!(err.to_string().contains("outlay range"));
    }

    #[test]
    fn only_contracts_carry_object_class() {
        let config = DashboardConfig::default_test();
        let records = generate_records(2, &config.fixture, FiscalCalendar::Federal).unwrap();
        for record in &records {
            assert_eq!(
                record.object_class.is_some(),
                record.source == RecordSource::Contracts,
                "object class mismatch on {}",
                record.id
            );
        }
    }

    #[test]
    fn amounts_and_dates_stay_in_configured_ranges() {
        let config = DashboardConfig::default_test();
        let fixture = &config.fixture;
        let records = generate_records(3, fixture, FiscalCalendar::Federal).unwrap();
        for record in &records {
            let profile = match record.source {
                RecordSource::Contracts => &fixture.contracts,
                RecordSource::Assistance => &fixture.assistance,
            };
            assert!(record.date >= fixture.start_date && record.date <= fixture.end_date);
            assert!(record.outlay >= 0.0);
            if record.is_allocation() {
                assert!(record.obligation_amount >= profile.allocation_min as f64);
                assert!(record.obligation_amount <= profile.allocation_max as f64);
                assert!(record.outlay <= record.obligation_amount);
            } else {
                assert!(record.deallocation() >= profile.deallocation_min as f64);
                assert!(record.deallocation() <= profile.deallocation_max as f64);
            }
            assert!(!record.recipient_state.is_territory());
        }
    }
}
