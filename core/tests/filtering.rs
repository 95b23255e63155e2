//! Filter engine tests: predicate semantics, AND/OR composition, monotonicity.

use chrono::NaiveDate;
use relief_core::{
    filter::{
        apply_filters, ActivityType, DataSourceFilter, FilterPatch, FilterState, TransactionType,
    },
    fixture::generate_records,
    config::DashboardConfig,
    geography::StateCode,
    record::{EmergencyFundingAct, FinancialRecord, FiscalCalendar, NewRecord, RecordSource},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn base(id: &str) -> NewRecord {
    NewRecord {
        id: id.into(),
        source: RecordSource::Contracts,
        recipient: "Mayo Clinic".into(),
        recipient_state: StateCode::parse("MN").unwrap(),
        program: "Provider Relief Fund".into(),
        object_class: Some("Pharmaceuticals".into()),
        emergency_funding: EmergencyFundingAct::CaresAct,
        obligation_amount: 100.0,
        outlay: 0.0,
        date: day("2021-01-15"),
    }
}

fn build(draft: NewRecord) -> FinancialRecord {
    draft.into_record(FiscalCalendar::Federal).unwrap()
}

fn small_set() -> Vec<FinancialRecord> {
    vec![
        build(base("alloc")),
        build(NewRecord { obligation_amount: -40.0, ..base("dealloc") }),
        build(NewRecord { obligation_amount: 0.0, outlay: 25.0, ..base("payment-only") }),
        build(NewRecord {
            source: RecordSource::Assistance,
            object_class: None,
            recipient: "CVS Health".into(),
            recipient_state: StateCode::parse("RI").unwrap(),
            emergency_funding: EmergencyFundingAct::AmericanRescuePlan,
            date: day("2022-06-30"),
            ..base("assist")
        }),
        build(NewRecord {
            program: "Health Center Program".into(),
            recipient_state: StateCode::parse("CA").unwrap(),
            emergency_funding: EmergencyFundingAct::NotDesignated,
            outlay: 80.0,
            date: day("2020-03-01"),
            ..base("ca-health")
        }),
    ]
}

fn ids(records: &[&FinancialRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn with(patch: FilterPatch) -> FilterState {
    let mut filters = FilterState::default();
    filters.apply_patch(&patch);
    filters
}

fn filtered(records: &[FinancialRecord], patch: FilterPatch) -> Vec<&FinancialRecord> {
    apply_filters(records, &with(patch))
}

fn id_strs<'a>(records: &[&'a FinancialRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn default_filters_pass_everything_in_order() {
    let records = small_set();
    let filtered = apply_filters(&records, &FilterState::default());
    assert_eq!(
        ids(&filtered),
        vec!["alloc", "dealloc", "payment-only", "assist", "ca-health"]
    );
}

#[test]
fn activity_type_selects_by_obligation_sign() {
    let records = small_set();
    let allocations =
        filtered(&records, FilterPatch::default().activity_type(ActivityType::Allocation));
    assert_eq!(ids(&allocations), vec!["alloc", "assist", "ca-health"]);

    let deallocations =
        filtered(&records, FilterPatch::default().activity_type(ActivityType::Deallocation));
    assert_eq!(ids(&deallocations), vec!["dealloc"]);
}

#[test]
fn transaction_type_commitment_and_payment() {
    let records = small_set();
    let commitments =
        filtered(&records, FilterPatch::default().transaction_type(TransactionType::Commitment));
    assert!(!ids(&commitments).contains(&"payment-only".to_string()));
    assert_eq!(commitments.len(), 4);

    let payments =
        filtered(&records, FilterPatch::default().transaction_type(TransactionType::Payment));
    assert_eq!(ids(&payments), vec!["payment-only", "ca-health"]);
}

#[test]
fn data_source_maps_financial_assistance_to_assistance_records() {
    let records = small_set();
    let assistance = apply_filters(
        &records,
        &with(FilterPatch::default().data_source(DataSourceFilter::FinancialAssistance)),
    );
    assert_eq!(ids(&assistance), vec!["assist"]);

    let contracts =
        filtered(&records, FilterPatch::default().data_source(DataSourceFilter::Contracts));
    assert_eq!(contracts.len(), 4);
}

#[test]
fn multi_select_is_or_within_a_dimension() {
    let records = small_set();
    let filters = with(FilterPatch::default().states([
        StateCode::parse("CA").unwrap(),
        StateCode::parse("RI").unwrap(),
    ]));
    assert_eq!(ids(&apply_filters(&records, &filters)), vec!["assist", "ca-health"]);

    let acts = with(FilterPatch::default().emergency_funding([
        EmergencyFundingAct::AmericanRescuePlan,
        EmergencyFundingAct::NotDesignated,
    ]));
    assert_eq!(ids(&apply_filters(&records, &acts)), vec!["assist", "ca-health"]);
}

#[test]
fn recipient_and_program_selections() {
    let records = small_set();
    let filters = with(FilterPatch::default().recipients(["CVS Health"]));
    assert_eq!(ids(&apply_filters(&records, &filters)), vec!["assist"]);

    let filters = with(FilterPatch::default().programs(["Health Center Program"]));
    assert_eq!(ids(&apply_filters(&records, &filters)), vec!["ca-health"]);
}

#[test]
fn date_range_is_inclusive_and_half_open_bounds_work() {
    let records = small_set();
    let filters = with(
        FilterPatch::default().date_range(Some(day("2021-01-15")), Some(day("2022-06-30"))),
    );
    assert_eq!(
        ids(&apply_filters(&records, &filters)),
        vec!["alloc", "dealloc", "payment-only", "assist"]
    );

    let only_start = with(FilterPatch::default().date_range(Some(day("2022-01-01")), None));
    assert_eq!(ids(&apply_filters(&records, &only_start)), vec!["assist"]);

    let only_end = with(FilterPatch::default().date_range(None, Some(day("2020-12-31"))));
    assert_eq!(ids(&apply_filters(&records, &only_end)), vec!["ca-health"]);
}

#[test]
fn membership_equals_conjunction_of_predicates() {
    let config = DashboardConfig::default_test();
    let records = generate_records(17, &config.fixture, FiscalCalendar::Federal).unwrap();
    let start = day("2021-01-01");
    let filters = with(
        FilterPatch::default()
            .activity_type(ActivityType::Allocation)
            .data_source(DataSourceFilter::Contracts)
            .emergency_funding([EmergencyFundingAct::CaresAct, EmergencyFundingAct::Other])
            .date_range(Some(start), None),
    );

    let passed = apply_filters(&records, &filters);
    let passed_ids = id_strs(&passed);
    for record in &records {
        let expected = record.obligation_amount > 0.0
            && record.source == RecordSource::Contracts
            && matches!(
                record.emergency_funding,
                EmergencyFundingAct::CaresAct | EmergencyFundingAct::Other
            )
            && record.date >= start;
        assert_eq!(
            passed_ids.contains(&record.id.as_str()),
            expected,
            "membership mismatch for record {}",
            record.id
        );
    }
}

#[test]
fn adding_a_dimension_never_grows_the_result() {
    let config = DashboardConfig::default_test();
    let records = generate_records(5, &config.fixture, FiscalCalendar::Federal).unwrap();

    let loose = with(FilterPatch::default().activity_type(ActivityType::Allocation));
    let strict = with(
        FilterPatch::default()
            .activity_type(ActivityType::Allocation)
            .states([StateCode::parse("TX").unwrap(), StateCode::parse("NY").unwrap()]),
    );

    let loose_result = apply_filters(&records, &loose);
    let loose_ids = id_strs(&loose_result);
    let strict_result = apply_filters(&records, &strict);
    assert!(strict_result.len() <= loose_ids.len());
    for record in strict_result {
        assert!(
            loose_ids.contains(&record.id.as_str()),
            "record {} passed the stricter filter but not the looser one",
            record.id
        );
    }
}

#[test]
fn filtering_does_not_touch_input() {
    let records = small_set();
    let before = records.clone();
    let _ = filtered(&records, FilterPatch::default().activity_type(ActivityType::Deallocation));
    assert_eq!(records, before);
}
