// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;

use crate::tests::create_test_record;
use crate::{DomainError, FilterParams, FilterSpec, PollutionRecord, select, sort_chronologically};

fn create_test_params(pairs: &[(&str, &str)]) -> FilterParams {
    let mut params: FilterParams = FilterParams::default();
    for (key, value) in pairs {
        let value: Option<String> = Some((*value).to_string());
        match *key {
            "mode" => params.mode = value,
            "year" => params.year = value,
            "startYear" => params.start_year = value,
            "endYear" => params.end_year = value,
            "startMonth" => params.start_month = value,
            "endMonth" => params.end_month = value,
            other => panic!("unknown filter parameter {other}"),
        }
    }
    params
}

fn ids(records: &[PollutionRecord]) -> Vec<i64> {
    records.iter().map(|record| record.id.value()).collect()
}

fn create_test_records() -> Vec<PollutionRecord> {
    vec![
        create_test_record(1, 2021, 5),
        create_test_record(2, 2019, 2),
        create_test_record(3, 2021, 1),
        create_test_record(4, 2020, 11),
        create_test_record(5, 2021, 9),
    ]
}

#[test]
fn test_single_year_selects_only_that_year() {
    let selected = select(&create_test_records(), &FilterSpec::SingleYear { year: 2021 });
    assert_eq!(ids(&selected), vec![1, 3, 5]);
}

#[test]
fn test_year_range_is_inclusive() {
    let spec = FilterSpec::YearRange {
        start_year: 2019,
        end_year: 2020,
    };
    assert_eq!(ids(&select(&create_test_records(), &spec)), vec![2, 4]);
}

#[test]
fn test_inverted_year_range_matches_nothing() {
    let spec = FilterSpec::YearRange {
        start_year: 2021,
        end_year: 2019,
    };
    assert!(select(&create_test_records(), &spec).is_empty());
}

#[test]
fn test_year_month_range_is_inclusive() {
    let spec = FilterSpec::YearMonthRange {
        year: 2021,
        start_month: 1,
        end_month: 5,
    };
    assert_eq!(ids(&select(&create_test_records(), &spec)), vec![1, 3]);
}

#[test]
fn test_selection_is_a_subset_and_every_member_matches() {
    let records: Vec<PollutionRecord> = create_test_records();
    let specs: [FilterSpec; 3] = [
        FilterSpec::default(),
        FilterSpec::YearRange {
            start_year: 2000,
            end_year: 2100,
        },
        FilterSpec::YearMonthRange {
            year: 2020,
            start_month: 11,
            end_month: 11,
        },
    ];

    for spec in specs {
        let selected = select(&records, &spec);
        assert!(selected.len() <= records.len());
        for record in &selected {
            assert!(records.contains(record));
            assert!(spec.matches(record.year(), record.month()));
        }
    }
}

#[test]
fn test_default_filter_is_year_2021() {
    assert_eq!(FilterSpec::default(), FilterSpec::SingleYear { year: 2021 });
}

#[test]
fn test_sort_chronologically_is_stable() {
    let mut records: Vec<PollutionRecord> = vec![
        create_test_record(1, 2021, 3),
        create_test_record(2, 2020, 12),
        create_test_record(3, 2021, 3),
        create_test_record(4, 2021, 1),
    ];

    sort_chronologically(&mut records);

    assert_eq!(ids(&records), vec![2, 4, 1, 3]);
}

#[test]
fn test_filter_spec_serializes_with_mode_tag() {
    let spec = FilterSpec::YearMonthRange {
        year: 2021,
        start_month: 2,
        end_month: 4,
    };

    assert_eq!(
        serde_json::to_value(spec).unwrap(),
        json!({ "mode": "yearMonthRange", "year": 2021, "startMonth": 2, "endMonth": 4 })
    );
}

#[test]
fn test_resolve_without_params_uses_default() {
    assert_eq!(FilterParams::default().resolve(), Ok(FilterSpec::default()));
    assert!(FilterParams::default().is_empty());
}

#[test]
fn test_resolve_treats_blank_values_as_absent() {
    let params: FilterParams = create_test_params(&[("year", "  "), ("mode", "")]);
    assert!(params.is_empty());
    assert_eq!(params.resolve(), Ok(FilterSpec::default()));
}

#[test]
fn test_resolve_infers_single_year() {
    let params: FilterParams = create_test_params(&[("year", "2019")]);
    assert_eq!(params.resolve(), Ok(FilterSpec::SingleYear { year: 2019 }));
}

#[test]
fn test_resolve_infers_year_range() {
    let params: FilterParams = create_test_params(&[("startYear", "2018"), ("endYear", "2020")]);
    assert_eq!(
        params.resolve(),
        Ok(FilterSpec::YearRange {
            start_year: 2018,
            end_year: 2020
        })
    );
}

#[test]
fn test_resolve_infers_year_month_range() {
    let params: FilterParams =
        create_test_params(&[("year", "2021"), ("startMonth", "3"), ("endMonth", "6")]);
    assert_eq!(
        params.resolve(),
        Ok(FilterSpec::YearMonthRange {
            year: 2021,
            start_month: 3,
            end_month: 6
        })
    );
}

#[test]
fn test_resolve_explicit_mode_ignores_other_params() {
    let params: FilterParams = create_test_params(&[
        ("mode", "yearRange"),
        ("year", "2021"),
        ("startYear", "2010"),
        ("endYear", "2012"),
    ]);
    assert_eq!(
        params.resolve(),
        Ok(FilterSpec::YearRange {
            start_year: 2010,
            end_year: 2012
        })
    );
}

#[test]
fn test_resolve_explicit_mode_requires_its_params() {
    let params: FilterParams = create_test_params(&[("mode", "yearMonthRange"), ("year", "2021")]);
    assert_eq!(
        params.resolve(),
        Err(DomainError::MissingField("startMonth"))
    );
}

#[test]
fn test_resolve_rejects_unknown_mode() {
    let params: FilterParams = create_test_params(&[("mode", "decade")]);
    assert!(matches!(
        params.resolve(),
        Err(DomainError::AmbiguousFilter(_))
    ));
}

#[test]
fn test_resolve_rejects_mixed_modes() {
    let mixed: [&[(&str, &str)]; 4] = [
        &[("year", "2021"), ("startYear", "2019"), ("endYear", "2020")],
        &[("startYear", "2019")],
        &[("year", "2021"), ("startMonth", "2")],
        &[("startMonth", "2"), ("endMonth", "4")],
    ];

    for pairs in mixed {
        assert!(
            matches!(
                create_test_params(pairs).resolve(),
                Err(DomainError::AmbiguousFilter(_))
            ),
            "expected {pairs:?} to be rejected"
        );
    }
}

#[test]
fn test_resolve_rejects_non_integer_values() {
    let params: FilterParams = create_test_params(&[("year", "twenty")]);
    assert_eq!(
        params.resolve(),
        Err(DomainError::InvalidFilterParameter {
            parameter: "year",
            value: String::from("twenty"),
        })
    );
}
