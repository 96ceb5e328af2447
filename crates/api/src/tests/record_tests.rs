// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the canonical record handlers.

use envdash_domain::{FilterParams, MeasurementPatch, PollutantSummary, PollutionRecord};

use crate::ApiError;
use crate::handlers::{
    create_record, delete_record, get_record, list_records, record_summary, record_trends,
    update_record,
};
use crate::request_response::{TrendsQuery, TrendsResponse};
use crate::tests::helpers::{create_test_account, create_test_patch, create_test_persistence};

fn year_params(year: &str) -> FilterParams {
    FilterParams {
        year: Some(String::from(year)),
        ..FilterParams::default()
    }
}

#[test]
fn test_create_then_get_record() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let created: PollutionRecord = create_record(
        &mut persistence,
        &account,
        create_test_patch(2021, 3, "Delhi"),
    )
    .unwrap();
    let fetched: PollutionRecord =
        get_record(&mut persistence, &account, created.id.value()).unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.measurement.location, "Delhi");
    assert_eq!(fetched.month(), 3);
}

#[test]
fn test_create_record_requires_every_field() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let mut patch: MeasurementPatch = create_test_patch(2021, 3, "Delhi");
    patch.toluene = None;

    let result = create_record(&mut persistence, &account, patch);
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "toluene"
    ));
}

#[test]
fn test_create_record_rejects_invalid_values() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let result = create_record(
        &mut persistence,
        &account,
        create_test_patch(2021, 13, "Delhi"),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "month"
    ));

    let mut patch: MeasurementPatch = create_test_patch(2021, 3, "Delhi");
    patch.benzene = Some(-1.0);
    let result = create_record(&mut persistence, &account, patch);
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "benzene"
    ));

    assert!(list_records(&mut persistence, &account, &year_params("2021"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_get_missing_record_is_not_found() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let result = get_record(&mut persistence, &account, 404);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_list_records_defaults_to_2021() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    create_record(&mut persistence, &account, create_test_patch(2020, 5, "Agra")).unwrap();
    create_record(&mut persistence, &account, create_test_patch(2021, 2, "Pune")).unwrap();

    let records: Vec<PollutionRecord> =
        list_records(&mut persistence, &account, &FilterParams::default()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].measurement.location, "Pune");
}

#[test]
fn test_list_records_year_month_range() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    for month in [1, 4, 6, 9] {
        create_record(
            &mut persistence,
            &account,
            create_test_patch(2022, month, "Delhi"),
        )
        .unwrap();
    }

    let params: FilterParams = FilterParams {
        year: Some(String::from("2022")),
        start_month: Some(String::from("4")),
        end_month: Some(String::from("6")),
        ..FilterParams::default()
    };
    let months: Vec<u8> = list_records(&mut persistence, &account, &params)
        .unwrap()
        .iter()
        .map(PollutionRecord::month)
        .collect();

    assert_eq!(months, vec![4, 6]);
}

#[test]
fn test_list_records_rejects_malformed_filter() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let result = list_records(&mut persistence, &account, &year_params("twenty"));
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "year"
    ));
}

#[test]
fn test_update_record_applies_partial_patch() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);
    let created: PollutionRecord = create_record(
        &mut persistence,
        &account,
        create_test_patch(2021, 3, "Delhi"),
    )
    .unwrap();

    let patch: MeasurementPatch = MeasurementPatch {
        benzene: Some(5.5),
        ..MeasurementPatch::default()
    };
    let updated: PollutionRecord =
        update_record(&mut persistence, &account, created.id.value(), &patch).unwrap();

    assert!((updated.measurement.benzene - 5.5).abs() < f64::EPSILON);
    assert_eq!(updated.measurement.location, "Delhi");
    assert_eq!(updated.id, created.id);
}

#[test]
fn test_update_record_rejects_empty_patch() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);
    let created: PollutionRecord = create_record(
        &mut persistence,
        &account,
        create_test_patch(2021, 3, "Delhi"),
    )
    .unwrap();

    let result = update_record(
        &mut persistence,
        &account,
        created.id.value(),
        &MeasurementPatch::default(),
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_update_missing_record_is_not_found() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let result = update_record(
        &mut persistence,
        &account,
        99,
        &create_test_patch(2021, 3, "Delhi"),
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_record_then_not_found() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);
    let created: PollutionRecord = create_record(
        &mut persistence,
        &account,
        create_test_patch(2021, 3, "Delhi"),
    )
    .unwrap();

    let response = delete_record(&mut persistence, &account, created.id.value()).unwrap();
    assert_eq!(response.message, "Record deleted successfully");
    assert_eq!(response.id, created.id.value());

    assert!(matches!(
        delete_record(&mut persistence, &account, created.id.value()),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_trends_list_each_record_in_month_order() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    create_record(&mut persistence, &account, create_test_patch(2021, 3, "Delhi")).unwrap();
    let mut patch: MeasurementPatch = create_test_patch(2021, 3, "Agra");
    patch.benzene = Some(4.8);
    create_record(&mut persistence, &account, patch).unwrap();
    create_record(&mut persistence, &account, create_test_patch(2021, 1, "Delhi")).unwrap();
    create_record(&mut persistence, &account, create_test_patch(2019, 7, "Delhi")).unwrap();

    let response: TrendsResponse = record_trends(
        &mut persistence,
        &account,
        &TrendsQuery {
            year: Some(String::from("2021")),
        },
    )
    .unwrap();

    assert_eq!(response.year, 2021);
    let months: Vec<u8> = response
        .monthly_trends
        .iter()
        .map(|trend| trend.month)
        .collect();
    assert_eq!(months, vec![1, 3, 3]);
    assert!((response.monthly_trends[1].benzene - 3.2).abs() < 1e-9);
    assert!((response.monthly_trends[2].benzene - 4.8).abs() < 1e-9);
}

#[test]
fn test_trends_with_year_zero_use_default() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);
    create_record(&mut persistence, &account, create_test_patch(2021, 4, "Delhi")).unwrap();

    let response: TrendsResponse = record_trends(
        &mut persistence,
        &account,
        &TrendsQuery {
            year: Some(String::from("0")),
        },
    )
    .unwrap();

    assert_eq!(response.year, 2021);
    assert_eq!(response.monthly_trends.len(), 1);
}

#[test]
fn test_trends_with_unparseable_year_use_default() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    let response: TrendsResponse = record_trends(
        &mut persistence,
        &account,
        &TrendsQuery {
            year: Some(String::from("latest")),
        },
    )
    .unwrap();

    assert_eq!(response.year, 2021);
    assert!(response.monthly_trends.is_empty());
}

#[test]
fn test_summary_counts_filtered_records() {
    let mut persistence = create_test_persistence();
    let account = create_test_account(&mut persistence);

    create_record(&mut persistence, &account, create_test_patch(2021, 3, "Delhi")).unwrap();
    create_record(&mut persistence, &account, create_test_patch(2021, 4, "Agra")).unwrap();
    create_record(&mut persistence, &account, create_test_patch(2020, 4, "Agra")).unwrap();

    let summary: PollutantSummary =
        record_summary(&mut persistence, &account, &year_params("2021")).unwrap();

    assert_eq!(summary.count, 2);
    assert!((summary.avg_no - 9.4).abs() < 1e-9);
}
