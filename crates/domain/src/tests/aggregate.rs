// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;

use crate::tests::create_test_record;
use crate::{MonthlyTrend, PollutantSummary, PollutionRecord, monthly_trends, summarize};

fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn test_monthly_trends_keep_each_location() {
    let mut second: PollutionRecord = create_test_record(2, 2021, 3);
    second.measurement.location = String::from("Mumbai");
    second.measurement.benzene = 4.8;
    second.measurement.toluene = 2.9;
    second.measurement.no = 0.6;

    let records: Vec<PollutionRecord> = vec![
        second,
        create_test_record(1, 2021, 3),
        create_test_record(3, 2021, 1),
    ];

    let trends: Vec<MonthlyTrend> = monthly_trends(&records, 2021);

    assert_eq!(trends.len(), 3);
    assert_eq!(trends[0].month, 1);
    assert!(approx(trends[0].benzene, 3.2));
    assert_eq!(trends[1].month, 3);
    assert!(approx(trends[1].benzene, 3.2));
    assert_eq!(trends[2].month, 3);
    assert!(approx(trends[2].benzene, 4.8));
    assert!(approx(trends[2].toluene, 2.9));
    assert!(approx(trends[2].no, 0.6));
}

#[test]
fn test_monthly_trends_ignore_other_years() {
    let records: Vec<PollutionRecord> = vec![
        create_test_record(1, 2020, 6),
        create_test_record(2, 2022, 6),
    ];

    assert!(monthly_trends(&records, 2021).is_empty());
}

#[test]
fn test_monthly_trends_are_ordered_by_month() {
    let records: Vec<PollutionRecord> = vec![
        create_test_record(1, 2021, 12),
        create_test_record(2, 2021, 2),
        create_test_record(3, 2021, 7),
    ];

    let months: Vec<u8> = monthly_trends(&records, 2021)
        .iter()
        .map(|trend| trend.month)
        .collect();

    assert_eq!(months, vec![2, 7, 12]);
}

#[test]
fn test_summary_of_empty_set_is_zero() {
    let summary: PollutantSummary = summarize(&[]);

    assert_eq!(summary.count, 0);
    assert!(approx(summary.avg_benzene, 0.0));
    assert!(approx(summary.avg_toluene, 0.0));
    assert!(approx(summary.avg_no, 0.0));
}

#[test]
fn test_summary_averages_all_records() {
    let mut other: PollutionRecord = create_test_record(2, 2020, 1);
    other.measurement.benzene = 0.8;
    other.measurement.toluene = 0.9;
    other.measurement.no = 0.6;

    let summary: PollutantSummary = summarize(&[create_test_record(1, 2021, 1), other]);

    assert_eq!(summary.count, 2);
    assert!(approx(summary.avg_benzene, 2.0));
    assert!(approx(summary.avg_toluene, 1.0));
    assert!(approx(summary.avg_no, 5.0));
}

#[test]
fn test_summary_serializes_camel_case() {
    let summary: PollutantSummary = summarize(&[create_test_record(1, 2021, 1)]);

    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "count": 1,
            "avgBenzene": 3.2,
            "avgToluene": 1.1,
            "avgNo": 9.4
        })
    );
}
