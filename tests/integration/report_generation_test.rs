// End-to-end report generation over in-memory repositories
//
// Covers the dispatcher for every report kind: date-range resolution, the
// no-data outcome, document shape and the file written to the output dir.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;

use shop_report::core::{AppError, DateRange};
use shop_report::metrics::PeriodAggregate;
use shop_report::reports::models::{CellValue, RowKind};
use shop_report::reports::{ReportKind, ReportRequest};

fn weekly_ranges() -> (DateRange, DateRange) {
    (
        range(date(2025, 11, 10), date(2025, 11, 16)),
        range(date(2025, 11, 17), date(2025, 11, 23)),
    )
}

fn with_order_users(shop_id: i64, name: &str, order_users: i64) -> PeriodAggregate {
    PeriodAggregate {
        order_users,
        ..aggregate(shop_id, name)
    }
}

#[tokio::test]
async fn test_daily_report_lists_only_stores_with_rows() {
    let day = date(2025, 12, 12);
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(
        DateRange::single_day(day),
        vec![PeriodAggregate {
            exposure_users: 100,
            visit_users: 40,
            ..aggregate(1, "S1")
        }],
    );
    let ctx = report_service(metrics, vec![]);

    let document = ctx
        .service
        .build_document(&ReportRequest::Daily { date: day })
        .await
        .unwrap()
        .expect("daily data exists");

    assert_eq!(document.sheet_names(), vec!["日报", "S1"]);

    let summary = document.sheet("日报").unwrap();
    let data_rows: Vec<_> = summary.rows_of(RowKind::Data).collect();
    assert_eq!(data_rows.len(), 1);
    assert_eq!(data_rows[0].value(6), Some(&CellValue::text("S1")));
    assert_eq!(data_rows[0].value(7), Some(&CellValue::Integer(100)));

    let detail = document.sheet("S1").unwrap();
    assert_eq!(detail.rows.len(), 38);
    // exposure 100, visits 40
    let rate_row = detail
        .rows
        .iter()
        .find(|row| row.value(1) == Some(&CellValue::text("曝光访问转化率")))
        .unwrap();
    assert_eq!(rate_row.value(2), Some(&CellValue::text("40.0%")));
}

#[tokio::test]
async fn test_daily_report_queries_trailing_window_for_day_stores() {
    let day = date(2025, 12, 12);
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(DateRange::single_day(day), vec![aggregate(7, "S7")]);
    metrics.insert(
        DateRange::trailing(day, 7),
        vec![PeriodAggregate {
            force_offline_count: 2,
            coupon_orders: 12,
            ..aggregate(7, "S7")
        }],
    );
    let ctx = report_service(metrics, vec![]);

    let document = ctx
        .service
        .build_document(&ReportRequest::Daily { date: day })
        .await
        .unwrap()
        .unwrap();

    let calls = ctx.metrics.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0, range(date(2025, 12, 6), day));
    assert_eq!(calls[1].1, Some(vec![7]));

    let detail = document.sheet("S7").unwrap();
    let banner = detail.rows.last().unwrap();
    assert_eq!(banner.value(4), Some(&CellValue::text("近7日被强制下线2次")));

    let coupon_check = detail
        .rows
        .iter()
        .find(|row| row.value(1) == Some(&CellValue::text("近7日优惠码订单")))
        .unwrap();
    assert_eq!(coupon_check.value(4), Some(&CellValue::text("达标")));
}

#[tokio::test]
async fn test_daily_report_without_rows_is_no_data() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);

    let generated = ctx
        .service
        .generate(&ReportRequest::Daily { date: date(2025, 12, 12) }, None)
        .await
        .unwrap();

    assert!(generated.is_none());
    assert!(written_files(&ctx.output).is_empty());
}

#[tokio::test]
async fn test_weekly_delta_is_static_in_summary_and_live_in_detail() {
    let (first, second) = weekly_ranges();
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(first, vec![with_order_users(1, "S1", 10)]);
    metrics.insert(second, vec![with_order_users(1, "S1", 15)]);
    let ctx = report_service(metrics, vec![]);

    let document = ctx
        .service
        .build_document(&ReportRequest::Weekly { first, second })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(document.sheet_names(), vec!["周报", "S1"]);

    let summary = document.sheet("周报").unwrap();
    let header = &summary.rows[0];
    let column = header
        .cells
        .iter()
        .position(|cell| cell.value == CellValue::text("下单人数"))
        .unwrap();
    let delta_row = summary.rows_of(RowKind::Delta).next().unwrap();
    assert_eq!(delta_row.value(column), Some(&CellValue::Integer(5)));

    let detail = document.sheet("S1").unwrap();
    let (index, row) = detail
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.value(0) == Some(&CellValue::text("下单人数")))
        .unwrap();
    let excel_row = index + 1;
    match row.value(3) {
        Some(CellValue::Formula { expression, cached }) => {
            assert_eq!(expression, &format!("=C{}-B{}", excel_row, excel_row));
            assert_eq!(*cached, 5.0);
        }
        other => panic!("expected a formula, got {:?}", other),
    }
}

#[tokio::test]
async fn test_store_missing_from_first_period_defaults_to_zero() {
    let (first, second) = weekly_ranges();
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(first, vec![with_order_users(1, "S1", 3)]);
    metrics.insert(second, vec![with_order_users(1, "S1", 4), with_order_users(2, "S2", 9)]);
    let ctx = report_service(metrics, vec![]);

    let document = ctx
        .service
        .build_document(&ReportRequest::Monthly { first, second })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(document.sheet_names(), vec!["月报", "S1", "S2"]);

    let summary = document.sheet("月报").unwrap();
    // header + two 8-row blocks
    assert_eq!(summary.rows.len(), 17);
    let deltas: Vec<_> = summary.rows_of(RowKind::Delta).collect();
    assert_eq!(deltas.len(), 4);
}

#[tokio::test]
async fn test_custom_report_filters_stores_and_leads_with_wide_sheet() {
    let first = range(date(2025, 11, 1), date(2025, 11, 7));
    let second = range(date(2025, 11, 8), date(2025, 11, 14));
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(first, vec![with_order_users(1, "S1", 1), with_order_users(2, "S2", 2)]);
    metrics.insert(second, vec![with_order_users(1, "S1", 5), with_order_users(2, "S2", 6)]);
    let ctx = report_service(metrics, vec![]);

    let request = ReportRequest::Custom {
        first,
        second,
        shop_ids: vec![2],
    };
    let report = ctx.service.generate(&request, None).await.unwrap().unwrap();

    assert_eq!(report.kind, ReportKind::Custom);
    assert_eq!(report.store_count, 1);
    // wide sheet, comparison summary, one detail sheet
    assert_eq!(report.sheet_count, 3);
    assert!(report.file_name.starts_with("自定义 1家门店非餐 20251108~20251114 "));
    assert_eq!(written_files(&ctx.output), vec![report.file_name.clone()]);

    for (_, filter) in ctx.metrics.calls() {
        assert_eq!(filter, Some(vec![2]));
    }

    let document = ctx.service.build_document(&request).await.unwrap().unwrap();
    assert_eq!(document.sheet_names(), vec!["自定义报表", "对比汇总", "S2"]);
}

#[tokio::test]
async fn test_identical_requests_write_distinct_files() {
    let day = date(2025, 12, 12);
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(DateRange::single_day(day), vec![aggregate(1, "S1")]);
    let ctx = report_service(metrics, vec![]);

    let request = ReportRequest::Daily { date: day };
    let a = ctx.service.generate(&request, None).await.unwrap().unwrap();
    let b = ctx.service.generate(&request, None).await.unwrap().unwrap();

    assert_ne!(a.path, b.path);
    assert_eq!(written_files(&ctx.output).len(), 2);
    assert!(a.path.starts_with(ctx.output.path()));
}

#[tokio::test]
async fn test_output_name_stays_inside_output_dir() {
    let day = date(2025, 12, 12);
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(DateRange::single_day(day), vec![aggregate(1, "S1")]);
    let ctx = report_service(metrics, vec![]);

    let report = ctx
        .service
        .generate(&ReportRequest::Daily { date: day }, Some("../outside/daily"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.file_name, "daily.xlsx");
    assert_eq!(report.path, ctx.output.path().join("daily.xlsx"));
}

#[tokio::test]
async fn test_upstream_failure_is_surfaced() {
    let metrics = InMemoryMetricsRepository::new();
    metrics.fail("connection refused");
    let ctx = report_service(metrics, vec![]);

    let (first, second) = weekly_ranges();
    let result = ctx
        .service
        .generate(&ReportRequest::Weekly { first, second }, None)
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(written_files(&ctx.output).is_empty());
}
