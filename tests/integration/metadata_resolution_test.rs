// Store metadata resolution
//
// Malformed account JSON must only drop that account's stores, misses
// must come back as empty strings, and the resolved names must reach the
// rendered sheets.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;

use shop_report::core::DateRange;
use shop_report::reports::models::CellValue;
use shop_report::reports::ReportRequest;
use shop_report::stores::{AccountRecord, MetadataResolver, StoreProfile};

fn with_regions(mut record: AccountRecord, region_json: &str) -> AccountRecord {
    record.region_json = Some(region_json.to_string());
    record
}

#[tokio::test]
async fn test_directory_merges_metadata_and_regions() {
    let accounts = vec![with_regions(
        account("acc-1", "张三", r#"[{"shop_id": 1001}]"#),
        r#"[{"shop_id": "1001", "city": "宁波", "district": "鄞州区", "region": "浙东"}]"#,
    )];
    let resolver = MetadataResolver::new(Arc::new(InMemoryAccountRepository::new(accounts)));

    let directory = resolver.load_directory(None).await.unwrap();
    let profile = directory.profile(1001);

    assert_eq!(profile.operator, "张三");
    assert_eq!(profile.sales, "acc-1-sales");
    // account city wins over the region record
    assert_eq!(profile.city, "杭州");
    assert_eq!(profile.district, "鄞州区");
    assert_eq!(profile.region, "浙东");
}

#[tokio::test]
async fn test_malformed_account_does_not_abort_resolution() {
    let accounts = vec![
        account("acc-1", "张三", r#"[{"shop_id": 1001}, "#),
        account("acc-2", "李四", r#"[{"shop_id": 2001}]"#),
        with_regions(account("acc-3", "王五", r#"[{"shop_id": 3001}]"#), "not json"),
    ];
    let resolver = MetadataResolver::new(Arc::new(InMemoryAccountRepository::new(accounts)));

    let directory = resolver.load_directory(None).await.unwrap();

    assert_eq!(directory.profile(1001), StoreProfile::default());
    assert_eq!(directory.profile(2001).operator, "李四");
    let third = directory.profile(3001);
    assert_eq!(third.operator, "王五");
    assert_eq!(third.district, "");
}

#[tokio::test]
async fn test_last_account_wins_for_shared_store() {
    let accounts = vec![
        account("acc-1", "张三", r#"[{"shop_id": 1001}]"#),
        account("acc-2", "李四", r#"[{"shop_id": 1001}]"#),
    ];
    let resolver = MetadataResolver::new(Arc::new(InMemoryAccountRepository::new(accounts)));

    let directory = resolver.load_directory(None).await.unwrap();
    assert_eq!(directory.profile(1001).operator, "李四");
}

#[tokio::test]
async fn test_account_filter_restricts_accounts() {
    let accounts = vec![
        account("acc-1", "张三", r#"[{"shop_id": 1001}]"#),
        account("acc-2", "李四", r#"[{"shop_id": 2001}]"#),
    ];
    let resolver = MetadataResolver::new(Arc::new(InMemoryAccountRepository::new(accounts)));

    let filter = vec!["acc-2".to_string()];
    let directory = resolver.load_directory(Some(&filter)).await.unwrap();

    assert_eq!(directory.profile(1001).operator, "");
    assert_eq!(directory.profile(2001).operator, "李四");
}

#[tokio::test]
async fn test_daily_summary_carries_resolved_metadata() {
    let day = date(2025, 12, 12);
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(
        DateRange::single_day(day),
        vec![aggregate(1001, "西湖店"), aggregate(1002, "")],
    );
    let ctx = report_service(
        metrics,
        vec![account("acc-1", "张三", r#"[{"shop_id": 1001}]"#)],
    );

    let document = ctx
        .service
        .build_document(&ReportRequest::Daily { date: day })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(document.sheet_names(), vec!["日报", "西湖店", "门店1002"]);

    let summary = document.sheet("日报").unwrap();
    let known = &summary.rows[1];
    assert_eq!(known.value(3), Some(&CellValue::text("张三")));
    assert_eq!(known.value(4), Some(&CellValue::text("杭州")));

    let unknown = &summary.rows[2];
    assert_eq!(unknown.value(3), Some(&CellValue::text("")));
    assert_eq!(unknown.value(6), Some(&CellValue::text("门店1002")));
}
