// Contract tests for the report HTTP API
//
// Runs the real route configuration against in-memory repositories and
// checks status codes, error payloads, download headers and batch results.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::header, test, web, App};
use serde_json::json;

use helpers::*;

use shop_report::core::DateRange;
use shop_report::middleware::{json_error_handler, RequestId};
use shop_report::modules::{health, reports};
use shop_report::reports::controllers::report_controller::{BatchResponse, XLSX_CONTENT_TYPE};

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestId)
                .app_data(web::Data::new($ctx.service.clone()))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .configure(health::configure)
                .configure(reports::configure),
        )
        .await
    };
}

fn seeded_daily() -> TestReportService {
    let metrics = InMemoryMetricsRepository::new();
    metrics.insert(
        DateRange::single_day(date(2025, 12, 12)),
        vec![aggregate(1, "S1")],
    );
    report_service(metrics, vec![])
}

#[actix_web::test]
async fn test_health_returns_status_and_timestamp() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);
    let app = app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_daily_without_report_date_is_400() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/daily")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("report_date"));
    assert!(ctx.metrics.calls().is_empty());
}

#[actix_web::test]
async fn test_weekly_with_missing_fields_is_400() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/weekly")
        .set_json(json!({"week1_start": "2025-11-10", "week1_end": "2025-11-16"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("缺少必要参数"));
}

#[actix_web::test]
async fn test_malformed_body_is_400_with_error_payload() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/monthly")
        .insert_header(header::ContentType::json())
        .set_payload("{\"month1_start\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_daily_without_data_is_404() {
    let ctx = report_service(InMemoryMetricsRepository::new(), vec![]);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/daily")
        .set_json(json!({"report_date": "2025-12-12"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "2025-12-12 没有数据");
}

#[actix_web::test]
async fn test_daily_download_is_xlsx_attachment() {
    let ctx = seeded_daily();
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/daily")
        .set_json(json!({"report_date": "2025-12-12"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        XLSX_CONTENT_TYPE
    );

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename*=UTF-8''"));
    assert!(resp.headers().contains_key("x-request-id"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[..2], b"PK");
    assert_eq!(written_files(&ctx.output).len(), 1);
}

#[actix_web::test]
async fn test_batch_isolates_failing_items() {
    let ctx = seeded_daily();
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/batch")
        .set_json(json!({
            "reports": [
                {"type": "daily", "params": {"report_date": "2025-12-12"}},
                {"type": "yearly", "params": {}},
                {"type": "weekly", "params": {"week1_start": "2025-11-10"}},
                {"type": "daily", "params": {"report_date": "2025-12-13"}}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: BatchResponse = test::read_body_json(resp).await;
    assert_eq!(body.results.len(), 4);

    assert_eq!(body.results[0].kind, "daily");
    assert_eq!(body.results[0].status, "success");
    assert!(body.results[0].filename.as_deref().unwrap().ends_with(".xlsx"));

    assert_eq!(body.results[1].kind, "yearly");
    assert_eq!(body.results[1].status, "error");
    assert!(body.results[1].message.as_deref().unwrap().contains("未知的报表类型: yearly"));

    assert_eq!(body.results[2].status, "error");
    assert!(body.results[2].message.as_deref().unwrap().contains("缺少必要参数"));

    assert_eq!(body.results[3].status, "error");
    assert_eq!(body.results[3].message.as_deref(), Some("没有数据"));

    assert_eq!(written_files(&ctx.output).len(), 1);
}

#[actix_web::test]
async fn test_batch_upstream_failure_is_per_item() {
    let metrics = InMemoryMetricsRepository::new();
    metrics.fail("connection refused");
    let ctx = report_service(metrics, vec![]);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/reports/batch")
        .set_json(json!({
            "reports": [
                {"type": "daily", "params": {"report_date": "2025-12-12"}},
                {"type": "custom", "params": {
                    "period1_start": "2025-11-01", "period1_end": "2025-11-07",
                    "period2_start": "2025-11-08", "period2_end": "2025-11-14"
                }}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: BatchResponse = test::read_body_json(resp).await;
    assert_eq!(body.results.len(), 2);
    for result in &body.results {
        assert_eq!(result.status, "error");
        assert!(result.message.as_deref().unwrap().contains("connection refused"));
    }
}
