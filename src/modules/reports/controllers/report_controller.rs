use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{dates, AppError, DateRange, Result, ShopId};
use crate::modules::reports::models::{ReportKind, ReportRequest};
use crate::modules::reports::services::{GeneratedReport, ReportService};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const NO_DATA: &str = "没有数据";
const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// Treats empty and whitespace-only strings as missing
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve two ranges from four named parameters, reporting every missing name at once
fn two_periods(fields: [(&str, &Option<String>); 4]) -> Result<(DateRange, DateRange)> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "缺少必要参数: {}",
            missing.join(", ")
        )));
    }

    let value = |index: usize| present(fields[index].1).unwrap_or_default();
    let first = DateRange::parse(fields[0].0, value(0), fields[1].0, value(1))?;
    let second = DateRange::parse(fields[2].0, value(2), fields[3].0, value(3))?;
    Ok((first, second))
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportParams {
    pub report_date: Option<String>,
    pub output_filename: Option<String>,
}

impl DailyReportParams {
    pub fn to_request(&self) -> Result<ReportRequest> {
        let raw = present(&self.report_date)
            .ok_or_else(|| AppError::validation("缺少参数 report_date"))?;
        Ok(ReportRequest::Daily {
            date: dates::parse_date("report_date", raw)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeeklyReportParams {
    pub week1_start: Option<String>,
    pub week1_end: Option<String>,
    pub week2_start: Option<String>,
    pub week2_end: Option<String>,
    pub output_filename: Option<String>,
}

impl WeeklyReportParams {
    pub fn to_request(&self) -> Result<ReportRequest> {
        let (first, second) = two_periods([
            ("week1_start", &self.week1_start),
            ("week1_end", &self.week1_end),
            ("week2_start", &self.week2_start),
            ("week2_end", &self.week2_end),
        ])?;
        Ok(ReportRequest::Weekly { first, second })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportParams {
    pub month1_start: Option<String>,
    pub month1_end: Option<String>,
    pub month2_start: Option<String>,
    pub month2_end: Option<String>,
    pub output_filename: Option<String>,
}

impl MonthlyReportParams {
    pub fn to_request(&self) -> Result<ReportRequest> {
        let (first, second) = two_periods([
            ("month1_start", &self.month1_start),
            ("month1_end", &self.month1_end),
            ("month2_start", &self.month2_start),
            ("month2_end", &self.month2_end),
        ])?;
        Ok(ReportRequest::Monthly { first, second })
    }
}

/// Store id as sent by clients, either `1001` or `"1001"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShopIdParam {
    Number(ShopId),
    Text(String),
}

impl ShopIdParam {
    fn resolve(&self) -> Result<ShopId> {
        match self {
            ShopIdParam::Number(id) => Ok(*id),
            ShopIdParam::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid shop id: '{}'", text))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomReportParams {
    pub period1_start: Option<String>,
    pub period1_end: Option<String>,
    pub period2_start: Option<String>,
    pub period2_end: Option<String>,
    pub shop_ids: Option<Vec<ShopIdParam>>,
    pub output_filename: Option<String>,
}

impl CustomReportParams {
    pub fn to_request(&self) -> Result<ReportRequest> {
        let (first, second) = two_periods([
            ("period1_start", &self.period1_start),
            ("period1_end", &self.period1_end),
            ("period2_start", &self.period2_start),
            ("period2_end", &self.period2_end),
        ])?;
        let shop_ids = self
            .shop_ids
            .iter()
            .flatten()
            .map(ShopIdParam::resolve)
            .collect::<Result<Vec<_>>>()?;
        Ok(ReportRequest::Custom {
            first,
            second,
            shop_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub reports: Vec<BatchItem>,
}

#[derive(Debug, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchItemResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchItemResult {
    fn success(kind: &str, filename: String) -> Self {
        Self {
            kind: kind.to_string(),
            status: STATUS_SUCCESS.to_string(),
            filename: Some(filename),
            message: None,
        }
    }

    fn error(kind: &str, message: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            status: STATUS_ERROR.to_string(),
            filename: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItemResult>,
}

fn download_name_ascii(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect()
}

/// Stream a written workbook back as an attachment
async fn attachment(report: GeneratedReport) -> Result<HttpResponse> {
    let bytes = tokio::fs::read(&report.path).await?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(download_name_ascii(&report.file_name)),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: report.file_name.clone().into_bytes(),
            }),
        ],
    };

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(disposition)
        .body(bytes))
}

async fn generate_or_not_found(
    service: &ReportService,
    request: ReportRequest,
    output_name: Option<&str>,
    no_data: String,
) -> Result<HttpResponse> {
    match service.generate(&request, output_name).await? {
        Some(report) => attachment(report).await,
        None => Err(AppError::not_found(no_data)),
    }
}

/// POST /reports/daily
pub async fn daily_report(
    service: web::Data<Arc<ReportService>>,
    body: web::Json<DailyReportParams>,
) -> Result<HttpResponse> {
    let request = body.to_request()?;
    let no_data = match &request {
        ReportRequest::Daily { date } => format!("{} {}", date, NO_DATA),
        _ => NO_DATA.to_string(),
    };
    generate_or_not_found(&service, request, present(&body.output_filename), no_data).await
}

/// POST /reports/weekly
pub async fn weekly_report(
    service: web::Data<Arc<ReportService>>,
    body: web::Json<WeeklyReportParams>,
) -> Result<HttpResponse> {
    let request = body.to_request()?;
    generate_or_not_found(
        &service,
        request,
        present(&body.output_filename),
        NO_DATA.to_string(),
    )
    .await
}

/// POST /reports/monthly
pub async fn monthly_report(
    service: web::Data<Arc<ReportService>>,
    body: web::Json<MonthlyReportParams>,
) -> Result<HttpResponse> {
    let request = body.to_request()?;
    generate_or_not_found(
        &service,
        request,
        present(&body.output_filename),
        NO_DATA.to_string(),
    )
    .await
}

/// POST /reports/custom
pub async fn custom_report(
    service: web::Data<Arc<ReportService>>,
    body: web::Json<CustomReportParams>,
) -> Result<HttpResponse> {
    let request = body.to_request()?;
    generate_or_not_found(
        &service,
        request,
        present(&body.output_filename),
        NO_DATA.to_string(),
    )
    .await
}

/// Batch params arrive as arbitrary JSON; a missing object counts as empty
fn params_object(params: &serde_json::Value) -> serde_json::Value {
    if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    }
}

fn batch_request(
    kind: ReportKind,
    params: &serde_json::Value,
) -> Result<(ReportRequest, Option<String>)> {
    let params = params_object(params);
    Ok(match kind {
        ReportKind::Daily => {
            let p: DailyReportParams = serde_json::from_value(params)?;
            (p.to_request()?, p.output_filename)
        }
        ReportKind::Weekly => {
            let p: WeeklyReportParams = serde_json::from_value(params)?;
            (p.to_request()?, p.output_filename)
        }
        ReportKind::Monthly => {
            let p: MonthlyReportParams = serde_json::from_value(params)?;
            (p.to_request()?, p.output_filename)
        }
        ReportKind::Custom => {
            let p: CustomReportParams = serde_json::from_value(params)?;
            (p.to_request()?, p.output_filename)
        }
    })
}

async fn run_batch_item(service: &ReportService, item: &BatchItem) -> Result<Option<String>> {
    let kind = ReportKind::from_str(&item.kind)?;
    let (request, output_name) = batch_request(kind, &item.params)?;
    let output_name = output_name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    Ok(service
        .generate(&request, output_name)
        .await?
        .map(|report| report.file_name))
}

/// POST /reports/batch
///
/// Items run one after another; a failing item only affects its own result.
pub async fn batch_reports(
    service: web::Data<Arc<ReportService>>,
    body: web::Json<BatchRequest>,
) -> Result<HttpResponse> {
    let mut results = Vec::with_capacity(body.reports.len());

    for (index, item) in body.reports.iter().enumerate() {
        let result = match run_batch_item(&service, item).await {
            Ok(Some(filename)) => BatchItemResult::success(&item.kind, filename),
            Ok(None) => BatchItemResult::error(&item.kind, NO_DATA),
            Err(e) => {
                warn!(
                    index,
                    kind = %item.kind,
                    transient = e.is_transient(),
                    error = %e,
                    "Batch item failed"
                );
                BatchItemResult::error(&item.kind, e.to_string())
            }
        };
        results.push(result);
    }

    info!(
        items = results.len(),
        succeeded = results.iter().filter(|r| r.status == STATUS_SUCCESS).count(),
        "Batch finished"
    );

    Ok(HttpResponse::Ok().json(BatchResponse { results }))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/daily", web::post().to(daily_report))
            .route("/weekly", web::post().to(weekly_report))
            .route("/monthly", web::post().to(monthly_report))
            .route("/custom", web::post().to(custom_report))
            .route("/batch", web::post().to(batch_reports)),
    );
}
