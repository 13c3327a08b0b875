use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ReportConfig;
use crate::core::{dates, AppError, DateRange, Result, ShopId};
use crate::modules::metrics::{MetricsRepository, PeriodAggregate};
use crate::modules::reports::models::{ReportDocument, ReportKind, ReportRequest};
use crate::modules::reports::services::layout::{
    ComparisonInput, ComparisonShape, LayoutEngine, LayoutFamily, ReportShape, SinglePeriodInput,
    TRAILING_DAYS,
};
use crate::modules::reports::services::xlsx_sink::ReportSink;
use crate::modules::stores::{AccountRepository, MetadataResolver};

const XLSX_EXTENSION: &str = "xlsx";

/// A workbook written to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub path: PathBuf,
    pub file_name: String,
    pub store_count: usize,
    pub sheet_count: usize,
}

/// A rendered document and the number of stores in it
struct Assembled {
    document: ReportDocument,
    store_count: usize,
}

/// Dispatches report requests: fetch, resolve metadata, lay out, persist
pub struct ReportService {
    metrics_repo: Arc<dyn MetricsRepository>,
    metadata: MetadataResolver,
    layout: LayoutEngine,
    sink: Arc<dyn ReportSink>,
    output_dir: PathBuf,
}

impl ReportService {
    pub fn new(
        metrics_repo: Arc<dyn MetricsRepository>,
        account_repo: Arc<dyn AccountRepository>,
        sink: Arc<dyn ReportSink>,
        config: &ReportConfig,
    ) -> Self {
        Self {
            metrics_repo,
            metadata: MetadataResolver::new(account_repo),
            layout: LayoutEngine::new(config.thresholds),
            sink,
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the document for `request` without writing anything.
    ///
    /// Returns `Ok(None)` when the requested scope has no data.
    pub async fn build_document(&self, request: &ReportRequest) -> Result<Option<ReportDocument>> {
        Ok(self.assemble(request).await?.map(|assembled| assembled.document))
    }

    /// Generate and persist the report for `request`.
    ///
    /// # Arguments
    /// * `request` - validated report request
    /// * `output_name` - optional file name; only its last path component is used
    ///
    /// # Returns
    /// The written report, or `None` when the requested scope has no data
    ///
    /// # Errors
    /// Database failures, spreadsheet rendering failures and file write failures
    pub async fn generate(
        &self,
        request: &ReportRequest,
        output_name: Option<&str>,
    ) -> Result<Option<GeneratedReport>> {
        let kind = request.kind();
        info!(kind = %kind, request = ?request, "Generating report");

        let Some(Assembled {
            document,
            store_count,
        }) = self.assemble(request).await?
        else {
            warn!(kind = %kind, "No data for report request");
            return Ok(None);
        };

        let file_name = match output_name {
            Some(name) => sanitize_output_name(name)?,
            None => default_file_name(request, store_count),
        };
        let path = self.output_dir.join(&file_name);
        let sheet_count = document.sheet_count();

        self.sink.persist(document, &path).await?;

        info!(
            kind = %kind,
            path = %path.display(),
            store_count,
            sheet_count,
            "Report generated"
        );

        Ok(Some(GeneratedReport {
            kind,
            path,
            file_name,
            store_count,
            sheet_count,
        }))
    }

    async fn assemble(&self, request: &ReportRequest) -> Result<Option<Assembled>> {
        let kind = request.kind();
        let shape = ReportShape::for_kind(kind);
        let title = shape.summary_title(kind);

        match (shape.family, request) {
            (LayoutFamily::SinglePeriod, ReportRequest::Daily { date }) => {
                self.assemble_daily(*date, title).await
            }
            (LayoutFamily::Comparison(layout), _) => {
                let (first, second) = request.periods().ok_or_else(|| {
                    AppError::internal(format!("{} report has no periods to compare", kind))
                })?;
                self.assemble_comparison(layout, title, first, second, request.shop_filter())
                    .await
            }
            (LayoutFamily::SinglePeriod, _) => Err(AppError::internal(format!(
                "{} report has no single report date",
                kind
            ))),
        }
    }

    async fn fetch(
        &self,
        range: DateRange,
        shop_filter: Option<&[ShopId]>,
    ) -> Result<BTreeMap<ShopId, PeriodAggregate>> {
        let aggregates = self
            .metrics_repo
            .fetch_period_aggregates(range, shop_filter)
            .await?;
        debug!(range = %range, stores = aggregates.len(), "Fetched period aggregates");
        Ok(aggregates)
    }

    async fn assemble_daily(
        &self,
        date: chrono::NaiveDate,
        title: &str,
    ) -> Result<Option<Assembled>> {
        let day = self.fetch(DateRange::single_day(date), None).await?;
        if day.is_empty() {
            return Ok(None);
        }

        let shop_ids: Vec<ShopId> = day.keys().copied().collect();
        let trailing = self
            .fetch(DateRange::trailing(date, TRAILING_DAYS), Some(&shop_ids))
            .await?;
        let directory = self.metadata.load_directory(None).await?;

        let input = SinglePeriodInput {
            date,
            day: &day,
            trailing: &trailing,
            directory: &directory,
        };

        Ok(self.layout.single_period(title, &input).map(|document| Assembled {
            document,
            store_count: day.len(),
        }))
    }

    async fn assemble_comparison(
        &self,
        layout: &ComparisonShape,
        title: &str,
        first: DateRange,
        second: DateRange,
        shop_filter: Option<&[ShopId]>,
    ) -> Result<Option<Assembled>> {
        let first_data = self.fetch(first, shop_filter).await?;
        let second_data = self.fetch(second, shop_filter).await?;
        if first_data.is_empty() && second_data.is_empty() {
            return Ok(None);
        }

        let directory = self.metadata.load_directory(None).await?;
        let input = ComparisonInput {
            first,
            second,
            first_data: &first_data,
            second_data: &second_data,
            directory: &directory,
        };

        let store_count = first_data
            .keys()
            .chain(second_data.keys().filter(|id| !first_data.contains_key(id)))
            .count();

        Ok(self
            .layout
            .comparison(layout, title, &input)
            .map(|document| Assembled {
                document,
                store_count,
            }))
    }
}

/// Generation timestamp plus a random suffix, unique per call
fn unique_stamp() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}", Local::now().format("%Y%m%d%H%M%S"), &random[..8])
}

/// File name derived from the report kind and its (second) period
pub fn default_file_name(request: &ReportRequest, store_count: usize) -> String {
    let stamp = unique_stamp();
    let span = |range: &DateRange| {
        format!("{}~{}", dates::compact(range.start), dates::compact(range.end))
    };

    match request {
        ReportRequest::Daily { date } => {
            format!("日报 非餐 {} {}.{}", dates::compact(*date), stamp, XLSX_EXTENSION)
        }
        ReportRequest::Weekly { second, .. } => {
            format!("周报 非餐 {} {}.{}", span(second), stamp, XLSX_EXTENSION)
        }
        ReportRequest::Monthly { second, .. } => {
            format!("月报 非餐 {} {}.{}", span(second), stamp, XLSX_EXTENSION)
        }
        ReportRequest::Custom { second, .. } => format!(
            "自定义 {}家门店非餐 {} {}.{}",
            store_count,
            span(second),
            stamp,
            XLSX_EXTENSION
        ),
    }
}

/// Reduce a caller-supplied name to a bare `.xlsx` file name
pub fn sanitize_output_name(name: &str) -> Result<String> {
    let file_name = Path::new(name.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with('.'))
        .ok_or_else(|| AppError::validation(format!("Invalid output file name: '{}'", name)))?;

    let has_extension = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XLSX_EXTENSION));

    Ok(if has_extension {
        file_name.to_string()
    } else {
        format!("{}.{}", file_name, XLSX_EXTENSION)
    })
}
