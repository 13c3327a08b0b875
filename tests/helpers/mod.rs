// Shared fixtures for integration and contract tests.
//
// The repositories here keep aggregates in memory, keyed by the exact date
// range the report service asks for, so tests run without a MySQL server.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;

use shop_report::config::ReportConfig;
use shop_report::core::{AppError, DateRange, Result, ShopId};
use shop_report::metrics::{MetricsRepository, PeriodAggregate};
use shop_report::reports::{QualificationThresholds, ReportService, XlsxSink};
use shop_report::stores::{AccountRecord, AccountRepository};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

/// Aggregate with a name and the given organic traffic counters
pub fn aggregate(shop_id: ShopId, name: &str) -> PeriodAggregate {
    PeriodAggregate {
        shop_id,
        shop_name: name.to_string(),
        ..PeriodAggregate::default()
    }
}

pub fn account(name: &str, operator: &str, stores_json: &str) -> AccountRecord {
    AccountRecord {
        account: name.to_string(),
        operator_name: Some(operator.to_string()),
        sales_name: Some(format!("{}-sales", name)),
        city_name: Some("杭州".to_string()),
        stores_json: Some(stores_json.to_string()),
        region_json: None,
    }
}

/// Metrics keyed by the requested range; unknown ranges return no rows
#[derive(Default)]
pub struct InMemoryMetricsRepository {
    periods: Mutex<HashMap<DateRange, Vec<PeriodAggregate>>>,
    calls: Mutex<Vec<(DateRange, Option<Vec<ShopId>>)>>,
    fail_with: Mutex<Option<String>>,
}

impl InMemoryMetricsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, range: DateRange, rows: Vec<PeriodAggregate>) {
        self.periods.lock().unwrap().insert(range, rows);
    }

    /// Every subsequent call fails with a database-style error
    pub fn fail(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<(DateRange, Option<Vec<ShopId>>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsRepository for InMemoryMetricsRepository {
    async fn fetch_period_aggregates(
        &self,
        range: DateRange,
        shop_filter: Option<&[ShopId]>,
    ) -> Result<BTreeMap<ShopId, PeriodAggregate>> {
        self.calls
            .lock()
            .unwrap()
            .push((range, shop_filter.map(|ids| ids.to_vec())));

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(AppError::internal(message));
        }

        let filter = shop_filter.filter(|ids| !ids.is_empty());
        Ok(self
            .periods
            .lock()
            .unwrap()
            .get(&range)
            .into_iter()
            .flatten()
            .filter(|row| filter.map_or(true, |ids| ids.contains(&row.shop_id)))
            .map(|row| (row.shop_id, row.clone()))
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Vec<AccountRecord>,
}

impl InMemoryAccountRepository {
    pub fn new(accounts: Vec<AccountRecord>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn fetch_accounts(&self, account_filter: Option<&[String]>) -> Result<Vec<AccountRecord>> {
        let filter = account_filter.filter(|names| !names.is_empty());
        Ok(self
            .accounts
            .iter()
            .filter(|a| filter.map_or(true, |names| names.contains(&a.account)))
            .cloned()
            .collect())
    }
}

/// A report service over in-memory repositories writing into a temp directory
pub struct TestReportService {
    pub service: Arc<ReportService>,
    pub metrics: Arc<InMemoryMetricsRepository>,
    pub output: TempDir,
}

pub fn report_service(metrics: InMemoryMetricsRepository, accounts: Vec<AccountRecord>) -> TestReportService {
    let output = tempfile::tempdir().unwrap();
    let metrics = Arc::new(metrics);
    let config = ReportConfig {
        output_dir: output.path().to_path_buf(),
        thresholds: QualificationThresholds::default(),
    };

    let service = Arc::new(ReportService::new(
        metrics.clone(),
        Arc::new(InMemoryAccountRepository::new(accounts)),
        Arc::new(XlsxSink::new()),
        &config,
    ));

    TestReportService {
        service,
        metrics,
        output,
    }
}

/// Files currently in the output directory
pub fn written_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
