pub mod calculator;
pub mod layout;
pub mod report_service;
pub mod xlsx_sink;

pub use calculator::{MetricDelta, MetricValue, PeriodMetrics};
pub use layout::{LayoutEngine, ReportShape};
pub use report_service::{GeneratedReport, ReportService};
pub use xlsx_sink::{ReportSink, XlsxSink};
