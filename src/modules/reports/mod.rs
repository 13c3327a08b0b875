pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{QualificationThresholds, ReportDocument, ReportKind, ReportRequest};
pub use services::{GeneratedReport, ReportService, ReportSink, XlsxSink};
