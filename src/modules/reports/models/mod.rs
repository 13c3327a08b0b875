pub mod document;
pub mod report_request;
pub mod sheet_name;
pub mod thresholds;

pub use document::{
    Cell, CellStyle, CellValue, HorizontalAlign, ReportDocument, Rgb, Row, RowKind, Sheet,
};
pub use report_request::{ReportKind, ReportRequest};
pub use sheet_name::{clean_sheet_name, SheetNamer, MAX_SHEET_NAME_CHARS};
pub use thresholds::QualificationThresholds;
