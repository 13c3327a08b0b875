use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Formula, Workbook};
use tracing::debug;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{
    CellStyle, CellValue, HorizontalAlign, ReportDocument, Sheet,
};

/// Persists a finished document under a path
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Write `document` to `path` as one whole file. On error nothing is
    /// left at `path`.
    async fn persist(&self, document: ReportDocument, path: &Path) -> Result<()>;
}

/// Writes `.xlsx` workbooks with rust_xlsxwriter
#[derive(Debug, Clone, Default)]
pub struct XlsxSink;

impl XlsxSink {
    pub fn new() -> Self {
        Self
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new().set_align(FormatAlign::VerticalCenter);

    format = match style.align {
        HorizontalAlign::Left => format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format.set_align(FormatAlign::Right),
    };
    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill));
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(num_format) = style.num_format {
        format = format.set_num_format(num_format);
    }

    format
}

fn write_sheet(workbook: &mut Workbook, sheet: &Sheet) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    for (column, width) in sheet.column_widths.iter().enumerate() {
        worksheet.set_column_width(column as u16, *width)?;
    }

    for (row_index, row) in sheet.rows.iter().enumerate() {
        let row_number = row_index as u32;
        for (column, cell) in row.cells.iter().enumerate() {
            let column = column as u16;
            let format = to_format(&cell.style);
            match &cell.value {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(row_number, column, text, &format)?;
                }
                CellValue::Integer(value) => {
                    worksheet.write_number_with_format(row_number, column, *value as f64, &format)?;
                }
                CellValue::Number(value) | CellValue::Percent(value) => {
                    worksheet.write_number_with_format(row_number, column, *value, &format)?;
                }
                CellValue::Formula { expression, cached } => {
                    let formula = Formula::new(expression).set_result(cached.to_string());
                    worksheet.write_formula_with_format(row_number, column, formula, &format)?;
                }
            }
        }
    }

    Ok(())
}

/// Serialize a document into workbook bytes
pub fn render_workbook(document: &ReportDocument) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    for sheet in &document.sheets {
        write_sheet(&mut workbook, sheet)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// Write to a hidden sibling, then rename over the target
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::internal(format!("Invalid report path: {}", path.display())))?;

    let temp_path: PathBuf =
        path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    if let Err(e) = fs::write(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

#[async_trait]
impl ReportSink for XlsxSink {
    async fn persist(&self, document: ReportDocument, path: &Path) -> Result<()> {
        let path = path.to_path_buf();

        let written = tokio::task::spawn_blocking(move || -> Result<usize> {
            let bytes = render_workbook(&document)?;
            write_atomically(&path, &bytes)?;
            Ok(bytes.len())
        })
        .await
        .map_err(|e| AppError::internal(format!("Report writer task failed: {}", e)))??;

        debug!(bytes = written, "Workbook written");
        Ok(())
    }
}
