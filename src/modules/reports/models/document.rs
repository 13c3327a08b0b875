//! In-memory workbook: sheets of styled rows, independent of the file format.
//!
//! The layout engine fills a [`ReportDocument`]; a sink serializes it.

use serde::Serialize;

use super::sheet_name::SheetNamer;

/// ARGB-less RGB color, e.g. `0xD3D3D3`
pub type Rgb = u32;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    /// Stored as a fraction (`0.5` shows as `50.0%` with a percent format)
    Percent(f64),
    /// Live formula with the value it evaluates to
    Formula { expression: String, cached: f64 },
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric reading of the cell, formulas through their cached value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Number(value) | CellValue::Percent(value) => Some(*value),
            CellValue::Formula { cached, .. } => Some(*cached),
            CellValue::Empty | CellValue::Text(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: Option<f64>,
    pub font_color: Option<Rgb>,
    pub fill: Option<Rgb>,
    pub border: bool,
    pub align: HorizontalAlign,
    pub num_format: Option<&'static str>,
}

impl CellStyle {
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn font_color(mut self, color: Rgb) -> Self {
        self.font_color = Some(color);
        self
    }

    pub fn num_format(mut self, format: &'static str) -> Self {
        self.num_format = Some(format);
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: CellStyle::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(CellValue::Empty)
    }

    pub fn styled(value: impl Into<CellValue>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell::new(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::new(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::new(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::new(value)
    }
}

/// Row roles; styling passes key off these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Header,
    Section,
    Data,
    Delta,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(kind: RowKind, cells: Vec<Cell>) -> Self {
        Self { kind, cells }
    }

    pub fn blank() -> Self {
        Self::new(RowKind::Blank, Vec::new())
    }

    pub fn value(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column).map(|cell| &cell.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    /// Character widths by column index
    pub column_widths: Vec<f64>,
    pub rows: Vec<Row>,
}

impl Sheet {
    fn new(name: String) -> Self {
        Self {
            name,
            column_widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row, returning its 1-based spreadsheet row number
    pub fn push(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len()
    }

    pub fn push_cells(&mut self, kind: RowKind, cells: Vec<Cell>) -> usize {
        self.push(Row::new(kind, cells))
    }

    /// 1-based row number the next push will land on
    pub fn next_row_number(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn set_widths(&mut self, widths: &[f64]) {
        self.column_widths = widths.to_vec();
    }

    /// Cell at 0-based coordinates
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    /// Apply `f` to every non-empty cell
    pub fn style_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(RowKind, usize, &mut CellStyle),
    {
        for row in &mut self.rows {
            let kind = row.kind;
            for (column, cell) in row.cells.iter_mut().enumerate() {
                if !cell.value.is_empty() {
                    f(kind, column, &mut cell.style);
                }
            }
        }
    }
}

/// An ordered set of uniquely named sheets
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportDocument {
    pub sheets: Vec<Sheet>,
    #[serde(skip)]
    namer: SheetNamer,
}

impl ReportDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet under a cleaned, deduplicated version of `requested`
    pub fn add_sheet(&mut self, requested: &str) -> &mut Sheet {
        let name = self.namer.claim(requested);
        self.sheets.push(Sheet::new(name));
        let last = self.sheets.len() - 1;
        &mut self.sheets[last]
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}
