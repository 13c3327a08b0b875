use crate::modules::reports::models::{CellStyle, HorizontalAlign, Rgb, RowKind, Sheet};

pub const HEADER_FILL: Rgb = 0xD3D3D3;
pub const DELTA_FILL: Rgb = 0xF0F0F0;
pub const ALERT_RED: Rgb = 0xFF0000;
pub const OK_GREEN: Rgb = 0x00B050;

const HEADER_FONT_SIZE: f64 = 10.0;

fn header(style: &mut CellStyle) {
    style.bold = true;
    style.font_size = Some(HEADER_FONT_SIZE);
    style.fill = Some(HEADER_FILL);
}

/// Red bold when `alert`, green bold otherwise
pub fn flag(alert: bool) -> CellStyle {
    CellStyle::default()
        .bold()
        .font_color(if alert { ALERT_RED } else { OK_GREEN })
}

/// Grid sheets: every populated cell bordered and centered, gray headers,
/// lighter gray delta rows.
pub fn apply_grid(sheet: &mut Sheet) {
    sheet.style_cells(|kind, _, style| {
        style.border = true;
        style.align = HorizontalAlign::Center;
        match kind {
            RowKind::Header | RowKind::Section => header(style),
            RowKind::Delta => style.fill = Some(DELTA_FILL),
            RowKind::Data | RowKind::Blank => {}
        }
    });
}

/// Key/value sheets: the two text columns left, the value column right,
/// criterion and result centered.
pub fn apply_key_value(sheet: &mut Sheet) {
    sheet.style_cells(|kind, column, style| {
        style.border = true;
        if matches!(kind, RowKind::Header | RowKind::Section) {
            header(style);
            style.align = HorizontalAlign::Center;
            return;
        }
        style.align = match column {
            0 | 1 => HorizontalAlign::Left,
            2 => HorizontalAlign::Right,
            _ => HorizontalAlign::Center,
        };
    });
}
