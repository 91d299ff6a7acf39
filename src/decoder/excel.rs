use super::build_sheet;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use hire_board_common::{DecodedSheet, Error, Result, SheetKind};
use std::path::Path;
use tracing::debug;

const PROCESS_ERROR: &str = "Error occurred while processing Excel file.";

/// 最初のシートを読む
///
/// 1行目がヘッダー。空行は除外し、残りが2行未満なら InsufficientData。
pub fn decode_workbook(path: &Path) -> Result<DecodedSheet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        debug!(path = %path.display(), %e, "workbook open failed");
        Error::ParseFailure(PROCESS_ERROR.to_string())
    })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            debug!(%e, "first sheet unreadable");
            return Err(Error::ParseFailure(PROCESS_ERROR.to_string()));
        }
        None => return Err(Error::InsufficientData),
    };

    let mut lines: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .collect();
    debug!(rows = lines.len(), "worksheet rows read");

    if lines.len() < 2 {
        return Err(Error::InsufficientData);
    }

    let columns = lines.remove(0);
    build_sheet(SheetKind::Excel, columns, lines)
}

/// セルを文字列化（日付は YYYY-MM-DD、整数値の小数は小数点なし）
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => cell.to_string(),
        },
        Data::DurationIso(s) => s.clone(),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
