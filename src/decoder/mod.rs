//! スプレッドシートのデコード
//!
//! CSV / Excel ファイルを列名と行（列名→セル文字列）に変換する。

mod csv;
mod excel;

pub use self::csv::decode_csv;
pub use self::excel::decode_workbook;

use hire_board_common::{DecodedSheet, Error, Result, SheetKind};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// 拡張子で形式を判定してデコード
pub fn decode_file(path: &Path) -> Result<DecodedSheet> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let kind = SheetKind::from_file_name(&file_name)?;
    debug!(path = %path.display(), %kind, "decoding file");

    match kind {
        SheetKind::Csv => {
            let file = File::open(path).map_err(|e| read_failure(path, e))?;
            decode_csv(BufReader::new(file))
        }
        SheetKind::Excel => decode_workbook(path),
    }
}

fn read_failure(path: &Path, err: std::io::Error) -> Error {
    Error::ParseFailure(format!("Could not read {}: {}", path.display(), err))
}

/// ヘッダー行とデータ行から結果を組み立てる
fn build_sheet(kind: SheetKind, columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<DecodedSheet> {
    if rows.is_empty() {
        return Err(Error::EmptyResult);
    }
    let columns = unique_columns(columns);

    let rows = rows
        .into_iter()
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| (column.clone(), cells.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect::<Vec<_>>();

    debug!(%kind, columns = columns.len(), rows = rows.len(), "sheet decoded");
    Ok(DecodedSheet { kind, columns, rows })
}

/// 重複した列名に `_1`, `_2` ... を付けて区別する
fn unique_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(columns.len());
    for column in columns {
        let mut name = column.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{}_{}", column, suffix);
            suffix += 1;
        }
        if name != column {
            debug!(original = %column, renamed = %name, "duplicate column renamed");
        }
        result.push(name);
    }
    result
}
