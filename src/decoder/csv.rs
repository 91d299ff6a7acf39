use super::build_sheet;
use hire_board_common::{DecodedSheet, Error, Result, SheetKind};
use std::io::Read;
use tracing::debug;

const PARSE_ERROR: &str = "parsing error";

/// 先頭行をヘッダーとしてCSVを読む
///
/// 空行は読み飛ばす。列数の合わない行が1つでもあれば全体を失敗にする。
pub fn decode_csv<R: Read>(reader: R) -> Result<DecodedSheet> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_failure)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_failure)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    build_sheet(SheetKind::Csv, columns, rows)
}

fn parse_failure(err: ::csv::Error) -> Error {
    debug!(%err, "csv row rejected");
    Error::ParseFailure(PARSE_ERROR.to_string())
}
