//! 行正規化モジュール
//!
//! マッピング済みの1行（型なし）を CandidateRecord に変換する。
//! 欠損・解析不能な値はすべて既定値で埋め、失敗しない。

use crate::mapping::{CandidateField, ImportMapping};
use crate::types::{
    CandidateRecord, IdGenerator, RawRow, Status, EXPERIENCE_NOT_SPECIFIED, NOT_AVAILABLE,
    PHONE_NOT_PROVIDED, SOURCE_FILE_IMPORT,
};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;

/// 応募日として受け付ける書式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y.%m.%d"];

/// 行正規化器
///
/// 「今日」とID採番器を保持する。テストでは日付を固定できる。
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    today: NaiveDate,
    ids: IdGenerator,
    default_source: String,
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl RowNormalizer {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            ids: IdGenerator::new(),
            default_source: SOURCE_FILE_IMPORT.to_string(),
        }
    }

    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// 1行を正規化
    pub fn normalize(&mut self, row: &RawRow, mapping: &ImportMapping) -> CandidateRecord {
        let mut values: HashMap<CandidateField, String> = HashMap::new();
        for (column, field) in mapping.mapped() {
            if let Some(cell) = row.get(column) {
                let cell = cell.trim();
                if !cell.is_empty() {
                    values.insert(field, cell.to_string());
                }
            }
        }

        let mut take = |field: CandidateField| values.remove(&field);

        CandidateRecord {
            id: self.ids.next_id(),
            name: take(CandidateField::Name).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: take(CandidateField::Email).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            position: take(CandidateField::Position).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: take(CandidateField::Phone).unwrap_or_else(|| PHONE_NOT_PROVIDED.to_string()),
            experience: take(CandidateField::Experience)
                .unwrap_or_else(|| EXPERIENCE_NOT_SPECIFIED.to_string()),
            status: take(CandidateField::Status)
                .and_then(|s| s.parse::<Status>().ok())
                .unwrap_or_default(),
            applied_date: take(CandidateField::AppliedDate)
                .and_then(|s| parse_date(&s))
                .unwrap_or(self.today),
            source: take(CandidateField::Source).unwrap_or_else(|| self.default_source.clone()),
        }
    }

    /// 全行を正規化
    pub fn normalize_all(&mut self, rows: &[RawRow], mapping: &ImportMapping) -> Vec<CandidateRecord> {
        rows.iter().map(|row| self.normalize(row, mapping)).collect()
    }
}

/// 日付文字列を解析（時刻部分は無視）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // "2025-01-15T09:00:00" / "2025-01-15 09:00" の日付部分
    let date_part = value
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(value);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}
