//! 候補者データの型定義
//!
//! CLIと永続化で共有される型:
//! - CandidateRecord: 保存される候補者1件
//! - RawRow / DecodedSheet: スプレッドシートのデコード結果（型なし）
//! - SheetKind: 入力ファイルの種類

use crate::error::{Error, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 電話番号が無い場合の表示値
pub const PHONE_NOT_PROVIDED: &str = "Not provided";
/// 経験が無い場合の表示値
pub const EXPERIENCE_NOT_SPECIFIED: &str = "Not specified";
/// 手動登録時の応募経路
pub const SOURCE_MANUAL_ENTRY: &str = "Manual Entry";
/// ファイル取り込み時の応募経路
pub const SOURCE_FILE_IMPORT: &str = "File Import";
/// 必須項目が取得できなかった場合のプレースホルダー
pub const NOT_AVAILABLE: &str = "N/A";

/// 候補者ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CandidateId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(CandidateId)
    }
}

/// ID採番器
///
/// ミリ秒タイムスタンプ×1000を基準に単調増加させる。
/// 同一ミリ秒内の一括取り込みでも衝突しない。
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存IDより後ろから採番する
    pub fn after(id: CandidateId) -> Self {
        Self { last: id.0 }
    }

    /// 上限に達した場合は現在時刻から採番し直す（呼び出し側で衝突を確認すること）
    pub fn next_id(&mut self) -> CandidateId {
        let stamp = (Utc::now().timestamp_millis().max(0) as u64).saturating_mul(1000);
        self.last = match self.last.checked_add(1) {
            Some(next) => stamp.max(next),
            None => stamp,
        };
        CandidateId(self.last)
    }
}

/// 選考ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Applied,
    Reviewing,
    Interview,
    Rejected,
    Hired,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Applied,
        Status::Reviewing,
        Status::Interview,
        Status::Rejected,
        Status::Hired,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Status::Applied => "applied",
            Status::Reviewing => "reviewing",
            Status::Interview => "interview",
            Status::Rejected => "rejected",
            Status::Hired => "hired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::Reviewing => "Reviewing",
            Status::Interview => "Interview",
            Status::Rejected => "Rejected",
            Status::Hired => "Hired",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Status::ALL
            .into_iter()
            .find(|status| status.key() == lowered)
            .ok_or_else(|| {
                format!(
                    "Unknown status: {}. Use applied, reviewing, interview, rejected, or hired",
                    s
                )
            })
    }
}

/// 候補者1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub position: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default = "default_experience")]
    pub experience: String,
    #[serde(default)]
    pub status: Status,
    pub applied_date: NaiveDate,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_phone() -> String {
    PHONE_NOT_PROVIDED.to_string()
}

fn default_experience() -> String {
    EXPERIENCE_NOT_SPECIFIED.to_string()
}

fn default_source() -> String {
    SOURCE_MANUAL_ENTRY.to_string()
}

impl CandidateRecord {
    /// 重複判定用のキー（小文字化したメール）
    pub fn email_key(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// デコード直後の1行（列名 → セル文字列）
pub type RawRow = HashMap<String, String>;

/// 入力ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Csv,
    #[default]
    Excel,
}

impl SheetKind {
    /// ファイル名の拡張子から種類を判定
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let lowered = file_name.to_lowercase();
        if lowered.ends_with(".csv") {
            Ok(SheetKind::Csv)
        } else if lowered.ends_with(".xlsx") || lowered.ends_with(".xls") {
            Ok(SheetKind::Excel)
        } else {
            Err(Error::UnsupportedFormat(file_name.to_string()))
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SheetKind::Csv => "csv",
            SheetKind::Excel => "xlsx",
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetKind::Csv => write!(f, "csv"),
            SheetKind::Excel => write!(f, "excel"),
        }
    }
}

impl std::str::FromStr for SheetKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(SheetKind::Csv),
            "excel" | "xlsx" | "xls" => Ok(SheetKind::Excel),
            _ => Err(format!("Unknown format: {}. Use csv or xlsx", s)),
        }
    }
}

/// デコード結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSheet {
    pub kind: SheetKind,
    /// ヘッダー行の列名（出現順）
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl DecodedSheet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
