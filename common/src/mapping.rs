//! 列マッピングモジュール
//!
//! アップロードされたファイルの列名を候補者フィールドへ対応付ける。
//! 同義語テーブルとの部分一致（大文字小文字無視・双方向）で自動推定し、
//! 手動での上書きも受け付ける。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 候補者フィールド
///
/// 並び順がそのまま自動マッピングの優先順位になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateField {
    Name,
    Email,
    Phone,
    Position,
    Experience,
    Status,
    AppliedDate,
    Source,
}

impl CandidateField {
    /// 優先順位順の全フィールド
    pub const ALL: [CandidateField; 8] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::Position,
        CandidateField::Experience,
        CandidateField::Status,
        CandidateField::AppliedDate,
        CandidateField::Source,
    ];

    /// 取り込み前に必ずマッピングが必要なフィールド
    pub const REQUIRED: [CandidateField; 3] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Position,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CandidateField::Name => "name",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::Position => "position",
            CandidateField::Experience => "experience",
            CandidateField::Status => "status",
            CandidateField::AppliedDate => "appliedDate",
            CandidateField::Source => "source",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CandidateField::Name => "Name",
            CandidateField::Email => "Email",
            CandidateField::Phone => "Phone",
            CandidateField::Position => "Position",
            CandidateField::Experience => "Experience",
            CandidateField::Status => "Status",
            CandidateField::AppliedDate => "Applied Date",
            CandidateField::Source => "Source",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// 同義語テーブル
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            CandidateField::Name => &["Name", "Full Name", "Candidate Name", "First Name", "Last Name", "이름"],
            CandidateField::Email => &["Email", "Email Address", "E-mail", "이메일"],
            CandidateField::Phone => &["Phone", "Phone Number", "Mobile", "Contact", "전화번호"],
            CandidateField::Position => &["Position", "Job Title", "Role", "Title", "직책"],
            CandidateField::Experience => &["Experience", "Years", "Level", "Seniority", "경력"],
            CandidateField::Status => &["Status", "Stage", "Phase", "상태"],
            CandidateField::AppliedDate => &["Applied Date", "Application Date", "Date Applied", "신청일"],
            CandidateField::Source => &["Source", "Origin", "Channel", "출처"],
        }
    }

    /// 列名が同義語のいずれかと部分一致するか
    pub fn matches_column(&self, column: &str) -> bool {
        let column = column.trim().to_lowercase();
        if column.is_empty() {
            return false;
        }
        self.synonyms().iter().any(|option| {
            let option = option.to_lowercase();
            column.contains(&option) || option.contains(&column)
        })
    }

    /// 列名から最初に一致するフィールドを推定
    pub fn guess(column: &str) -> Option<CandidateField> {
        Self::ALL.into_iter().find(|field| field.matches_column(column))
    }
}

impl std::fmt::Display for CandidateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for CandidateField {
    type Err = String;

    /// キー（appliedDate）・表示名（Applied Date）どちらも受け付ける
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|field| field.key().to_lowercase() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown field: {}. Use name, email, phone, position, experience, status, appliedDate, or source",
                    s
                )
            })
    }
}

/// 取り込みセッション中の列マッピング
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMapping {
    /// (列名, 対応フィールド) を列の出現順で保持
    entries: Vec<(String, Option<CandidateField>)>,
}

impl ImportMapping {
    /// 全列を未マッピングで作成
    pub fn unmapped(columns: &[String]) -> Self {
        Self {
            entries: columns.iter().map(|c| (c.clone(), None)).collect(),
        }
    }

    /// 同義語テーブルから自動推定
    ///
    /// 1列に割り当てるフィールドは最大1つ。
    /// 先に出現した列が既にそのフィールドを取っていれば未マッピングのままにする。
    pub fn auto(columns: &[String]) -> Self {
        let mut mapping = Self::unmapped(columns);
        for index in 0..mapping.entries.len() {
            let Some(field) = CandidateField::guess(&mapping.entries[index].0) else {
                continue;
            };
            if mapping.column_for(field).is_some() {
                debug!(column = %mapping.entries[index].0, %field, "field already claimed, leaving column unmapped");
                continue;
            }
            mapping.entries[index].1 = Some(field);
        }
        debug!(mapped = mapping.mapped_count(), columns = columns.len(), "auto mapping computed");
        mapping
    }

    /// 1列のマッピングを設定/解除
    ///
    /// 他の列が同じフィールドを持っていた場合はそちらを解除する（後勝ち）。
    /// 存在しない列名なら false を返す。
    pub fn set(&mut self, column: &str, field: Option<CandidateField>) -> bool {
        if !self.entries.iter().any(|(c, _)| c == column) {
            return false;
        }
        for (c, current) in self.entries.iter_mut() {
            if c == column {
                *current = field;
            } else if field.is_some() && *current == field {
                *current = None;
            }
        }
        true
    }

    pub fn field_for(&self, column: &str) -> Option<CandidateField> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, field)| *field)
    }

    pub fn column_for(&self, field: CandidateField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, f)| *f == Some(field))
            .map(|(c, _)| c.as_str())
    }

    /// (列名, フィールド) の組を出現順に返す
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<CandidateField>)> {
        self.entries.iter().map(|(c, f)| (c.as_str(), *f))
    }

    /// マッピング済みの組のみ
    pub fn mapped(&self) -> impl Iterator<Item = (&str, CandidateField)> {
        self.entries
            .iter()
            .filter_map(|(c, f)| f.map(|field| (c.as_str(), field)))
    }

    pub fn mapped_count(&self) -> usize {
        self.mapped().count()
    }

    /// 未マッピングの必須フィールド
    pub fn missing_required(&self) -> Vec<CandidateField> {
        CandidateField::REQUIRED
            .into_iter()
            .filter(|field| self.column_for(*field).is_none())
            .collect()
    }

    /// 必須フィールドがすべてマッピング済みか検証
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingRequiredMapping(missing))
        }
    }
}
