//! 候補者一覧の絞り込み・並べ替え

use crate::types::{CandidateRecord, Status};
use std::cmp::Ordering;

/// 並べ替えキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    AppliedDate,
    Name,
    Position,
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "applieddate" | "date" => Ok(SortKey::AppliedDate),
            "name" => Ok(SortKey::Name),
            "position" => Ok(SortKey::Position),
            "status" => Ok(SortKey::Status),
            _ => Err(format!("Unknown sort key: {}. Use date, name, position, or status", s)),
        }
    }
}

/// 一覧表示の条件
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub status: Option<Status>,
    /// 名前・メール・職種の部分一致（大文字小文字無視）
    pub search: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            sort: SortKey::AppliedDate,
            descending: true,
        }
    }
}

impl CandidateQuery {
    pub fn matches(&self, candidate: &CandidateRecord) -> bool {
        if let Some(status) = self.status {
            if candidate.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                candidate.name.to_lowercase().contains(&term)
                    || candidate.email.to_lowercase().contains(&term)
                    || candidate.position.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, candidates: &'a [CandidateRecord]) -> Vec<&'a CandidateRecord> {
        let mut result: Vec<&CandidateRecord> =
            candidates.iter().filter(|c| self.matches(c)).collect();
        result.sort_by(|a, b| {
            let ordering = compare(a, b, self.sort);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        result
    }
}

fn compare(a: &CandidateRecord, b: &CandidateRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::AppliedDate => a.applied_date.cmp(&b.applied_date),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Position => a.position.to_lowercase().cmp(&b.position.to_lowercase()),
        SortKey::Status => a.status.key().cmp(b.status.key()),
    }
}
