//! 重複チェックモジュール
//!
//! 取り込み前に、既存候補者とメールアドレスが重複する行を抽出する。
//! 重複は黙って捨てず、呼び出し側に確認させる。

use crate::types::{CandidateRecord, NOT_AVAILABLE};
use std::collections::HashSet;

/// 既存メールアドレス（小文字化済み）の集合
#[derive(Debug, Clone, Default)]
pub struct DuplicateGuard {
    existing: HashSet<String>,
}

/// 重複チェック結果
///
/// バッチの順序を保ったまま、重複した位置を記録する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardReport {
    records: Vec<CandidateRecord>,
    duplicate_positions: Vec<usize>,
}

impl GuardReport {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_positions.is_empty()
    }

    /// 既存と重複しないレコード
    pub fn fresh(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.duplicate_positions.contains(i))
            .map(|(_, r)| r)
    }

    /// 既存とメールが重複するレコード
    pub fn duplicates(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.duplicate_positions.iter().map(|&i| &self.records[i])
    }

    /// 重複したメールアドレス（元の表記のまま）
    pub fn duplicate_emails(&self) -> Vec<String> {
        self.duplicates().map(|r| r.email.clone()).collect()
    }

    /// 確認後に取り込む全レコード（バッチの順序どおり）
    pub fn into_records(self) -> Vec<CandidateRecord> {
        self.records
    }
}

impl DuplicateGuard {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let existing = emails
            .into_iter()
            .filter_map(|email| email_key(email.as_ref()))
            .collect();
        Self { existing }
    }

    pub fn contains(&self, email: &str) -> bool {
        email_key(email).is_some_and(|key| self.existing.contains(&key))
    }

    /// バッチを新規/重複に分割
    pub fn partition(&self, batch: Vec<CandidateRecord>) -> GuardReport {
        let duplicate_positions = batch
            .iter()
            .enumerate()
            .filter(|(_, record)| self.contains(&record.email))
            .map(|(i, _)| i)
            .collect();
        GuardReport {
            records: batch,
            duplicate_positions,
        }
    }
}

/// 重複判定キー（空欄・プレースホルダーは対象外）
fn email_key(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateId, Status};
    use chrono::NaiveDate;

    fn record(id: u64, email: &str) -> CandidateRecord {
        CandidateRecord {
            id: CandidateId(id),
            name: format!("Candidate {}", id),
            email: email.to_string(),
            position: "Engineer".to_string(),
            phone: "Not provided".to_string(),
            experience: "Not specified".to_string(),
            status: Status::Applied,
            applied_date: NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
            source: "File Import".to_string(),
        }
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let guard = DuplicateGuard::new(["alice@x.com"]);
        let report = guard.partition(vec![record(1, "Alice@X.com"), record(2, "bob@x.com")]);

        assert!(report.has_duplicates());
        assert_eq!(report.duplicate_emails(), vec!["Alice@X.com".to_string()]);
        let fresh: Vec<_> = report.fresh().collect();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].email, "bob@x.com");
    }

    #[test]
    fn test_no_duplicates() {
        let guard = DuplicateGuard::new(Vec::<String>::new());
        let report = guard.partition(vec![record(1, "a@x.com"), record(2, "b@x.com")]);
        assert!(!report.has_duplicates());
        assert_eq!(report.fresh().count(), 2);
    }

    #[test]
    fn test_placeholder_emails_never_collide() {
        let guard = DuplicateGuard::new(["N/A", ""]);
        let report = guard.partition(vec![record(1, "N/A"), record(2, "")]);
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_existing_emails_are_trimmed() {
        let guard = DuplicateGuard::new(["  Carol@Y.com "]);
        assert!(guard.contains("carol@y.com"));
    }

    #[test]
    fn test_into_records_keeps_batch_order() {
        let guard = DuplicateGuard::new(["b@x.com"]);
        let report = guard.partition(vec![record(1, "a@x.com"), record(2, "B@x.com"), record(3, "c@x.com")]);
        let ids: Vec<u64> = report.into_records().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
