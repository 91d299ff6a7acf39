//! 手動登録の入力検証

use crate::error::{HireBoardError, Result};
use chrono::NaiveDate;
use hire_board_common::{
    CandidateId, CandidateRecord, Status, EXPERIENCE_NOT_SPECIFIED, PHONE_NOT_PROVIDED,
    SOURCE_MANUAL_ENTRY,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[+]?[1-9][\d]{0,15}$").unwrap();
    static ref PHONE_NOISE_RE: Regex = Regex::new(r"[\s\-()]").unwrap();
}

/// 手動登録フォームの入力
#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    pub position: String,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub source: Option<String>,
    pub status: Option<Status>,
}

impl NewCandidate {
    /// 全項目を検証し、エラーをまとめて返す
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name is required".to_string());
        } else if name.chars().count() < 2 {
            errors.push("Name must be at least 2 characters".to_string());
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !EMAIL_RE.is_match(email) {
            errors.push("Please enter a valid email address".to_string());
        }

        if self.position.trim().is_empty() {
            errors.push("Position is required".to_string());
        }

        if let Some(phone) = non_blank(&self.phone) {
            let digits = PHONE_NOISE_RE.replace_all(phone, "");
            if !PHONE_RE.is_match(&digits) {
                errors.push("Please enter a valid phone number".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(HireBoardError::Validation(errors))
        }
    }

    /// 検証済みの入力からレコードを作成
    pub fn into_record(self, id: CandidateId, today: NaiveDate) -> CandidateRecord {
        CandidateRecord {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            position: self.position.trim().to_string(),
            phone: non_blank(&self.phone).unwrap_or(PHONE_NOT_PROVIDED).to_string(),
            experience: non_blank(&self.experience)
                .unwrap_or(EXPERIENCE_NOT_SPECIFIED)
                .to_string(),
            status: self.status.unwrap_or_default(),
            applied_date: today,
            source: non_blank(&self.source).unwrap_or(SOURCE_MANUAL_ENTRY).to_string(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
