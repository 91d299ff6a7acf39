//! 対話式の確認・マッピング修正
//!
//! dialoguer のプロンプトと、取り込み内容の表形式表示。

use crate::error::{HireBoardError, Result};
use dialoguer::{Confirm, Select};
use hire_board_common::{
    CandidateField, CandidateRecord, DuplicatePrompt, ImportMapping, ImportSession,
};

const SKIP_LABEL: &str = "(取り込まない)";

/// はい/いいえの確認
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| HireBoardError::Prompt(e.to_string()))
}

/// 列ごとにフィールドを選び直す
pub fn review_mapping(session: &mut ImportSession) -> Result<()> {
    let mut options = vec![SKIP_LABEL.to_string()];
    options.extend(CandidateField::ALL.iter().map(|f| selection_label(*f)));

    let columns = session.columns().to_vec();
    for (count, column) in columns.iter().enumerate() {
        let current = session.mapping().field_for(column);
        let default = current
            .and_then(|f| CandidateField::ALL.iter().position(|c| *c == f))
            .map(|i| i + 1)
            .unwrap_or(0);

        let choice = Select::new()
            .with_prompt(format!("[{}/{}] {}", count + 1, columns.len(), column))
            .items(&options)
            .default(default)
            .interact()
            .map_err(|e| HireBoardError::Prompt(e.to_string()))?;

        let field = if choice == 0 {
            None
        } else {
            Some(CandidateField::ALL[choice - 1])
        };
        if field != current {
            session.set_column_mapping(column, field)?;
        }
    }
    Ok(())
}

fn selection_label(field: CandidateField) -> String {
    if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    }
}

/// マッピング表を表示
pub fn print_mapping(mapping: &ImportMapping) {
    let width = mapping.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0);
    for (column, field) in mapping.iter() {
        let target = field
            .map(|f| f.label().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<width$}  →  {}", column, target, width = width);
    }
    let missing = mapping.missing_required();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        println!("  ⚠ 必須項目が未設定: {}", labels.join(", "));
    }
}

/// プレビュー行を表示
pub fn print_preview(records: &[CandidateRecord], total: usize) {
    for record in records {
        println!(
            "  {} <{}> {} [{}] {}",
            record.name,
            record.email,
            record.position,
            record.status.label(),
            record.applied_date
        );
    }
    if total > records.len() {
        println!("  ... 他 {} 件", total - records.len());
    }
}

/// 1件分の詳細表示
pub fn print_candidate(record: &CandidateRecord) {
    println!("ID:         {}", record.id);
    println!("名前:       {}", record.name);
    println!("メール:     {}", record.email);
    println!("電話:       {}", record.phone);
    println!("職種:       {}", record.position);
    println!("経験:       {}", record.experience);
    println!("ステータス: {}", record.status.label());
    println!("応募日:     {}", record.applied_date);
    println!("応募経路:   {}", record.source);
}

/// 重複メールの確認方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// 対話的に確認
    Ask,
    /// 確認なしで取り込む
    Allow,
    /// 確認なしで中止
    Reject,
}

/// 端末での重複確認
pub struct ConsolePrompt {
    policy: DuplicatePolicy,
}

impl ConsolePrompt {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }
}

impl DuplicatePrompt for ConsolePrompt {
    fn confirm_duplicates(&mut self, duplicate_emails: &[String]) -> bool {
        println!("⚠ 既に登録済みのメールアドレス: {}件", duplicate_emails.len());
        for email in duplicate_emails {
            println!("  - {}", email);
        }

        match self.policy {
            DuplicatePolicy::Allow => true,
            DuplicatePolicy::Reject => false,
            DuplicatePolicy::Ask => match confirm("重複を含めて取り込みますか？", false) {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(%e, "duplicate confirmation failed");
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_label_marks_required() {
        assert_eq!(selection_label(CandidateField::Email), "Email *");
        assert_eq!(selection_label(CandidateField::Phone), "Phone");
    }

    #[test]
    fn test_console_prompt_policies() {
        let emails = vec!["a@x.com".to_string()];
        assert!(ConsolePrompt::new(DuplicatePolicy::Allow).confirm_duplicates(&emails));
        assert!(!ConsolePrompt::new(DuplicatePolicy::Reject).confirm_duplicates(&emails));
    }
}
