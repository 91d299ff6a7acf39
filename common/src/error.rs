//! エラー型定義
//!
//! インポートパイプラインの各段階で発生するエラー。
//! どのエラーもパイプライン内で回復され、メッセージとして表示される。

use crate::mapping::CandidateField;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported file format: {0}. Please upload a CSV or Excel file.")]
    UnsupportedFormat(String),

    #[error("{0}")]
    ParseFailure(String),

    #[error("Excel file has insufficient data.")]
    InsufficientData,

    #[error("No data found in file.")]
    EmptyResult,

    #[error("Required fields are not mapped: {}", field_labels(.0))]
    MissingRequiredMapping(Vec<CandidateField>),

    #[error("These emails already exist: {}", .0.join(", "))]
    DuplicateEmailsFound(Vec<String>),

    #[error("Error occurred while importing data: {0}")]
    StoreWriteFailure(String),

    #[error("Cannot {action} while in the {stage} step")]
    InvalidTransition {
        stage: &'static str,
        action: &'static str,
    },
}

fn field_labels(fields: &[CandidateField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
