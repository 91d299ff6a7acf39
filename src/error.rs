use hire_board_common::CandidateId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HireBoardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Import(#[from] hire_board_common::Error),

    #[error("入力エラー: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("候補者が見つかりません: {0}")]
    CandidateNotFound(CandidateId),

    #[error("記事が見つかりません: {0}")]
    ArticleNotFound(u64),

    #[error("保存エラー: {0}")]
    Storage(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(#[from] rust_xlsxwriter::XlsxError),

    #[error("対話入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, HireBoardError>;
