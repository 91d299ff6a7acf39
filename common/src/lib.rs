//! Hire Board Common Library
//!
//! CLIと永続化層で共有される型と取り込みパイプライン:
//! デコード済みシート → 列マッピング → 行正規化 → 重複チェック → マージ

pub mod types;
pub mod error;
pub mod mapping;
pub mod normalizer;
pub mod guard;
pub mod pipeline;
pub mod query;
pub mod summary;
pub mod article;
pub mod sample;

pub use types::{
    CandidateId, CandidateRecord, DecodedSheet, IdGenerator, RawRow, SheetKind, Status,
    EXPERIENCE_NOT_SPECIFIED, NOT_AVAILABLE, PHONE_NOT_PROVIDED, SOURCE_FILE_IMPORT,
    SOURCE_MANUAL_ENTRY,
};
pub use error::{Error, Result};
pub use mapping::{CandidateField, ImportMapping};
pub use normalizer::RowNormalizer;
pub use guard::{DuplicateGuard, GuardReport};
pub use pipeline::{CandidateSink, DuplicatePrompt, ImportSession, ImportStage, DEFAULT_PREVIEW_ROWS};
pub use query::{CandidateQuery, SortKey};
pub use summary::PipelineSummary;
pub use article::{ArticleCategory, ArticleId, ArticleQuery, ArticleRecord, ArticleSort};
pub use sample::{sample_articles, sample_candidates};
