//! 取り込みパイプライン（状態機械）
//!
//! ## 状態遷移
//! ```text
//! Upload ──ファイル受信──▶ Mapping ──検証OK──▶ Preview ──確定──▶ Importing ──▶ Success
//!   │                      │  ▲                 │                    │
//!   └─cancel─▶ Closed      └──┴──── back ───────┘ ◀── 失敗/重複拒否 ──┘
//! ```
//!
//! 画面描画には依存しない。呼び出し側（CLIなど）がイベントを渡し、
//! `stage()` / `error()` / `preview()` を読んで表示する。

use crate::error::{Error, Result};
use crate::guard::DuplicateGuard;
use crate::mapping::{CandidateField, ImportMapping};
use crate::normalizer::RowNormalizer;
use crate::types::{CandidateRecord, DecodedSheet, SheetKind};
use tracing::{debug, info, warn};

/// プレビューに表示する行数
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// 取り込み先（レコードストア）
pub trait CandidateSink {
    /// 既存候補者の全メールアドレス
    fn all_candidate_emails(&self) -> Vec<String>;

    /// 正規化済みレコードを一括追加（全件成功か全件失敗）
    fn merge_candidates(&mut self, records: Vec<CandidateRecord>) -> Result<()>;
}

/// 重複確認のプロンプト
pub trait DuplicatePrompt {
    /// 重複メール一覧を提示し、続行するなら true
    fn confirm_duplicates(&mut self, duplicate_emails: &[String]) -> bool;
}

impl<F> DuplicatePrompt for F
where
    F: FnMut(&[String]) -> bool,
{
    fn confirm_duplicates(&mut self, duplicate_emails: &[String]) -> bool {
        self(duplicate_emails)
    }
}

/// 取り込みステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Upload,
    Mapping,
    Preview,
    Importing,
    Success,
    Closed,
}

impl ImportStage {
    pub fn name(&self) -> &'static str {
        match self {
            ImportStage::Upload => "Upload",
            ImportStage::Mapping => "Mapping",
            ImportStage::Preview => "Preview",
            ImportStage::Importing => "Importing",
            ImportStage::Success => "Success",
            ImportStage::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 1回分の取り込みセッション
#[derive(Debug, Clone)]
pub struct ImportSession {
    stage: ImportStage,
    sheet: Option<DecodedSheet>,
    mapping: ImportMapping,
    preview: Vec<CandidateRecord>,
    preview_rows: usize,
    error: Option<String>,
    imported: usize,
    normalizer: RowNormalizer,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new(RowNormalizer::default())
    }
}

impl ImportSession {
    pub fn new(normalizer: RowNormalizer) -> Self {
        Self {
            stage: ImportStage::Upload,
            sheet: None,
            mapping: ImportMapping::default(),
            preview: Vec::new(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            error: None,
            imported: 0,
            normalizer,
        }
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows.max(1);
        self
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    /// 直近のエラーメッセージ
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn mapping(&self) -> &ImportMapping {
        &self.mapping
    }

    /// プレビュー用に正規化した先頭行
    pub fn preview(&self) -> &[CandidateRecord] {
        &self.preview
    }

    pub fn columns(&self) -> &[String] {
        self.sheet.as_ref().map(|s| s.columns.as_slice()).unwrap_or(&[])
    }

    /// 取り込み対象の総行数
    pub fn total_rows(&self) -> usize {
        self.sheet.as_ref().map(|s| s.len()).unwrap_or(0)
    }

    pub fn file_kind(&self) -> Option<SheetKind> {
        self.sheet.as_ref().map(|s| s.kind)
    }

    /// 直近の取り込み件数
    pub fn imported_count(&self) -> usize {
        self.imported
    }

    /// デコード結果を受け取る（Upload）
    pub fn receive_file(&mut self, decoded: Result<DecodedSheet>) -> Result<()> {
        self.require(ImportStage::Upload, "receive a file")?;
        let sheet = match decoded {
            Ok(sheet) if sheet.is_empty() => return Err(self.fail(Error::EmptyResult)),
            Ok(sheet) => sheet,
            Err(e) => return Err(self.fail(e)),
        };

        self.mapping = ImportMapping::auto(&sheet.columns);
        self.preview.clear();
        self.error = None;
        debug!(rows = sheet.len(), columns = sheet.columns.len(), "file received");
        self.sheet = Some(sheet);
        self.transition(ImportStage::Mapping);
        Ok(())
    }

    /// 1列のマッピングを手動で変更（Mapping）
    pub fn set_column_mapping(&mut self, column: &str, field: Option<CandidateField>) -> Result<bool> {
        self.require(ImportStage::Mapping, "change the mapping")?;
        Ok(self.mapping.set(column, field))
    }

    /// 必須マッピングを検証してプレビューへ（Mapping）
    pub fn proceed_to_preview(&mut self) -> Result<()> {
        self.require(ImportStage::Mapping, "preview")?;
        if let Err(e) = self.mapping.validate() {
            return Err(self.fail(e));
        }

        let limit = self.preview_rows;
        let rows = self
            .sheet
            .as_ref()
            .map(|s| &s.rows[..s.rows.len().min(limit)])
            .unwrap_or(&[]);
        self.preview = self.normalizer.normalize_all(rows, &self.mapping);
        self.error = None;
        self.transition(ImportStage::Preview);
        Ok(())
    }

    /// 1ステップ戻る（Mapping → Upload, Preview → Mapping）
    pub fn back(&mut self) -> Result<()> {
        match self.stage {
            ImportStage::Mapping => {
                self.clear_file();
                self.transition(ImportStage::Upload);
            }
            ImportStage::Preview => {
                self.preview.clear();
                self.transition(ImportStage::Mapping);
            }
            _ => return Err(self.invalid("go back")),
        }
        self.error = None;
        Ok(())
    }

    /// ファイル選択からやり直す（Mapping/Preview → Upload）
    pub fn start_over(&mut self) -> Result<()> {
        match self.stage {
            ImportStage::Mapping | ImportStage::Preview => {
                self.clear_file();
                self.error = None;
                self.transition(ImportStage::Upload);
                Ok(())
            }
            _ => Err(self.invalid("start over")),
        }
    }

    /// 取り込みを確定（Preview → Importing → Success）
    ///
    /// 重複があれば `prompt` に確認し、拒否されたらバッチ全体を破棄して
    /// Preview に戻る。書き込み失敗時も Preview に戻る。
    pub fn confirm_import<S, P>(&mut self, sink: &mut S, prompt: &mut P) -> Result<usize>
    where
        S: CandidateSink + ?Sized,
        P: DuplicatePrompt + ?Sized,
    {
        self.require(ImportStage::Preview, "import")?;
        if let Err(e) = self.mapping.validate() {
            return Err(self.fail(e));
        }

        self.transition(ImportStage::Importing);
        match self.run_import(sink, prompt) {
            Ok(count) => Ok(count),
            Err(e) => {
                self.transition(ImportStage::Preview);
                Err(self.fail(e))
            }
        }
    }

    /// マッピング確認なしで一括取り込み（Upload → Importing → Success）
    ///
    /// 必須フィールドが未マッピングでも検証せず、"N/A" で埋める。
    pub fn auto_import<S, P>(
        &mut self,
        decoded: Result<DecodedSheet>,
        sink: &mut S,
        prompt: &mut P,
    ) -> Result<usize>
    where
        S: CandidateSink + ?Sized,
        P: DuplicatePrompt + ?Sized,
    {
        self.receive_file(decoded)?;
        let missing = self.mapping.missing_required();
        if !missing.is_empty() {
            warn!(?missing, "auto import without required columns, filling placeholders");
        }

        self.transition(ImportStage::Importing);
        match self.run_import(sink, prompt) {
            Ok(count) => Ok(count),
            Err(e) => {
                self.clear_file();
                self.transition(ImportStage::Upload);
                Err(self.fail(e))
            }
        }
    }

    /// 別ファイルの取り込みに戻る
    pub fn reset(&mut self) -> Result<()> {
        if matches!(self.stage, ImportStage::Importing | ImportStage::Closed) {
            return Err(self.invalid("reset"));
        }
        self.clear_file();
        self.error = None;
        self.imported = 0;
        self.transition(ImportStage::Upload);
        Ok(())
    }

    /// セッションを閉じる（取り込み確定前のみ）
    pub fn cancel(&mut self) -> Result<()> {
        if self.stage == ImportStage::Importing {
            return Err(self.invalid("cancel"));
        }
        self.clear_file();
        self.error = None;
        self.transition(ImportStage::Closed);
        Ok(())
    }

    fn run_import<S, P>(&mut self, sink: &mut S, prompt: &mut P) -> Result<usize>
    where
        S: CandidateSink + ?Sized,
        P: DuplicatePrompt + ?Sized,
    {
        let rows = self.sheet.as_ref().map(|s| s.rows.as_slice()).unwrap_or(&[]);
        let batch = self.normalizer.normalize_all(rows, &self.mapping);

        let guard = DuplicateGuard::new(sink.all_candidate_emails());
        let report = guard.partition(batch);
        if report.has_duplicates() {
            let emails = report.duplicate_emails();
            debug!(count = emails.len(), "duplicate emails found, asking for confirmation");
            if !prompt.confirm_duplicates(&emails) {
                return Err(Error::DuplicateEmailsFound(emails));
            }
        }

        let records = report.into_records();
        let count = records.len();
        sink.merge_candidates(records)?;

        info!(count, "candidates imported");
        self.imported = count;
        self.error = None;
        self.transition(ImportStage::Success);
        Ok(count)
    }

    fn require(&mut self, expected: ImportStage, action: &'static str) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&mut self, action: &'static str) -> Error {
        self.fail(Error::InvalidTransition {
            stage: self.stage.name(),
            action,
        })
    }

    /// エラーを記録して返す（状態は変えない）
    fn fail(&mut self, error: Error) -> Error {
        warn!(stage = %self.stage, %error, "import step failed");
        self.error = Some(error.to_string());
        error
    }

    fn clear_file(&mut self) {
        self.sheet = None;
        self.mapping = ImportMapping::default();
        self.preview.clear();
    }

    fn transition(&mut self, next: ImportStage) {
        debug!(from = %self.stage, to = %next, "import stage changed");
        self.stage = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawRow, Status, NOT_AVAILABLE, SOURCE_FILE_IMPORT};
    use chrono::NaiveDate;

    #[derive(Default)]
    struct MemorySink {
        records: Vec<CandidateRecord>,
        fail_writes: bool,
    }

    impl CandidateSink for MemorySink {
        fn all_candidate_emails(&self) -> Vec<String> {
            self.records.iter().map(|r| r.email.clone()).collect()
        }

        fn merge_candidates(&mut self, records: Vec<CandidateRecord>) -> Result<()> {
            if self.fail_writes {
                return Err(Error::StoreWriteFailure("disk full".into()));
            }
            self.records.extend(records);
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 18).unwrap()
    }

    fn session() -> ImportSession {
        ImportSession::new(RowNormalizer::new(today()))
    }

    fn sheet(columns: &[&str], rows: &[&[&str]]) -> DecodedSheet {
        let columns: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().map(|c| c.to_string()))
                    .collect::<RawRow>()
            })
            .collect();
        DecodedSheet { kind: SheetKind::Csv, columns, rows }
    }

    fn two_rows() -> DecodedSheet {
        sheet(
            &["Full Name", "Email", "Job Title"],
            &[
                &["John Doe", "john@x.com", "Engineer"],
                &["Jane Smith", "jane@x.com", "PM"],
            ],
        )
    }

    fn accept_all(_: &[String]) -> bool {
        true
    }

    fn decline_all(_: &[String]) -> bool {
        false
    }

    #[test]
    fn test_happy_path_reaches_success() {
        let mut s = session();
        let mut sink = MemorySink::default();

        s.receive_file(Ok(two_rows())).unwrap();
        assert_eq!(s.stage(), ImportStage::Mapping);
        assert_eq!(s.mapping().field_for("Job Title"), Some(CandidateField::Position));

        s.proceed_to_preview().unwrap();
        assert_eq!(s.stage(), ImportStage::Preview);
        assert_eq!(s.preview().len(), 2);
        assert_eq!(s.total_rows(), 2);

        let count = s.confirm_import(&mut sink, &mut accept_all).unwrap();
        assert_eq!(count, 2);
        assert_eq!(s.stage(), ImportStage::Success);
        assert_eq!(sink.records.len(), 2);
        assert!(sink.records.iter().all(|r| r.status == Status::Applied));
        assert!(sink.records.iter().all(|r| r.source == SOURCE_FILE_IMPORT));
        assert!(sink.records.iter().all(|r| r.applied_date == today()));
    }

    #[test]
    fn test_decoder_failure_stays_in_upload() {
        let mut s = session();
        let err = s.receive_file(Err(Error::UnsupportedFormat("a.pdf".into()))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert_eq!(s.stage(), ImportStage::Upload);
        assert!(s.error().unwrap().contains("a.pdf"));
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        let mut s = session();
        let err = s.receive_file(Ok(sheet(&["Email"], &[]))).unwrap_err();
        assert_eq!(err, Error::EmptyResult);
        assert_eq!(s.stage(), ImportStage::Upload);
    }

    #[test]
    fn test_missing_email_stays_in_mapping() {
        let mut s = session();
        s.receive_file(Ok(sheet(&["Full Name", "Job Title"], &[&["John", "Engineer"]])))
            .unwrap();

        let err = s.proceed_to_preview().unwrap_err();
        assert_eq!(err, Error::MissingRequiredMapping(vec![CandidateField::Email]));
        assert_eq!(s.stage(), ImportStage::Mapping);
        assert!(s.error().unwrap().contains("Email"));
    }

    #[test]
    fn test_manual_mapping_fixes_validation() {
        let mut s = session();
        s.receive_file(Ok(sheet(
            &["Full Name", "Contact Info", "Job Title"],
            &[&["John", "john@x.com", "Engineer"]],
        )))
        .unwrap();
        // "Contact Info" は phone と推定される
        assert_eq!(s.mapping().field_for("Contact Info"), Some(CandidateField::Phone));
        assert!(s.proceed_to_preview().is_err());

        assert!(s.set_column_mapping("Contact Info", Some(CandidateField::Email)).unwrap());
        s.proceed_to_preview().unwrap();
        assert_eq!(s.preview()[0].email, "john@x.com");
        assert!(s.error().is_none());
    }

    #[test]
    fn test_preview_is_bounded() {
        let rows: Vec<Vec<String>> = (0..12)
            .map(|i| vec![format!("N{}", i), format!("n{}@x.com", i), "Dev".to_string()])
            .collect();
        let row_refs: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(|s| s.as_str()).collect()).collect();
        let row_slices: Vec<&[&str]> = row_refs.iter().map(|r| r.as_slice()).collect();

        let mut s = session();
        s.receive_file(Ok(sheet(&["Name", "Email", "Role"], &row_slices))).unwrap();
        s.proceed_to_preview().unwrap();
        assert_eq!(s.preview().len(), DEFAULT_PREVIEW_ROWS);
        assert_eq!(s.total_rows(), 12);
    }

    #[test]
    fn test_declined_duplicates_leave_sink_unchanged() {
        let mut s = session();
        let mut sink = MemorySink::default();
        sink.merge_candidates(vec![RowNormalizer::new(today()).normalize(
            &[("Email".to_string(), "JOHN@x.com".to_string())].into_iter().collect::<RawRow>(),
            &ImportMapping::auto(&["Email".to_string()]),
        )])
        .unwrap();

        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();

        let mut asked: Vec<String> = Vec::new();
        let mut prompt = |emails: &[String]| {
            asked = emails.to_vec();
            false
        };
        let err = s.confirm_import(&mut sink, &mut prompt).unwrap_err();

        assert_eq!(asked, vec!["john@x.com".to_string()]);
        assert_eq!(err, Error::DuplicateEmailsFound(vec!["john@x.com".into()]));
        assert_eq!(s.stage(), ImportStage::Preview);
        assert_eq!(sink.records.len(), 1);
    }

    #[test]
    fn test_confirmed_duplicates_are_merged() {
        let mut s = session();
        let mut sink = MemorySink::default();
        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();
        s.confirm_import(&mut sink, &mut accept_all).unwrap();

        s.reset().unwrap();
        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();
        let count = s.confirm_import(&mut sink, &mut accept_all).unwrap();
        assert_eq!(count, 2);
        assert_eq!(sink.records.len(), 4);
    }

    #[test]
    fn test_store_failure_returns_to_preview() {
        let mut s = session();
        let mut sink = MemorySink { fail_writes: true, ..Default::default() };
        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();

        let err = s.confirm_import(&mut sink, &mut accept_all).unwrap_err();
        assert!(matches!(err, Error::StoreWriteFailure(_)));
        assert_eq!(s.stage(), ImportStage::Preview);
        assert!(sink.records.is_empty());
    }

    #[test]
    fn test_back_transitions() {
        let mut s = session();
        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();

        s.back().unwrap();
        assert_eq!(s.stage(), ImportStage::Mapping);
        assert!(s.preview().is_empty());

        s.back().unwrap();
        assert_eq!(s.stage(), ImportStage::Upload);
        assert_eq!(s.total_rows(), 0);

        assert!(s.back().is_err());
    }

    #[test]
    fn test_start_over_from_preview() {
        let mut s = session();
        s.receive_file(Ok(two_rows())).unwrap();
        s.proceed_to_preview().unwrap();
        s.start_over().unwrap();
        assert_eq!(s.stage(), ImportStage::Upload);
        assert!(s.columns().is_empty());
    }

    #[test]
    fn test_cancel_closes_session() {
        let mut s = session();
        s.cancel().unwrap();
        assert_eq!(s.stage(), ImportStage::Closed);
        assert!(s.receive_file(Ok(two_rows())).is_err());
    }

    #[test]
    fn test_actions_in_wrong_stage_are_rejected() {
        let mut s = session();
        let mut sink = MemorySink::default();
        let err = s.confirm_import(&mut sink, &mut accept_all).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(s.stage(), ImportStage::Upload);
        assert!(s.proceed_to_preview().is_err());
        assert!(s.set_column_mapping("Email", None).is_err());
    }

    #[test]
    fn test_auto_import_fills_placeholders() {
        let mut s = session();
        let mut sink = MemorySink::default();
        let count = s
            .auto_import(
                Ok(sheet(&["Full Name", "Job Title"], &[&["John", "Engineer"]])),
                &mut sink,
                &mut decline_all,
            )
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(s.stage(), ImportStage::Success);
        assert_eq!(sink.records[0].name, "John");
        assert_eq!(sink.records[0].email, NOT_AVAILABLE);
    }

    #[test]
    fn test_auto_import_respects_duplicate_guard() {
        let mut s = session();
        let mut sink = MemorySink::default();
        s.auto_import(Ok(two_rows()), &mut sink, &mut accept_all).unwrap();

        s.reset().unwrap();
        let err = s.auto_import(Ok(two_rows()), &mut sink, &mut decline_all).unwrap_err();
        assert!(matches!(err, Error::DuplicateEmailsFound(ref emails) if emails.len() == 2));
        assert_eq!(s.stage(), ImportStage::Upload);
        assert_eq!(sink.records.len(), 2);
    }
}
