//! 候補者レコードストア
//!
//! 候補者一覧をメモリに保持し、変更のたびにキー/値ストレージへ書き出す。
//! 一括追加は全件成功か全件失敗（書き込み失敗時はメモリも元に戻す）。

pub mod articles;

use crate::entry::NewCandidate;
use crate::error::{HireBoardError, Result};
use crate::storage::{KeyValueStorage, CANDIDATES_KEY};
use chrono::{Local, NaiveDate};
use hire_board_common::{
    sample_candidates, CandidateId, CandidateRecord, CandidateSink, IdGenerator, Status,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub use articles::ArticleStore;

pub struct RecordStore<S> {
    storage: S,
    candidates: Vec<CandidateRecord>,
    ids: IdGenerator,
    today: NaiveDate,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// ストレージから読み込む（未保存なら空）
    pub fn open(storage: S) -> Result<Self> {
        let candidates: Vec<CandidateRecord> = match storage.read(CANDIDATES_KEY)? {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(&json)?,
            _ => Vec::new(),
        };
        debug!(count = candidates.len(), "candidates loaded");

        let ids = candidates
            .iter()
            .map(|c| c.id)
            .max()
            .map(IdGenerator::after)
            .unwrap_or_default();

        Ok(Self {
            storage,
            candidates,
            ids,
            today: Local::now().date_naive(),
        })
    }

    /// 「今日」を固定する
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn all(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, id: CandidateId) -> Option<&CandidateRecord> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn emails(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.email.clone()).collect()
    }

    /// 空のストアにサンプルデータを投入
    pub fn seed_samples(&mut self) -> Result<bool> {
        if !self.candidates.is_empty() {
            return Ok(false);
        }
        let count = self.merge(sample_candidates())?;
        info!(count, "sample candidates seeded");
        Ok(true)
    }

    /// 手動登録
    pub fn add(&mut self, input: NewCandidate) -> Result<CandidateRecord> {
        input.validate()?;
        let taken: HashSet<CandidateId> = self.candidates.iter().map(|c| c.id).collect();
        let id = self.next_free_id(&taken);
        let record = input.into_record(id, self.today);
        self.candidates.push(record.clone());
        if let Err(e) = self.persist() {
            self.candidates.pop();
            return Err(e);
        }
        info!(id = %record.id, "candidate added");
        Ok(record)
    }

    /// ステータス変更
    pub fn update_status(&mut self, id: CandidateId, status: Status) -> Result<Status> {
        let index = self.index_of(id)?;
        let previous = std::mem::replace(&mut self.candidates[index].status, status);
        if let Err(e) = self.persist() {
            self.candidates[index].status = previous;
            return Err(e);
        }
        info!(%id, from = %previous, to = %status, "status updated");
        Ok(previous)
    }

    /// 不採用にする（ステータス変更のみ、元に戻せる）
    pub fn reject(&mut self, id: CandidateId) -> Result<Status> {
        self.update_status(id, Status::Rejected)
    }

    /// 完全削除（元に戻せない）
    pub fn delete(&mut self, id: CandidateId) -> Result<CandidateRecord> {
        let index = self.index_of(id)?;
        let removed = self.candidates.remove(index);
        if let Err(e) = self.persist() {
            self.candidates.insert(index, removed);
            return Err(e);
        }
        info!(%id, "candidate permanently deleted");
        Ok(removed)
    }

    /// 一括追加
    ///
    /// 既存IDと衝突するレコードには新しいIDを振り直す。
    pub fn merge(&mut self, records: Vec<CandidateRecord>) -> Result<usize> {
        let original_len = self.candidates.len();
        let mut taken: HashSet<CandidateId> = self.candidates.iter().map(|c| c.id).collect();

        for mut record in records {
            if !taken.insert(record.id) {
                let reassigned = self.next_free_id(&taken);
                debug!(old = %record.id, new = %reassigned, "id collision, reassigned");
                record.id = reassigned;
                taken.insert(reassigned);
            }
            self.candidates.push(record);
        }

        if let Err(e) = self.persist() {
            warn!(%e, "merge rolled back");
            self.candidates.truncate(original_len);
            return Err(e);
        }

        let count = self.candidates.len() - original_len;
        info!(count, total = self.candidates.len(), "candidates merged");
        Ok(count)
    }

    fn next_free_id(&mut self, taken: &HashSet<CandidateId>) -> CandidateId {
        loop {
            let id = self.ids.next_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    fn index_of(&self, id: CandidateId) -> Result<usize> {
        self.candidates
            .iter()
            .position(|c| c.id == id)
            .ok_or(HireBoardError::CandidateNotFound(id))
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.candidates)?;
        self.storage.write(CANDIDATES_KEY, &json)
    }
}

impl<S: KeyValueStorage> CandidateSink for RecordStore<S> {
    fn all_candidate_emails(&self) -> Vec<String> {
        self.emails()
    }

    fn merge_candidates(&mut self, records: Vec<CandidateRecord>) -> hire_board_common::Result<()> {
        self.merge(records)
            .map(|_| ())
            .map_err(|e| hire_board_common::Error::StoreWriteFailure(e.to_string()))
    }
}
