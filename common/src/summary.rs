//! ダッシュボード用の集計

use crate::types::{CandidateRecord, Status};
use std::collections::HashMap;

/// 選考状況の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub total: usize,
    /// ステータス別件数（Status::ALL の順）
    pub by_status: Vec<(Status, usize)>,
    /// 職種別件数（件数の多い順、同数は名前順）
    pub by_position: Vec<(String, usize)>,
}

impl PipelineSummary {
    pub fn from_candidates(candidates: &[CandidateRecord]) -> Self {
        let by_status = Status::ALL
            .into_iter()
            .map(|status| (status, candidates.iter().filter(|c| c.status == status).count()))
            .collect();

        let mut positions: HashMap<&str, usize> = HashMap::new();
        for candidate in candidates {
            *positions.entry(candidate.position.as_str()).or_insert(0) += 1;
        }
        let mut by_position: Vec<(String, usize)> = positions
            .into_iter()
            .map(|(position, count)| (position.to_string(), count))
            .collect();
        by_position.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: candidates.len(),
            by_status,
            by_position,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// 採用率（%）
    pub fn hire_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(Status::Hired) as f64 * 100.0 / self.total as f64
    }
}
