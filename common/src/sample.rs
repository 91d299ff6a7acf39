//! 初回起動時のサンプルデータ

use crate::article::{ArticleCategory, ArticleId, ArticleRecord};
use crate::types::{CandidateId, CandidateRecord, Status};
use chrono::NaiveDate;

const SAMPLE_SOURCE: &str = "Sample Data";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn candidate(
    id: u64,
    name: &str,
    email: &str,
    phone: &str,
    position: &str,
    experience: &str,
    status: Status,
    applied: NaiveDate,
) -> CandidateRecord {
    CandidateRecord {
        id: CandidateId(id),
        name: name.to_string(),
        email: email.to_string(),
        position: position.to_string(),
        phone: phone.to_string(),
        experience: experience.to_string(),
        status,
        applied_date: applied,
        source: SAMPLE_SOURCE.to_string(),
    }
}

/// サンプル候補者（6件）
pub fn sample_candidates() -> Vec<CandidateRecord> {
    vec![
        candidate(1, "Andre Koch", "andre.koch@contractor.com", "+1-555-0123", "Software Engineer", "5 years", Status::Interview, date(2025, 8, 10)),
        candidate(2, "Sarah Williams", "sarah.williams@email.com", "+1-555-0456", "Copywriter", "3 years", Status::Reviewing, date(2025, 8, 12)),
        candidate(3, "Michael Chen", "michael.chen@email.com", "+1-555-0789", "Chat Specialist", "2 years", Status::Applied, date(2025, 8, 14)),
        candidate(4, "Yvonne Alvarez", "yvonne.alvarez@self-employed.com", "+1-555-0321", "Software Engineer", "7 years", Status::Rejected, date(2025, 3, 25)),
        candidate(5, "Lilah Hill", "lilah.hill@email.com", "+1-555-0654", "Software Engineer", "4 years", Status::Applied, date(2025, 8, 13)),
        candidate(6, "David Park", "david.park@email.com", "+1-555-0987", "Frontend Developer", "6 years", Status::Interview, date(2025, 8, 11)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn article(
    id: u64,
    title: &str,
    category: ArticleCategory,
    content: &str,
    created: NaiveDate,
    views: u32,
    comments: u32,
    tags: &[&str],
) -> ArticleRecord {
    ArticleRecord {
        id: ArticleId(id),
        title: title.to_string(),
        category,
        content: content.to_string(),
        author: "Interviewer".to_string(),
        created_at: created,
        updated_at: created,
        views,
        comments,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// サンプル面接ガイド（カテゴリごとに1件）
pub fn sample_articles() -> Vec<ArticleRecord> {
    vec![
        article(
            1,
            "Interview Process Overview",
            ArticleCategory::BasicGuide,
            "# Interview Process Overview\n\n## Before the interview\nRead the resume and prepare questions for the role.\n\n## During the interview\nKeep time, take notes, and leave room for the candidate's questions.\n\n**Write feedback the same day.**",
            date(2025, 8, 1),
            156,
            8,
            &["Basic Guide", "Interview Process", "Beginners"],
        ),
        article(
            2,
            "Technical Interview Question Bank",
            ArticleCategory::TechnicalInterview,
            "# Technical Interview Question Bank\n\n## Programming\nAsk for a small function and discuss its complexity.\n\n## Database\nCover indexes, joins, and transaction isolation.",
            date(2025, 8, 5),
            89,
            12,
            &["Technical Interview", "Programming", "Database"],
        ),
        article(
            3,
            "Behavioral Interview with the STAR Method",
            ArticleCategory::BehavioralInterview,
            "# Behavioral Interview\n\n## STAR method\nSituation, Task, Action, Result.\n\n## Leadership\nAsk about a time the candidate led a team through a hard deadline.",
            date(2025, 8, 8),
            203,
            15,
            &["Behavioral Interview", "STAR Method", "Leadership"],
        ),
        article(
            4,
            "System Design Interview Guide",
            ArticleCategory::SystemDesign,
            "# System Design Interview Guide\n\n## Requirements\nClarify scale and constraints first.\n\n## Architecture\nDiscuss caching, sharding, and failure modes.",
            date(2025, 8, 12),
            167,
            23,
            &["System Design", "Architecture", "Scalability"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_candidate_ids_unique() {
        let ids: HashSet<_> = sample_candidates().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_sample_articles_cover_categories() {
        let categories: HashSet<_> = sample_articles().iter().map(|a| a.category).collect();
        assert_eq!(categories.len(), ArticleCategory::ALL.len());
    }
}
