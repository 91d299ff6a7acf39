//! 面接ガイド（ナレッジベース）の型定義

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 記事ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ArticleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ArticleId)
    }
}

/// 記事カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArticleCategory {
    #[default]
    #[serde(rename = "Basic Guide")]
    BasicGuide,
    #[serde(rename = "Technical Interview")]
    TechnicalInterview,
    #[serde(rename = "Behavioral Interview")]
    BehavioralInterview,
    #[serde(rename = "System Design")]
    SystemDesign,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 4] = [
        ArticleCategory::BasicGuide,
        ArticleCategory::TechnicalInterview,
        ArticleCategory::BehavioralInterview,
        ArticleCategory::SystemDesign,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ArticleCategory::BasicGuide => "Basic Guide",
            ArticleCategory::TechnicalInterview => "Technical Interview",
            ArticleCategory::BehavioralInterview => "Behavioral Interview",
            ArticleCategory::SystemDesign => "System Design",
        }
    }
}

impl std::fmt::Display for ArticleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ArticleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace([' ', '-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|c| {
                let label = c.label().to_lowercase().replace(' ', "");
                // "technical" のような先頭一語でも受け付ける
                label == wanted || (!wanted.is_empty() && label.starts_with(&wanted))
            })
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Use basic, technical, behavioral, or system-design",
                    s
                )
            })
    }
}

/// 面接ガイド記事
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub category: ArticleCategory,
    /// Markdown本文
    pub content: String,
    #[serde(default)]
    pub author: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 記事一覧の並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleSort {
    #[default]
    Newest,
    Oldest,
    Views,
    Comments,
}

impl std::str::FromStr for ArticleSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "new" => Ok(ArticleSort::Newest),
            "oldest" | "old" => Ok(ArticleSort::Oldest),
            "views" => Ok(ArticleSort::Views),
            "comments" => Ok(ArticleSort::Comments),
            _ => Err(format!("Unknown sort: {}. Use newest, oldest, views, or comments", s)),
        }
    }
}

/// 記事一覧の条件
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    /// タイトル・本文の部分一致
    pub search: Option<String>,
    pub category: Option<ArticleCategory>,
    pub sort: ArticleSort,
}

impl ArticleQuery {
    pub fn matches(&self, article: &ArticleRecord) -> bool {
        if let Some(category) = self.category {
            if article.category != category {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                article.title.to_lowercase().contains(&term)
                    || article.content.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, articles: &'a [ArticleRecord]) -> Vec<&'a ArticleRecord> {
        let mut result: Vec<&ArticleRecord> = articles.iter().filter(|a| self.matches(a)).collect();
        match self.sort {
            ArticleSort::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ArticleSort::Oldest => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ArticleSort::Views => result.sort_by(|a, b| b.views.cmp(&a.views)),
            ArticleSort::Comments => result.sort_by(|a, b| b.comments.cmp(&a.comments)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_articles;

    #[test]
    fn test_category_serde_uses_label() {
        let json = serde_json::to_string(&ArticleCategory::SystemDesign).unwrap();
        assert_eq!(json, "\"System Design\"");
        let parsed: ArticleCategory = serde_json::from_str("\"Behavioral Interview\"").unwrap();
        assert_eq!(parsed, ArticleCategory::BehavioralInterview);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("technical".parse::<ArticleCategory>(), Ok(ArticleCategory::TechnicalInterview));
        assert_eq!("System Design".parse::<ArticleCategory>(), Ok(ArticleCategory::SystemDesign));
        assert_eq!("system-design".parse::<ArticleCategory>(), Ok(ArticleCategory::SystemDesign));
        assert!("cooking".parse::<ArticleCategory>().is_err());
        assert!("".parse::<ArticleCategory>().is_err());
    }

    #[test]
    fn test_query_by_category_and_search() {
        let articles = sample_articles();
        let query = ArticleQuery {
            category: Some(ArticleCategory::BehavioralInterview),
            ..Default::default()
        };
        assert_eq!(query.apply(&articles).len(), 1);

        let query = ArticleQuery { search: Some("STAR".into()), ..Default::default() };
        let found = query.apply(&articles);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, ArticleCategory::BehavioralInterview);
    }

    #[test]
    fn test_query_sort_by_views() {
        let articles = sample_articles();
        let query = ArticleQuery { sort: ArticleSort::Views, ..Default::default() };
        let views: Vec<u32> = query.apply(&articles).iter().map(|a| a.views).collect();
        assert_eq!(views, vec![203, 167, 156, 89]);
    }
}
