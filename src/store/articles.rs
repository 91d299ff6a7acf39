//! 面接ガイド記事ストア

use crate::error::{HireBoardError, Result};
use crate::storage::{KeyValueStorage, ARTICLES_KEY};
use chrono::{Local, NaiveDate};
use hire_board_common::{sample_articles, ArticleCategory, ArticleId, ArticleRecord};
use tracing::{debug, info, warn};

const DEFAULT_AUTHOR: &str = "Interviewer";

pub struct ArticleStore<S> {
    storage: S,
    articles: Vec<ArticleRecord>,
    today: NaiveDate,
}

impl<S: KeyValueStorage> ArticleStore<S> {
    /// ストレージから読み込む
    ///
    /// 未保存・空・壊れたデータの場合はサンプル記事で初期化する。
    pub fn open(storage: S) -> Result<Self> {
        let stored = match storage.read(ARTICLES_KEY)? {
            Some(json) => match serde_json::from_str::<Vec<ArticleRecord>>(&json) {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(%e, "stored guides unreadable, reseeding");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut store = Self {
            storage,
            articles: stored,
            today: Local::now().date_naive(),
        };

        if store.articles.is_empty() {
            store.articles = sample_articles();
            store.persist()?;
            info!(count = store.articles.len(), "sample guides seeded");
        }
        Ok(store)
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn all(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn get(&self, id: ArticleId) -> Option<&ArticleRecord> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// 新規作成（先頭に追加）
    pub fn create(
        &mut self,
        title: &str,
        category: ArticleCategory,
        content: &str,
    ) -> Result<ArticleRecord> {
        Self::validate(title, content)?;

        let article = ArticleRecord {
            id: self.next_id(),
            title: title.trim().to_string(),
            category,
            content: content.trim().to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            created_at: self.today,
            updated_at: self.today,
            views: 0,
            comments: 0,
            tags: Vec::new(),
        };

        self.articles.insert(0, article.clone());
        if let Err(e) = self.persist() {
            self.articles.remove(0);
            return Err(e);
        }
        info!(id = %article.id, "guide created");
        Ok(article)
    }

    /// 既存記事の更新
    pub fn update(
        &mut self,
        id: ArticleId,
        title: &str,
        category: ArticleCategory,
        content: &str,
    ) -> Result<ArticleRecord> {
        Self::validate(title, content)?;
        let index = self.index_of(id)?;

        let previous = self.articles[index].clone();
        {
            let article = &mut self.articles[index];
            article.title = title.trim().to_string();
            article.category = category;
            article.content = content.trim().to_string();
            article.updated_at = self.today;
        }

        if let Err(e) = self.persist() {
            self.articles[index] = previous;
            return Err(e);
        }
        info!(%id, "guide updated");
        Ok(self.articles[index].clone())
    }

    pub fn delete(&mut self, id: ArticleId) -> Result<ArticleRecord> {
        let index = self.index_of(id)?;
        let removed = self.articles.remove(index);
        if let Err(e) = self.persist() {
            self.articles.insert(index, removed);
            return Err(e);
        }
        info!(%id, "guide deleted");
        Ok(removed)
    }

    /// 閲覧数を1増やす
    pub fn record_view(&mut self, id: ArticleId) -> Result<u32> {
        let index = self.index_of(id)?;
        let previous = self.articles[index].views;
        self.articles[index].views = previous.saturating_add(1);
        if let Err(e) = self.persist() {
            self.articles[index].views = previous;
            return Err(e);
        }
        debug!(%id, views = self.articles[index].views, "guide viewed");
        Ok(self.articles[index].views)
    }

    fn validate(title: &str, content: &str) -> Result<()> {
        let mut errors = Vec::new();
        if title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if content.trim().is_empty() {
            errors.push("Content is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HireBoardError::Validation(errors))
        }
    }

    fn next_id(&self) -> ArticleId {
        let max = self.articles.iter().map(|a| a.id.0).max().unwrap_or(0);
        ArticleId(max + 1)
    }

    fn index_of(&self, id: ArticleId) -> Result<usize> {
        self.articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(HireBoardError::ArticleNotFound(id.0))
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.articles)?;
        self.storage.write(ARTICLES_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    fn open() -> ArticleStore<MemoryStorage> {
        ArticleStore::open(MemoryStorage::new()).unwrap().with_today(today())
    }

    #[test]
    fn test_seeds_when_missing() {
        let store = open();
        assert_eq!(store.all().len(), 4);
    }

    #[test]
    fn test_reseeds_when_corrupt() {
        let mut storage = MemoryStorage::new();
        storage.write(ARTICLES_KEY, "{not json").unwrap();
        let store = ArticleStore::open(storage).unwrap();
        assert_eq!(store.all().len(), 4);
    }

    #[test]
    fn test_create_goes_first() {
        let mut store = open();
        let article = store
            .create("Culture Fit", ArticleCategory::BehavioralInterview, "Ask about teamwork.")
            .unwrap();
        assert_eq!(article.id, ArticleId(5));
        assert_eq!(article.author, "Interviewer");
        assert_eq!(article.views, 0);
        assert_eq!(article.created_at, today());
        assert_eq!(store.all()[0].id, article.id);
    }

    #[test]
    fn test_create_requires_title_and_content() {
        let mut store = open();
        let err = store.create("  ", ArticleCategory::BasicGuide, "").unwrap_err();
        match err {
            HireBoardError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.all().len(), 4);
    }

    #[test]
    fn test_update_bumps_updated_at() {
        let mut store = open();
        let created_at = store.get(ArticleId(2)).unwrap().created_at;
        let updated = store
            .update(ArticleId(2), "Coding Round", ArticleCategory::TechnicalInterview, "Pairing.")
            .unwrap();
        assert_eq!(updated.title, "Coding Round");
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.updated_at, today());
    }

    #[test]
    fn test_record_view_saturates() {
        let mut articles = sample_articles();
        articles[0].views = u32::MAX;
        let mut storage = MemoryStorage::new();
        storage
            .write(ARTICLES_KEY, &serde_json::to_string(&articles).unwrap())
            .unwrap();

        let mut store = ArticleStore::open(storage).unwrap();
        assert_eq!(store.record_view(ArticleId(1)).unwrap(), u32::MAX);
    }

    #[test]
    fn test_record_view_and_delete() {
        let mut store = open();
        assert_eq!(store.record_view(ArticleId(1)).unwrap(), 157);
        store.delete(ArticleId(1)).unwrap();
        assert!(store.get(ArticleId(1)).is_none());
        assert!(matches!(
            store.record_view(ArticleId(1)),
            Err(HireBoardError::ArticleNotFound(1))
        ));
    }
}
