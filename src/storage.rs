//! 端末ローカルのキー/値ストレージ
//!
//! キーごとに1つのJSONファイルを保存する。
//! ブラウザの localStorage と同じく、値は文字列（シリアライズ済み配列）。

use crate::error::{HireBoardError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 候補者一覧のキー
pub const CANDIDATES_KEY: &str = "ats_candidates";
/// 面接ガイド一覧のキー
pub const ARTICLES_KEY: &str = "interview_articles";

/// キー/値ストレージ
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// ディレクトリ配下に `<key>.json` として保存
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        debug!(path = %path.display(), bytes = content.len(), "storage read");
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| HireBoardError::Storage(format!("{}: {}", self.dir.display(), e)))?;

        // 一時ファイルに書いてから置き換える
        let path = self.path_for(key);
        let temp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&temp, value)
            .map_err(|e| HireBoardError::Storage(format!("{}: {}", temp.display(), e)))?;
        fs::rename(&temp, &path)
            .map_err(|e| HireBoardError::Storage(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = value.len(), "storage written");
        Ok(())
    }
}

/// メモリ上のストレージ（組み込み・テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path());
        assert!(storage.read(CANDIDATES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.write(ARTICLES_KEY, "[]").unwrap();

        assert_eq!(storage.read(ARTICLES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(storage.path_for(ARTICLES_KEY).exists());
        assert!(!dir.path().join("nested").join(".interview_articles.json.tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut storage = MemoryStorage::new();
        storage.write(CANDIDATES_KEY, "[1]").unwrap();
        storage.write(ARTICLES_KEY, "[2]").unwrap();
        assert_eq!(storage.read(CANDIDATES_KEY).unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.read(ARTICLES_KEY).unwrap().as_deref(), Some("[2]"));
    }
}
