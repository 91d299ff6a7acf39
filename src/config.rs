use crate::error::{HireBoardError, Result};
use hire_board_common::{SheetKind, DEFAULT_PREVIEW_ROWS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "HIRE_BOARD_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 候補者・ガイドの保存先（未設定なら OS 既定のデータディレクトリ）
    pub data_dir: Option<PathBuf>,
    pub preview_rows: usize,
    /// テンプレートの既定形式（未設定なら前回取り込んだ形式）
    pub template_format: Option<SheetKind>,
    pub last_import_format: Option<SheetKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            template_format: None,
            last_import_format: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| HireBoardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("hire-board").join("config.json"))
    }

    /// データディレクトリを解決
    ///
    /// 環境変数 → 設定ファイル → OS 既定の順。
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, from_env: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = from_env.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("hire-board"))
            .ok_or_else(|| HireBoardError::Config("データディレクトリが見つかりません".into()))
    }

    /// テンプレートの既定形式
    pub fn template_kind(&self) -> SheetKind {
        self.template_format
            .or(self.last_import_format)
            .unwrap_or_default()
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }

    /// 取り込んだ形式を記録（変化がなければ保存しない）
    pub fn remember_import_format(&mut self, kind: SheetKind) -> Result<()> {
        if self.last_import_format == Some(kind) {
            return Ok(());
        }
        self.last_import_format = Some(kind);
        self.save()
    }
}
