use clap::{Parser, Subcommand};
use hire_board_common::{
    ArticleCategory, ArticleId, ArticleSort, CandidateField, CandidateId, SheetKind, SortKey,
    Status,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hire-board")]
#[command(about = "候補者管理・スプレッドシート一括取り込みツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データディレクトリ（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// CSV/Excelファイルから候補者を一括取り込み
    Import {
        /// 取り込むファイル (.csv/.xlsx/.xls)
        #[arg(required = true)]
        file: PathBuf,

        /// マッピング確認を省略して取り込む（必須列がなければ "N/A"）
        #[arg(long)]
        auto: bool,

        /// 列マッピングを対話的に確認・修正
        #[arg(long, conflicts_with = "auto")]
        review: bool,

        /// 列マッピングを指定（例: --map "Mail=email"、"-" で解除）
        #[arg(short, long, value_name = "COLUMN=FIELD", conflicts_with = "auto")]
        map: Vec<MappingOverride>,

        /// 確認をすべて省略（重複があれば中止）
        #[arg(short, long)]
        yes: bool,

        /// 重複メールがあっても確認なしで取り込む
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// 取り込み用テンプレートを出力
    Template {
        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 形式 (csv/xlsx)。省略時は前回取り込んだ形式
        #[arg(short, long)]
        format: Option<SheetKind>,
    },

    /// 候補者一覧
    List {
        /// ステータスで絞り込み
        #[arg(short, long)]
        status: Option<Status>,

        /// 名前・メール・職種で検索
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// 並べ替え (date/name/position/status)
        #[arg(long, default_value = "date")]
        sort: SortKey,

        /// 昇順で表示
        #[arg(long)]
        asc: bool,
    },

    /// 候補者の詳細
    Show {
        id: CandidateId,
    },

    /// 候補者を手動登録
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        position: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        experience: Option<String>,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        status: Option<Status>,
    },

    /// ステータスを変更
    Status {
        id: CandidateId,
        status: Status,
    },

    /// 不採用にする（ステータスのみ変更）
    Reject {
        id: CandidateId,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 候補者を完全に削除
    Delete {
        id: CandidateId,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// ステータス別の集計
    Stats,

    /// サンプル候補者を投入（空の場合のみ）
    Seed,

    /// 面接ガイド
    Guides {
        #[command(subcommand)]
        command: GuideCommands,
    },

    /// 設定を表示/編集
    Config {
        /// データディレクトリを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// テンプレートの既定形式を設定 (csv/xlsx)
        #[arg(long)]
        set_template_format: Option<SheetKind>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum GuideCommands {
    /// ガイド一覧
    List {
        /// タイトル・本文で検索
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// カテゴリで絞り込み
        #[arg(short, long)]
        category: Option<ArticleCategory>,

        /// 並べ替え (newest/oldest/views/comments)
        #[arg(long, default_value = "newest")]
        sort: ArticleSort,
    },

    /// ガイドを表示（閲覧数を加算）
    Show {
        id: ArticleId,
    },

    /// ガイドを作成
    Add {
        #[arg(long)]
        title: String,

        #[arg(short, long, default_value = "basic")]
        category: ArticleCategory,

        /// 本文（Markdown）
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// 本文をファイルから読む
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// ガイドを編集（省略した項目は変更しない）
    Edit {
        id: ArticleId,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        category: Option<ArticleCategory>,

        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// ガイドを削除
    Delete {
        id: ArticleId,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },
}

/// `列名=フィールド` 形式のマッピング指定
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingOverride {
    pub column: String,
    /// None はマッピング解除
    pub field: Option<CandidateField>,
}

impl std::str::FromStr for MappingOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, field) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("Expected COLUMN=FIELD, got: {}", s))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(format!("Column name is empty: {}", s));
        }
        let field = match field.trim() {
            "" | "-" | "none" => None,
            other => Some(other.parse::<CandidateField>()?),
        };
        Ok(Self {
            column: column.to_string(),
            field,
        })
    }
}
