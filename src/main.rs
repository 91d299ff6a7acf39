use anyhow::Context;
use clap::Parser;
use hire_board::{cli, config, decoder, entry, error, review, storage, store, template};
use cli::{Cli, Commands, GuideCommands, MappingOverride};
use config::Config;
use error::HireBoardError;
use hire_board_common::{
    ArticleQuery, CandidateQuery, DecodedSheet, ImportSession, PipelineSummary, RowNormalizer,
};
use indicatif::{ProgressBar, ProgressStyle};
use review::{ConsolePrompt, DuplicatePolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::FileStorage;
use store::{ArticleStore, RecordStore};
use tracing_subscriber::EnvFilter;

/// ログレベルを指定する環境変数
const LOG_ENV: &str = "HIRE_BOARD_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    tracing::debug!(data_dir = %data_dir.display(), "data directory resolved");
    let storage = FileStorage::new(&data_dir);

    match cli.command {
        Commands::Import { file, auto, review: interactive, map, yes, allow_duplicates } => {
            println!("📥 hire-board - 一括取り込み\n");
            if !file.exists() {
                return Err(HireBoardError::FileNotFound(file.display().to_string()).into());
            }

            let mut store = RecordStore::open(storage)
                .with_context(|| format!("候補者データを開けません: {}", data_dir.display()))?;
            let policy = if allow_duplicates {
                DuplicatePolicy::Allow
            } else if yes {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::Ask
            };
            let mut prompt = ConsolePrompt::new(policy);
            let mut session =
                ImportSession::new(RowNormalizer::default()).with_preview_rows(config.preview_rows);

            println!("[1/3] ファイルを読み込み中...");
            let decoded = decode_with_spinner(file.clone()).await?;
            let kind = decoded.as_ref().ok().map(|sheet| sheet.kind);

            let count = if auto {
                println!("[2/3] 列を自動マッピング中...");
                session.auto_import(decoded, &mut store, &mut prompt)?
            } else {
                session.receive_file(decoded)?;
                println!("✔ {}行を検出\n", session.total_rows());

                println!("[2/3] 列マッピング");
                apply_overrides(&mut session, &map)?;
                if interactive {
                    review::review_mapping(&mut session)?;
                }
                review::print_mapping(session.mapping());
                session.proceed_to_preview()?;

                println!("\nプレビュー:");
                review::print_preview(session.preview(), session.total_rows());
                println!();

                if !yes && !review::confirm(&format!("{}件を取り込みますか？", session.total_rows()), true)? {
                    session.cancel()?;
                    println!("取り込みを中止しました");
                    return Ok(());
                }
                println!("[3/3] 取り込み中...");
                session.confirm_import(&mut store, &mut prompt)?
            };

            if let Some(kind) = kind {
                if let Err(e) = config.remember_import_format(kind) {
                    tracing::warn!(%e, "could not remember import format");
                }
            }
            println!("\n✅ {}件の候補者を取り込みました（合計 {}件）", count, store.len());
        }

        Commands::Template { output, format } => {
            let kind = format.unwrap_or_else(|| config.template_kind());
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let path = template::write_template(&output, kind)?;
            println!("✔ テンプレートを出力: {}", path.display());
        }

        Commands::List { status, search, sort, asc } => {
            let store = RecordStore::open(storage)?;
            let query = CandidateQuery {
                status,
                search,
                sort,
                descending: !asc,
            };
            let candidates = query.apply(store.all());
            if candidates.is_empty() {
                println!("該当する候補者はいません");
            }
            for c in &candidates {
                println!(
                    "{:>16}  {:<10} {:<24} {:<32} {:<20} {}",
                    c.id.to_string(),
                    c.status.label(),
                    c.name,
                    c.email,
                    c.position,
                    c.applied_date
                );
            }
            println!("\n{}件 / 全{}件", candidates.len(), store.len());
        }

        Commands::Show { id } => {
            let store = RecordStore::open(storage)?;
            let record = store.get(id).ok_or(HireBoardError::CandidateNotFound(id))?;
            review::print_candidate(record);
        }

        Commands::Add { name, email, position, phone, experience, source, status } => {
            let mut store = RecordStore::open(storage)?;
            let record = store.add(entry::NewCandidate {
                name,
                email,
                position,
                phone,
                experience,
                source,
                status,
            })?;
            println!("✔ 登録しました: {} ({})", record.name, record.id);
        }

        Commands::Status { id, status } => {
            let mut store = RecordStore::open(storage)?;
            let previous = store.update_status(id, status)?;
            println!("✔ {}: {} → {}", id, previous.label(), status.label());
        }

        Commands::Reject { id, yes } => {
            let mut store = RecordStore::open(storage)?;
            let name = store
                .get(id)
                .map(|c| c.name.clone())
                .ok_or(HireBoardError::CandidateNotFound(id))?;
            if !yes && !review::confirm(&format!("{} を不採用にしますか？", name), false)? {
                println!("中止しました");
                return Ok(());
            }
            store.reject(id)?;
            println!("✔ {} を不採用にしました", name);
        }

        Commands::Delete { id, yes } => {
            let mut store = RecordStore::open(storage)?;
            let name = store
                .get(id)
                .map(|c| c.name.clone())
                .ok_or(HireBoardError::CandidateNotFound(id))?;
            if !yes
                && !review::confirm(
                    &format!("{} を完全に削除しますか？（元に戻せません）", name),
                    false,
                )?
            {
                println!("中止しました");
                return Ok(());
            }
            store.delete(id)?;
            println!("✔ {} を削除しました", name);
        }

        Commands::Stats => {
            let store = RecordStore::open(storage)?;
            let summary = PipelineSummary::from_candidates(store.all());
            println!("候補者: {}件", summary.total);
            for (status, count) in &summary.by_status {
                println!("  {:<10} {}", status.label(), count);
            }
            println!("採用率: {:.1}%", summary.hire_rate());
            if !summary.by_position.is_empty() {
                println!("\n職種別:");
                for (position, count) in summary.by_position.iter().take(5) {
                    println!("  {:<24} {}", position, count);
                }
            }
        }

        Commands::Seed => {
            let mut store = RecordStore::open(storage)?;
            if store.seed_samples()? {
                println!("✔ サンプル候補者を{}件登録しました", store.len());
            } else {
                println!("候補者が既に登録されているため、サンプルは投入しません");
            }
        }

        Commands::Guides { command } => run_guides(command, storage)?,

        Commands::Config { set_data_dir, set_template_format, show } => {
            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir.clone())?;
                println!("✔ データディレクトリを設定しました: {}", dir.display());
            }

            if let Some(kind) = set_template_format {
                config.template_format = Some(kind);
                config.save()?;
                println!("✔ テンプレート形式を設定しました: {}", kind);
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  データディレクトリ: {}", data_dir.display());
                println!("  プレビュー行数: {}", config.preview_rows);
                println!("  テンプレート形式: {}", config.template_kind());
                println!(
                    "  前回の取り込み形式: {}",
                    config
                        .last_import_format
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "なし".into())
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 別スレッドでデコード（スピナー表示）
async fn decode_with_spinner(path: PathBuf) -> anyhow::Result<hire_board_common::Result<DecodedSheet>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(file_label(&path));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let decoded = tokio::task::spawn_blocking(move || decoder::decode_file(&path))
        .await
        .context("デコード処理が異常終了しました");
    spinner.finish_and_clear();
    decoded
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn apply_overrides(session: &mut ImportSession, overrides: &[MappingOverride]) -> error::Result<()> {
    for o in overrides {
        if !session.set_column_mapping(&o.column, o.field)? {
            println!("⚠ 列が見つかりません: {}", o.column);
        }
    }
    Ok(())
}

fn run_guides(command: GuideCommands, storage: FileStorage) -> error::Result<()> {
    let mut guides = ArticleStore::open(storage)?;

    match command {
        GuideCommands::List { search, category, sort } => {
            let query = ArticleQuery { search, category, sort };
            let articles = query.apply(guides.all());
            for a in &articles {
                println!(
                    "{:>4}  {:<22} {:<44} 👁 {:<5} 💬 {}",
                    a.id.to_string(),
                    a.category.label(),
                    a.title,
                    a.views,
                    a.comments
                );
            }
            println!("\n{}件", articles.len());
        }

        GuideCommands::Show { id } => {
            let views = guides.record_view(id)?;
            let article = guides
                .get(id)
                .ok_or(HireBoardError::ArticleNotFound(id.0))?;
            println!("{}  [{}]", article.title, article.category.label());
            println!(
                "{} · 作成 {} · 更新 {} · 閲覧 {}",
                article.author, article.created_at, article.updated_at, views
            );
            if !article.tags.is_empty() {
                println!("#{}", article.tags.join(" #"));
            }
            println!("\n{}", article.content);
        }

        GuideCommands::Add { title, category, content, file } => {
            let content = read_content(content, file)?.unwrap_or_default();
            let article = guides.create(&title, category, &content)?;
            println!("✔ ガイドを作成しました: {} ({})", article.title, article.id);
        }

        GuideCommands::Edit { id, title, category, content, file } => {
            let current = guides
                .get(id)
                .cloned()
                .ok_or(HireBoardError::ArticleNotFound(id.0))?;
            let content = read_content(content, file)?.unwrap_or(current.content);
            let article = guides.update(
                id,
                title.as_deref().unwrap_or(&current.title),
                category.unwrap_or(current.category),
                &content,
            )?;
            println!("✔ ガイドを更新しました: {}", article.title);
        }

        GuideCommands::Delete { id, yes } => {
            let title = guides
                .get(id)
                .map(|a| a.title.clone())
                .ok_or(HireBoardError::ArticleNotFound(id.0))?;
            if !yes && !review::confirm(&format!("「{}」を削除しますか？", title), false)? {
                println!("中止しました");
                return Ok(());
            }
            guides.delete(id)?;
            println!("✔ ガイドを削除しました: {}", title);
        }
    }

    Ok(())
}

fn read_content(inline: Option<String>, file: Option<PathBuf>) -> error::Result<Option<String>> {
    match (inline, file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => {
            if !path.exists() {
                return Err(HireBoardError::FileNotFound(path.display().to_string()));
            }
            Ok(Some(std::fs::read_to_string(path)?))
        }
        (None, None) => Ok(None),
    }
}
