//! テンプレート出力の統合テスト

use hire_board::decoder;
use hire_board::template::{self, TEMPLATE_HEADERS};
use hire_board_common::{ImportSession, ImportStage, RowNormalizer, SheetKind, Status};
use tempfile::tempdir;

#[test]
fn test_csv_template_decodes_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = template::write_template(dir.path(), SheetKind::Csv).unwrap();
    assert_eq!(path, dir.path().join("candidates_template.csv"));

    let sheet = decoder::decode_file(&path).unwrap();
    assert_eq!(sheet.columns, TEMPLATE_HEADERS.to_vec());
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet.rows[0]["Full Name"], "John Doe");
    assert_eq!(sheet.rows[1]["Phone"], "+1 (555) 987-6543");
}

#[test]
fn test_xlsx_template_decodes_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("mine.xlsx");
    let path = template::write_template(&output, SheetKind::Excel).unwrap();
    assert_eq!(path, output);

    let sheet = decoder::decode_file(&path).unwrap();
    assert_eq!(sheet.kind, SheetKind::Excel);
    assert_eq!(sheet.rows[1]["Source"], "Company Website");
}

/// テンプレートはそのまま取り込める
#[test]
fn test_template_imports_cleanly() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = template::write_template(dir.path(), SheetKind::Csv).unwrap();

    let mut session = ImportSession::new(RowNormalizer::default());
    session.receive_file(decoder::decode_file(&path)).unwrap();
    session.proceed_to_preview().unwrap();
    assert_eq!(session.stage(), ImportStage::Preview);

    let preview = session.preview();
    assert_eq!(preview[1].status, Status::Reviewing);
    assert_eq!(preview[0].position, "Software Engineer");
    assert_eq!(preview[0].applied_date.to_string(), "2025-01-15");
    assert_eq!(preview[1].source, "Company Website");
}
