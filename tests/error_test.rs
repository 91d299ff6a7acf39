//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use hire_board::entry::NewCandidate;
use hire_board::error::HireBoardError;
use hire_board::storage::MemoryStorage;
use hire_board::store::RecordStore;
use hire_board_common::{CandidateId, Error};

/// HireBoardErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        HireBoardError::Config("テスト設定エラー".to_string()),
        HireBoardError::FileNotFound("people.csv".to_string()),
        HireBoardError::Validation(vec!["Name is required".to_string()]),
        HireBoardError::CandidateNotFound(CandidateId(42)),
        HireBoardError::ArticleNotFound(7),
        HireBoardError::Storage("書き込み失敗".to_string()),
        HireBoardError::Prompt("端末なし".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }
}

/// パイプラインのエラーはメッセージをそのまま表示
#[test]
fn test_import_error_passes_message_through() {
    let err: HireBoardError = Error::EmptyResult.into();
    assert_eq!(err.to_string(), "No data found in file.");
}

/// 検証エラーは全項目をまとめて表示
#[test]
fn test_validation_lists_every_field() {
    let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
    let err = store
        .add(NewCandidate {
            name: "A".into(),
            email: "not-an-email".into(),
            position: String::new(),
            phone: Some("phone me".into()),
            ..Default::default()
        })
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "入力エラー: Name must be at least 2 characters; Please enter a valid email address; Position is required; Please enter a valid phone number"
    );
    assert!(store.is_empty());
}

/// 存在しない候補者の操作
#[test]
fn test_unknown_candidate() {
    let mut store = RecordStore::open(MemoryStorage::new()).unwrap();
    assert!(matches!(
        store.reject(CandidateId(99)),
        Err(HireBoardError::CandidateNotFound(CandidateId(99)))
    ));
}
