//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use hose_match_rust::catalog;
use hose_match_rust::error::HoseMatchError;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = catalog::scan_page_files(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, HoseMatchError::FolderNotFound(_)));
}

/// 空のフォルダを読み込んだ場合
#[test]
fn test_load_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = catalog::load_pages(dir.path());

    // 空フォルダはエラーではなく空のVecを返す
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// ページファイルのないフォルダ
#[test]
fn test_folder_without_page_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.csv"), "a,b").unwrap();

    let files = catalog::scan_page_files(dir.path()).unwrap();
    assert!(files.is_empty());
}

/// 不正なJSON
#[test]
fn test_invalid_page_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("pages.json");
    std::fs::write(&path, "{ invalid }").unwrap();

    let err = catalog::load_pages(&path).unwrap_err();
    assert!(matches!(err, HoseMatchError::JsonParse(_)));
}

/// 壊れたブック
#[test]
fn test_broken_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalog.xlsx");
    std::fs::write(&path, b"not a zip").unwrap();

    let err = catalog::load_pages(&path).unwrap_err();
    assert!(matches!(err, HoseMatchError::WorkbookRead(_)));
}

/// HoseMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        HoseMatchError::Config("テスト設定エラー".to_string()),
        HoseMatchError::FileNotFound("pages.json".to_string()),
        HoseMatchError::FolderNotFound("/path/to/folder".to_string()),
        HoseMatchError::UnsupportedInput("pages.csv".to_string()),
        HoseMatchError::WorkbookRead("catalog.xlsx".to_string()),
        HoseMatchError::ExcelGeneration("Excel生成エラー".to_string()),
        HoseMatchError::KindMismatch("hose".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: HoseMatchError = io_err.into();

    assert!(matches!(err, HoseMatchError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: HoseMatchError = json_err.into();

    assert!(matches!(err, HoseMatchError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = hose_match_common::Error::Config("設定エラー".to_string());
    let err: HoseMatchError = common_err.into();

    assert!(matches!(err, HoseMatchError::Common(_)));
    assert_eq!(format!("{}", err), "Config error: 設定エラー");
}
