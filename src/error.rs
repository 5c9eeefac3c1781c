use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoseMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対応していない入力形式です: {0}")]
    UnsupportedInput(String),

    #[error("ブック読み込みエラー: {0}")]
    WorkbookRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("製品種別が一致しません: {0}")]
    KindMismatch(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] hose_match_common::Error),
}

pub type Result<T> = std::result::Result<T, HoseMatchError>;
