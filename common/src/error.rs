//! エラー型定義

use thiserror::Error;

/// 照合ライブラリのエラー
#[derive(Error, Debug)]
pub enum Error {
    /// 参照テーブルの構築失敗（正規表現など）
    #[error("Config error: {0}")]
    Config(String),

    /// レポートの書き出し失敗
    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("参照テーブルが不正です".to_string());
        assert_eq!(format!("{}", error), "Config error: 参照テーブルが不正です");
    }

    #[test]
    fn test_error_display_export() {
        let error = Error::Export("シート名設定エラー: 31文字を超えています".to_string());
        assert!(format!("{}", error).starts_with("Export error: シート名設定エラー"));
    }
}
