//! Excel生成（CLI版）
//!
//! 共通ライブラリで生成したバッファをファイルに書き出す

use crate::error::{HoseMatchError, Result};
use hose_match_common::export::excel_core::generate_report_buffer;
use hose_match_common::MatchReport;
use std::path::Path;

pub fn generate_excel(report: &MatchReport, output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(report).map_err(|e| HoseMatchError::ExcelGeneration(e.to_string()))?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, buffer)
        .map_err(|e| HoseMatchError::ExcelGeneration(format!("ファイル保存エラー: {}", e)))?;

    tracing::debug!(path = %output_path.display(), rows = report.rows.len(), "Excelを書き出しました");
    Ok(())
}
