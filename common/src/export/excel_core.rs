//! Excel生成（共通ライブラリ）
//!
//! 照合レポートを「Matches」「Summary」の2シートに書き出す

use crate::error::{Error, Result};
use crate::gate::RejectReason;
use crate::report::{report_columns, CellValue, MatchReport};
use rust_xlsxwriter::*;

/// 書き出しエラーに文脈を付ける
fn export_error(context: &'static str) -> impl Fn(XlsxError) -> Error {
    move |e| Error::Export(format!("{}: {}", context, e))
}

/// 品質区分ごとの背景色
fn quality_color(quality: &str) -> Color {
    match quality {
        "Excellent" => Color::RGB(0xC6EFCE),
        "Very Good" => Color::RGB(0xDDEBF7),
        "Good" => Color::RGB(0xFFF2CC),
        "Fair" => Color::RGB(0xFCE4D6),
        _ => Color::RGB(0xEDEDED),
    }
}

/// 列幅（文字数）
fn column_width(column: &str) -> f64 {
    match column {
        "Reasons" | "Warnings" => 60.0,
        "Score" | "Quality" => 11.0,
        c if c.ends_with("position") || c.ends_with(" DN") => 9.0,
        _ => 16.0,
    }
}

/// レポートをExcelバッファに生成
pub fn generate_report_buffer(report: &MatchReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x305496))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(10.0)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let number_format = value_format.clone().set_num_format("0.0##");
    let label_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    // ===== Matches シート =====
    let columns = report_columns(report.kind);
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Matches")
        .map_err(export_error("シート名設定エラー"))?;

    for (col, name) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, name, &header_format)
            .map_err(export_error("見出し書き込みエラー"))?;
        worksheet.set_column_width(col, column_width(name))
            .map_err(export_error("列幅設定エラー"))?;
    }
    worksheet.set_row_height(0, 30)
        .map_err(export_error("行高さ設定エラー"))?;

    for (index, row) in report.rows.iter().enumerate() {
        let excel_row = index as u32 + 1;
        let quality = row.get("Quality").map(CellValue::display).unwrap_or_default();
        let quality_format = value_format.clone()
            .set_bold()
            .set_background_color(quality_color(&quality));

        // 列名に対応する値（欠けている列は空欄）
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            let format = if name == "Quality" { &quality_format } else { &value_format };
            match row.get(name) {
                Some(CellValue::Number(n)) => {
                    let format = if name == "Quality" { &quality_format } else { &number_format };
                    worksheet.write_number_with_format(excel_row, col, *n, format)
                        .map_err(export_error("値書き込みエラー"))?;
                }
                Some(CellValue::Text(s)) => {
                    worksheet.write_string_with_format(excel_row, col, s, format)
                        .map_err(export_error("値書き込みエラー"))?;
                }
                Some(CellValue::Empty) | None => {
                    worksheet.write_blank(excel_row, col, format)
                        .map_err(export_error("値書き込みエラー"))?;
                }
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(export_error("ウィンドウ枠固定エラー"))?;
    if !report.rows.is_empty() && !columns.is_empty() {
        worksheet.autofilter(0, 0, report.rows.len() as u32, columns.len() as u16 - 1)
            .map_err(export_error("フィルター設定エラー"))?;
    }

    // ===== Summary シート =====
    let summary = &report.summary;
    let stats = &summary.stats;
    let mut entries: Vec<(String, CellValue)> = vec![
        ("Kind".to_string(), CellValue::Text(report.kind.to_string())),
        ("Generated at".to_string(), CellValue::Text(report.generated_at.clone())),
        ("Fingerprint".to_string(), CellValue::Text(report.fingerprint.clone())),
        ("Threshold".to_string(), CellValue::Number(summary.threshold)),
        ("Source records".to_string(), CellValue::Number(stats.source_total as f64)),
        ("Target records".to_string(), CellValue::Number(stats.target_total as f64)),
        ("Pairs evaluated".to_string(), CellValue::Number(stats.pairs_evaluated as f64)),
        ("Matched".to_string(), CellValue::Number(stats.matched as f64)),
        ("Unmatched".to_string(), CellValue::Number(stats.unmatched as f64)),
        ("Below threshold".to_string(), CellValue::Number(stats.below_threshold as f64)),
        (
            "Targets claimed more than once".to_string(),
            CellValue::Number(stats.targets_claimed_multiple as f64),
        ),
        ("Average score".to_string(), CellValue::Number(summary.average_score)),
    ];
    for (quality, count) in &summary.by_quality {
        entries.push((format!("Quality: {}", quality), CellValue::Number(*count as f64)));
    }
    for reason in RejectReason::ALL {
        entries.push((
            format!("Rejected: {}", reason),
            CellValue::Number(stats.rejections.get(reason) as f64),
        ));
    }

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Summary")
        .map_err(export_error("シート名設定エラー"))?;
    worksheet.set_column_width(0, 34)
        .map_err(export_error("列幅設定エラー"))?;
    worksheet.set_column_width(1, 66)
        .map_err(export_error("列幅設定エラー"))?;

    for (index, (label, value)) in entries.iter().enumerate() {
        let row = index as u32;
        worksheet.write_string_with_format(row, 0, label, &label_format)
            .map_err(export_error("ラベル書き込みエラー"))?;
        match value {
            CellValue::Number(n) => {
                worksheet.write_number_with_format(row, 1, *n, &value_format)
                    .map_err(export_error("値書き込みエラー"))?;
            }
            other => {
                worksheet.write_string_with_format(row, 1, other.display(), &value_format)
                    .map_err(export_error("値書き込みエラー"))?;
            }
        }
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(export_error("Excel保存エラー"))
}
