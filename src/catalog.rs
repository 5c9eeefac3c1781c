//! カタログ入出力モジュール
//!
//! ページ入力（JSON / xlsx / フォルダ）の読み込みと、製品一覧の保存・読み込み。

use crate::error::{HoseMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use hose_match_common::{Extraction, Extractor, Product, ProductKind, RawPage, RawTable, ReferenceTables, Supplier};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn is_page_file(path: &Path) -> bool {
    let ext = extension_of(path);
    ext == "json" || WORKBOOK_EXTENSIONS.contains(&ext.as_str())
}

/// フォルダ直下のページファイルを列挙（ファイル名順）
pub fn scan_page_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(HoseMatchError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_page_file(p))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// ページ入力を読み込む（ファイルまたはフォルダ）
pub fn load_pages(path: &Path) -> Result<Vec<RawPage>> {
    if path.is_dir() {
        let mut pages = Vec::new();
        for file in scan_page_files(path)? {
            let offset = pages.len();
            let mut loaded = load_page_file(&file)?;
            // ページ番号が無い入力は通し番号を振る
            for (i, page) in loaded.iter_mut().enumerate() {
                if page.number == 0 {
                    page.number = offset + i + 1;
                }
            }
            pages.extend(loaded);
        }
        tracing::info!(folder = %path.display(), pages = pages.len(), "ページを読み込みました");
        return Ok(pages);
    }

    load_page_file(path)
}

fn load_page_file(path: &Path) -> Result<Vec<RawPage>> {
    if !path.exists() {
        return Err(HoseMatchError::FileNotFound(path.display().to_string()));
    }

    let ext = extension_of(path);
    if ext == "json" {
        let reader = BufReader::new(File::open(path)?);
        let pages: Vec<RawPage> = serde_json::from_reader(reader)?;
        tracing::debug!(file = %path.display(), pages = pages.len(), "JSONページ");
        Ok(pages)
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        load_workbook(path)
    } else {
        Err(HoseMatchError::UnsupportedInput(path.display().to_string()))
    }
}

/// セル値を文字列に（空セルは None）
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// ブックの各シートを1ページ（表1つ）として読む
pub fn load_workbook(path: &Path) -> Result<Vec<RawPage>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| HoseMatchError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut pages = Vec::new();

    for (index, sheet_name) in sheet_names.iter().enumerate() {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| HoseMatchError::WorkbookRead(format!("{} [{}]: {}", path.display(), sheet_name, e)))?;

        let rows: Vec<Vec<Option<String>>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(Option::is_some))
            .collect();

        if rows.is_empty() {
            tracing::debug!(sheet = %sheet_name, "空のシートをスキップ");
            continue;
        }

        pages.push(RawPage {
            number: index + 1,
            title: Some(sheet_name.clone()),
            tables: vec![RawTable { header: None, rows }],
            ..Default::default()
        });
    }

    tracing::debug!(file = %path.display(), pages = pages.len(), "ブックを読み込みました");
    Ok(pages)
}

/// ページ入力を読み込んで抽出
pub fn extract_catalog(
    path: &Path,
    supplier: Supplier,
    kind: ProductKind,
    tables: &ReferenceTables,
) -> Result<Extraction> {
    let pages = load_pages(path)?;
    Ok(Extractor::new(tables, supplier, kind).extract_pages(&pages))
}

/// 製品一覧をJSONで保存
pub fn save_products(products: &[Product], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, products)?;
    Ok(())
}

/// 製品一覧を読み込み
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    if !path.exists() {
        return Err(HoseMatchError::FileNotFound(path.display().to_string()));
    }
    let reader = BufReader::new(File::open(path)?);
    let products: Vec<Product> = serde_json::from_reader(reader)?;
    Ok(products)
}
