//! レコード抽出モジュール
//!
//! カタログのページ（本文・属性・表）から製品レコードを作る。
//! 表はレイアウトのシグネチャで識別し、一致しない表は読み飛ばす。

pub mod context;
mod fitting;
mod hose;
pub mod layout;

pub use context::PageContext;
pub use layout::{CellPattern, Field, Locator, ResolvedTable, RowCells, TableLayout};

use crate::tables::ReferenceTables;
use crate::types::{Product, ProductKind, Supplier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 抽出元の表（見出しは任意）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTable {
    pub header: Option<Vec<Option<String>>>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// 抽出元のページ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPage {
    pub number: usize,
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub tables: Vec<RawTable>,
}

impl RawPage {
    /// 属性を名前で引く（大文字小文字・末尾の ':' を無視）
    pub fn attribute(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            self.attributes
                .iter()
                .find(|(key, _)| key.trim().trim_end_matches(':').eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
        })
    }
}

/// 抽出の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    pub pages: usize,
    pub pages_without_table: usize,
    pub tables_recognized: usize,
    pub rows_seen: usize,
    pub header_rows: usize,
    pub section_rows: usize,
    pub rows_dropped: usize,
    pub products: usize,
}

impl ExtractionStats {
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.pages += other.pages;
        self.pages_without_table += other.pages_without_table;
        self.tables_recognized += other.tables_recognized;
        self.rows_seen += other.rows_seen;
        self.header_rows += other.header_rows;
        self.section_rows += other.section_rows;
        self.rows_dropped += other.rows_dropped;
        self.products += other.products;
    }
}

/// 抽出結果
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub products: Vec<Product>,
    pub stats: ExtractionStats,
}

/// 仕入先・製品種別ごとの抽出器
pub struct Extractor<'a> {
    tables: &'a ReferenceTables,
    supplier: Supplier,
    kind: ProductKind,
}

impl<'a> Extractor<'a> {
    pub fn new(tables: &'a ReferenceTables, supplier: Supplier, kind: ProductKind) -> Self {
        Self {
            tables,
            supplier,
            kind,
        }
    }

    fn layouts(&self) -> impl Iterator<Item = &'a TableLayout> + '_ {
        self.tables
            .layouts
            .iter()
            .filter(move |l| l.supplier == self.supplier && l.kind == self.kind)
    }

    /// 1ページを抽出
    pub fn extract_page(&self, page: &RawPage) -> (Vec<Product>, ExtractionStats) {
        let mut stats = ExtractionStats {
            pages: 1,
            ..Default::default()
        };
        let mut products = Vec::new();
        let mut context = PageContext::from_page(page, self.kind, self.tables);

        for table in &page.tables {
            let resolved = self
                .layouts()
                .find_map(|layout| ResolvedTable::resolve(layout, table.header.as_deref(), &table.rows));
            let Some(resolved) = resolved else {
                continue;
            };
            stats.tables_recognized += 1;
            tracing::debug!(
                page = page.number,
                layout = resolved.layout.name,
                "表を認識しました"
            );

            for row in table.rows.iter().skip(resolved.data_start) {
                stats.rows_seen += 1;

                if resolved.layout.is_header_row(row) {
                    stats.header_rows += 1;
                    continue;
                }

                let cells = resolved.read_row(row);
                let product = if cells.len < resolved.layout.min_cells {
                    None
                } else {
                    match self.kind {
                        ProductKind::Hose => {
                            hose::build_hose(&cells, &context, page, resolved.layout, self.tables)
                                .map(Product::Hose)
                        }
                        ProductKind::Fitting => {
                            fitting::build_fitting(&cells, &context, page, resolved.layout, self.tables)
                                .map(Product::Fitting)
                        }
                    }
                };

                match product {
                    Some(product) => products.push(product),
                    None if cells.is_section_row() => {
                        stats.section_rows += 1;
                        context.absorb_section(&cells.texts, self.kind, self.tables);
                    }
                    None => {
                        if !cells.texts.is_empty() {
                            tracing::debug!(page = page.number, row = ?cells.texts, "行をスキップしました");
                        }
                        stats.rows_dropped += 1;
                    }
                }
            }
        }

        if stats.tables_recognized == 0 {
            stats.pages_without_table += 1;
            tracing::debug!(page = page.number, "認識できる表がありません");
        }
        stats.products = products.len();

        (products, stats)
    }

    /// 複数ページを抽出（ページ順を保つ）
    pub fn extract_pages(&self, pages: &[RawPage]) -> Extraction {
        let mut extraction = Extraction::default();
        for page in pages {
            let (products, stats) = self.extract_page(page);
            extraction.products.extend(products);
            extraction.stats.merge(&stats);
        }

        tracing::info!(
            supplier = %self.supplier,
            kind = %self.kind,
            pages = extraction.stats.pages,
            products = extraction.stats.products,
            dropped = extraction.stats.rows_dropped,
            "抽出完了"
        );
        extraction
    }
}
