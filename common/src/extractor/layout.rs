//! テーブルレイアウト定義
//!
//! 仕入先・製品種別ごとに、表の識別シグネチャと列の位置決め方法を持つ。
//! 列は固定位置・見出し名・セル書式スキャンのいずれかで探す。

use crate::normalizer::{clean_text, normalize_decimal};
use crate::types::{PressureUnit, ProductKind, Supplier};
use regex::Regex;
use std::collections::HashSet;

/// 見出し領域として調べる先頭行数
pub const HEADER_SCAN_ROWS: usize = 5;

/// 抽出対象の列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Reference,
    ArticleNumber,
    Dn,
    InchSize,
    DashCode,
    InnerDiameter,
    OuterDiameter,
    WorkingPressure,
    BurstPressure,
    BendRadius,
    Weight,
    HoseSizeMm,
    ThreadSize,
    Identification,
    TubeOd,
}

/// セル書式（スキャン列・品番検証に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPattern {
    /// メーカー品番 "20.101.08"
    CatalogArticle,
    /// 販売店の品番（5〜7桁）
    ShopArticle,
    /// "-10"
    DashCode,
    /// 100未満の小数 "12,7"
    Millimetres,
    /// "1/2\""
    InchFraction,
}

impl CellPattern {
    pub fn matches(&self, text: &str) -> bool {
        lazy_static::lazy_static! {
            static ref CATALOG_ARTICLE_RE: Regex = Regex::new(r"^\d{2}\.\d{3,4}\.\d{2,4}[A-Z]?$").unwrap();
            static ref SHOP_ARTICLE_RE: Regex = Regex::new(r"^\d{5,7}$").unwrap();
            static ref DASH_RE: Regex = Regex::new(r"^-\s*\d{1,2}$").unwrap();
            static ref MM_RE: Regex = Regex::new(r"^\d+[.,]\d+$").unwrap();
            static ref INCH_RE: Regex = Regex::new(r#"^\d+(?:[-\s]\d+)?/\d+\s*"$"#).unwrap();
        }

        let text = text.trim();
        match self {
            CellPattern::CatalogArticle => CATALOG_ARTICLE_RE.is_match(text),
            CellPattern::ShopArticle => SHOP_ARTICLE_RE.is_match(text),
            CellPattern::DashCode => DASH_RE.is_match(text),
            CellPattern::Millimetres => {
                MM_RE.is_match(text) && normalize_decimal(text).is_some_and(|v| v < 100.0)
            }
            CellPattern::InchFraction => INCH_RE.is_match(text),
        }
    }
}

/// 列の位置決め方法
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locator {
    /// 固定の列番号
    Fixed(usize),
    /// 見出し名（いずれかに一致）
    Header(&'static [&'static str]),
    /// 行内でこの書式に一致する最初の未使用セル
    Scan(CellPattern),
}

/// テーブルレイアウト
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub name: &'static str,
    pub supplier: Supplier,
    pub kind: ProductKind,
    /// 各グループから最低1語が見出し領域に現れること
    pub signature: &'static [&'static [&'static str]],
    pub columns: &'static [(Field, Locator)],
    pub pressure_unit: PressureUnit,
    /// 品番セルの検証書式
    pub article_pattern: Option<CellPattern>,
    /// これより短い行は製品行として扱わない
    pub min_cells: usize,
    /// 品番の5文字目からシリーズを判定する
    pub series_from_article: bool,
}

const ARTICLE_HEADERS: &[&str] = &["ART. NR", "ART.NR", "ARTIKEL"];
const PRODUCT_HEADERS: &[&str] = &["PROD. NR", "PROD.NR", "PRODUKT"];

pub const CATALOG_HOSE: TableLayout = TableLayout {
    name: "catalog-hose",
    supplier: Supplier::A,
    kind: ProductKind::Hose,
    signature: &[&["REFERENCE", "REF."], &["DN"]],
    columns: &[
        (Field::Reference, Locator::Fixed(0)),
        (Field::ArticleNumber, Locator::Fixed(1)),
        (Field::Dn, Locator::Fixed(2)),
        (Field::InchSize, Locator::Fixed(3)),
        (Field::DashCode, Locator::Fixed(4)),
        (Field::InnerDiameter, Locator::Fixed(5)),
        (Field::OuterDiameter, Locator::Fixed(6)),
        (Field::WorkingPressure, Locator::Fixed(7)),
        (Field::BurstPressure, Locator::Fixed(8)),
        (Field::BendRadius, Locator::Fixed(10)),
        (Field::Weight, Locator::Fixed(11)),
    ],
    pressure_unit: PressureUnit::Mpa,
    article_pattern: None,
    min_cells: 8,
    series_from_article: false,
};

pub const SHOP_HOSE: TableLayout = TableLayout {
    name: "shop-hose",
    supplier: Supplier::B,
    kind: ProductKind::Hose,
    signature: &[&["DN"], ARTICLE_HEADERS],
    columns: &[
        (Field::Dn, Locator::Header(&["DN"])),
        (Field::DashCode, Locator::Header(&["ZOLL", "ZOLL-CODE", "DASH"])),
        (Field::InchSize, Locator::Header(&["INCH", "ZOLLMASS"])),
        (Field::InnerDiameter, Locator::Header(&["Ø INNEN", "INNEN", "ID"])),
        (Field::OuterDiameter, Locator::Header(&["Ø AUSSEN", "AUSSEN", "AD"])),
        (Field::BendRadius, Locator::Header(&["BIEGERADIUS", "BIEGE"])),
        (Field::BurstPressure, Locator::Header(&["BERSTDRUCK", "BERST"])),
        (Field::WorkingPressure, Locator::Header(&["BETRIEBSDRUCK", "ARBEITSDRUCK", "BETRIEB"])),
        (Field::Weight, Locator::Header(&["GEWICHT"])),
        (Field::Reference, Locator::Header(PRODUCT_HEADERS)),
        (Field::ArticleNumber, Locator::Header(ARTICLE_HEADERS)),
    ],
    pressure_unit: PressureUnit::Bar,
    article_pattern: Some(CellPattern::ShopArticle),
    min_cells: 0,
    series_from_article: false,
};

pub const CATALOG_FITTING: TableLayout = TableLayout {
    name: "catalog-fitting",
    supplier: Supplier::A,
    kind: ProductKind::Fitting,
    signature: &[&["REFERENCE", "REF.", "PART"], &["DASH", "HOSE", "INCH", "SIZE"]],
    columns: &[
        (Field::Reference, Locator::Header(&["REFERENCE", "REF.", "PART"])),
        (Field::ThreadSize, Locator::Header(&["THREAD", "GEWINDE"])),
        (Field::TubeOd, Locator::Header(&["TUBE"])),
        (Field::ArticleNumber, Locator::Scan(CellPattern::CatalogArticle)),
        (Field::DashCode, Locator::Scan(CellPattern::DashCode)),
        (Field::InchSize, Locator::Scan(CellPattern::InchFraction)),
        (Field::HoseSizeMm, Locator::Scan(CellPattern::Millimetres)),
    ],
    pressure_unit: PressureUnit::Mpa,
    article_pattern: Some(CellPattern::CatalogArticle),
    min_cells: 0,
    series_from_article: true,
};

pub const SHOP_FITTING: TableLayout = TableLayout {
    name: "shop-fitting",
    supplier: Supplier::B,
    kind: ProductKind::Fitting,
    signature: &[&["DN", "IDENT"], ARTICLE_HEADERS],
    columns: &[
        (Field::Dn, Locator::Header(&["DN"])),
        (Field::ThreadSize, Locator::Header(&["M", "GEWINDE", "THREAD"])),
        (Field::Identification, Locator::Header(&["IDENT", "FÜR", "FUER"])),
        (Field::TubeOd, Locator::Header(&["ROHR-AD", "ROHR"])),
        (Field::Reference, Locator::Header(PRODUCT_HEADERS)),
        (Field::ArticleNumber, Locator::Header(ARTICLE_HEADERS)),
    ],
    pressure_unit: PressureUnit::Bar,
    article_pattern: Some(CellPattern::ShopArticle),
    min_cells: 0,
    series_from_article: false,
};

/// 組み込みレイアウト一覧
pub fn builtin_layouts() -> Vec<TableLayout> {
    vec![CATALOG_HOSE, SHOP_HOSE, CATALOG_FITTING, SHOP_FITTING]
}

/// 見出しセルの単語（英数字以外で区切る）
fn words(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// 見出し語の一致判定（3文字以下は単語一致、それ以上は部分一致）
fn cell_matches(cell_upper: &str, token: &str) -> bool {
    if token.chars().count() <= 3 && token.chars().all(char::is_alphanumeric) {
        words(cell_upper).any(|w| w == token)
    } else {
        cell_upper.contains(token)
    }
}

fn upper_cells(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|c| c.as_deref().map(|s| s.trim().to_uppercase()).unwrap_or_default())
        .collect()
}

impl TableLayout {
    /// 行集合がシグネチャを満たすか
    fn signature_satisfied(&self, rows: &[Vec<String>]) -> bool {
        self.signature.iter().all(|group| {
            group
                .iter()
                .any(|token| rows.iter().flatten().any(|cell| cell_matches(cell, token)))
        })
    }

    fn row_hits(&self, cells: &[String]) -> usize {
        self.signature
            .iter()
            .flat_map(|group| group.iter())
            .filter(|token| cells.iter().any(|cell| cell_matches(cell, token)))
            .count()
    }

    /// 見出し行らしい行か（1行だけでシグネチャを満たす）
    pub fn is_header_row(&self, row: &[Option<String>]) -> bool {
        self.signature_satisfied(&[upper_cells(row)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Index(usize),
    Scan(CellPattern),
}

/// 表に当てはめたレイアウト
#[derive(Debug, Clone)]
pub struct ResolvedTable<'a> {
    pub layout: &'a TableLayout,
    columns: Vec<(Field, Column)>,
    /// データ行の開始位置（rows の添字）
    pub data_start: usize,
}

impl<'a> ResolvedTable<'a> {
    /// 見出し領域を調べてレイアウトを当てはめる。シグネチャ不一致なら None
    pub fn resolve(
        layout: &'a TableLayout,
        header: Option<&[Option<String>]>,
        rows: &[Vec<Option<String>>],
    ) -> Option<Self> {
        let (header_cells, data_start) = match header {
            Some(header) => {
                let cells = upper_cells(header);
                if !layout.signature_satisfied(std::slice::from_ref(&cells)) {
                    return None;
                }
                (cells, 0)
            }
            None => {
                let region: Vec<Vec<String>> = rows
                    .iter()
                    .take(HEADER_SCAN_ROWS)
                    .map(|r| upper_cells(r))
                    .collect();
                if !layout.signature_satisfied(&region) {
                    return None;
                }

                let hits: Vec<usize> = region.iter().map(|r| layout.row_hits(r)).collect();
                let last_hit = hits.iter().rposition(|&h| h > 0).unwrap_or(0);
                // 最も多く一致した行を見出し行とする（同数なら先の行）
                let mut best = 0;
                for (i, &h) in hits.iter().enumerate() {
                    if h > hits[best] {
                        best = i;
                    }
                }
                (region[best].clone(), last_hit + 1)
            }
        };

        let mut columns = Vec::new();
        for (field, locator) in layout.columns {
            let column = match locator {
                Locator::Fixed(index) => Some(Column::Index(*index)),
                Locator::Header(names) => find_header(&header_cells, names).map(Column::Index),
                Locator::Scan(pattern) => Some(Column::Scan(*pattern)),
            };
            if let Some(column) = column {
                columns.push((*field, column));
            }
        }

        Some(Self {
            layout,
            columns,
            data_start,
        })
    }

    /// 解決済みの列を持つか
    pub fn has_field(&self, field: Field) -> bool {
        self.columns.iter().any(|(f, _)| *f == field)
    }

    /// 1行を読み取る（固定・見出し列を先に、スキャン列は残りのセルから）
    pub fn read_row(&self, row: &[Option<String>]) -> RowCells {
        let cell = |i: usize| clean_text(row.get(i).and_then(|c| c.as_deref()));

        let mut values = Vec::new();
        let mut used = HashSet::new();

        for (field, column) in &self.columns {
            if let Column::Index(i) = column {
                used.insert(*i);
                if let Some(value) = cell(*i) {
                    values.push((*field, value.to_string()));
                }
            }
        }

        for (field, column) in &self.columns {
            if let Column::Scan(pattern) = column {
                let found = (0..row.len())
                    .filter(|i| !used.contains(i))
                    .find_map(|i| cell(i).filter(|v| pattern.matches(v)).map(|v| (i, v)));
                if let Some((i, value)) = found {
                    used.insert(i);
                    values.push((*field, value.to_string()));
                }
            }
        }

        let texts = row
            .iter()
            .filter_map(|c| clean_text(c.as_deref()))
            .map(String::from)
            .collect();

        RowCells {
            values,
            texts,
            len: row.len(),
        }
    }
}

fn find_header(cells: &[String], names: &[&str]) -> Option<usize> {
    // 完全一致を優先
    for name in names {
        if let Some(i) = cells.iter().position(|c| c == name) {
            return Some(i);
        }
    }
    for name in names {
        if let Some(i) = cells.iter().position(|c| cell_matches(c, name)) {
            return Some(i);
        }
    }
    None
}

/// 読み取った1行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowCells {
    values: Vec<(Field, String)>,
    /// 空でないセルの原文（行順）
    pub texts: Vec<String>,
    /// 元の行のセル数
    pub len: usize,
}

impl RowCells {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// 見出し・区切りの行か（識別子なし、文字を含むセルが2つ以下）
    pub fn is_section_row(&self) -> bool {
        let has_letters = self
            .texts
            .iter()
            .any(|t| t.chars().filter(|c| c.is_alphabetic()).count() >= 3);
        has_letters && self.texts.len() <= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    // ===== セル書式テスト =====

    #[test]
    fn test_cell_patterns() {
        assert!(CellPattern::CatalogArticle.matches("20.101.08"));
        assert!(CellPattern::CatalogArticle.matches("20.1110.1012A"));
        assert!(!CellPattern::CatalogArticle.matches("20101"));
        assert!(CellPattern::ShopArticle.matches("123456"));
        assert!(!CellPattern::ShopArticle.matches("1234"));
        assert!(CellPattern::DashCode.matches("-10"));
        assert!(!CellPattern::DashCode.matches("10"));
        assert!(CellPattern::Millimetres.matches("12,7"));
        assert!(!CellPattern::Millimetres.matches("120,5"));
        assert!(CellPattern::InchFraction.matches("1/2\""));
        assert!(CellPattern::InchFraction.matches("1-1/4\""));
    }

    // ===== 見出し一致テスト =====

    #[test]
    fn test_short_token_needs_whole_word() {
        assert!(cell_matches("DN", "DN"));
        assert!(cell_matches("DN (MM)", "DN"));
        assert!(!cell_matches("DNX", "DN"));
        assert!(cell_matches("ART. NR.", "ART. NR"));
    }

    #[test]
    fn test_resolve_without_signature_is_none() {
        let rows = vec![row(&["foo", "bar"]), row(&["1", "2"])];
        assert!(ResolvedTable::resolve(&CATALOG_HOSE, None, &rows).is_none());
    }

    #[test]
    fn test_resolve_fixed_columns_from_header_region() {
        let rows = vec![
            row(&["BALPAC IMPACTUS 2SN"]),
            row(&["REFERENCE", "ART", "DN", "INCH", "DASH", "ID", "OD", "WP", "BP"]),
            row(&["2SN-10", "100", "16", "5/8\"", "-10", "15,9", "26,0", "27,5", "110"]),
        ];
        let resolved = ResolvedTable::resolve(&CATALOG_HOSE, None, &rows).unwrap();
        assert_eq!(resolved.data_start, 2);

        let cells = resolved.read_row(&rows[2]);
        assert_eq!(cells.get(Field::Reference), Some("2SN-10"));
        assert_eq!(cells.get(Field::DashCode), Some("-10"));
        assert_eq!(cells.get(Field::WorkingPressure), Some("27,5"));
        assert_eq!(cells.get(Field::Weight), None);
    }

    #[test]
    fn test_resolve_header_names() {
        let header = row(&["DN", "Zoll", "Ø innen", "Ø aussen", "Betriebsdruck bar", "Art. Nr."]);
        let rows = vec![row(&["10", "10", "15,9", "26", "275", "123456"])];
        let resolved = ResolvedTable::resolve(&SHOP_HOSE, Some(header.as_slice()), &rows).unwrap();
        assert_eq!(resolved.data_start, 0);
        assert!(!resolved.has_field(Field::Weight));

        let cells = resolved.read_row(&rows[0]);
        assert_eq!(cells.get(Field::Dn), Some("10"));
        assert_eq!(cells.get(Field::InnerDiameter), Some("15,9"));
        assert_eq!(cells.get(Field::OuterDiameter), Some("26"));
        assert_eq!(cells.get(Field::WorkingPressure), Some("275"));
        assert_eq!(cells.get(Field::ArticleNumber), Some("123456"));
    }

    #[test]
    fn test_scan_columns_skip_used_cells() {
        let header = row(&["Reference", "Hose size", ""]);
        let rows = vec![row(&["20.101.08", "-8", "1/2\"", "12,7"])];
        let resolved = ResolvedTable::resolve(&CATALOG_FITTING, Some(header.as_slice()), &rows).unwrap();
        let cells = resolved.read_row(&rows[0]);
        // Reference列（0）は見出しで固定されるので品番スキャンの対象外
        assert_eq!(cells.get(Field::Reference), Some("20.101.08"));
        assert_eq!(cells.get(Field::ArticleNumber), None);
        assert_eq!(cells.get(Field::DashCode), Some("-8"));
        assert_eq!(cells.get(Field::InchSize), Some("1/2\""));
        assert_eq!(cells.get(Field::HoseSizeMm), Some("12,7"));
    }

    #[test]
    fn test_header_and_section_rows() {
        assert!(SHOP_HOSE.is_header_row(&row(&["DN", "Art. Nr."])));
        assert!(!SHOP_HOSE.is_header_row(&row(&["10", "123456"])));

        let resolved = ResolvedTable::resolve(
            &CATALOG_HOSE,
            Some(row(&["REFERENCE", "DN"]).as_slice()),
            &[],
        )
        .unwrap();
        let section = resolved.read_row(&row(&["BALPAC SUPERPRESS 4SP"]));
        assert!(section.is_section_row());
        let data = resolved.read_row(&row(&["4SP-10", "1", "16", "5/8\"", "-10"]));
        assert!(!data.is_section_row());
    }
}
