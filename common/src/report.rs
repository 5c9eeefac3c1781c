//! 照合結果のレポート化
//!
//! 一致ごとに照合元・照合先の属性を並べたフラットな行を作る。
//! 行はスコアの高い順（同点は照合順のまま）。

use crate::matcher::MatchStats;
use crate::types::{FittingRecord, HoseRecord, Match, Product, ProductKind, Quality};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// セル値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    fn text(value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => {
                let s = v.to_string();
                if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s)
                }
            }
            None => CellValue::Empty,
        }
    }

    fn number(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }

    /// 表示用文字列
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// 列順を保持する1行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    cells: Vec<(String, CellValue)>,
}

impl ReportRow {
    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }
}

impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct ReportRowVisitor;

impl<'de> Visitor<'de> for ReportRowVisitor {
    type Value = ReportRow;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column names to cell values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ReportRow, A::Error> {
        let mut row = ReportRow::default();
        while let Some((column, value)) = access.next_entry::<String, CellValue>()? {
            row.push(column, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for ReportRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ReportRowVisitor)
    }
}

/// レポートの集計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub threshold: f64,
    pub stats: MatchStats,
    /// 品質区分ごとの件数
    pub by_quality: BTreeMap<String, usize>,
    pub average_score: f64,
}

/// 照合レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub kind: ProductKind,
    pub generated_at: String,
    /// 一致一覧の SHA-256
    pub fingerprint: String,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
}

const HOSE_COLUMNS: &[&str] = &[
    "Key",
    "Model",
    "DN",
    "Size mm",
    "Pressure MPa",
    "Standard",
    "Construction",
    "Inner diameter mm",
];

const FITTING_COLUMNS: &[&str] = &[
    "Key",
    "Model",
    "Product type",
    "DN",
    "Size mm",
    "Thread",
    "Angle",
    "Series",
    "Standard",
    "Seat",
    "Gender",
];

/// 種別ごとの属性列名
pub fn attribute_columns(kind: ProductKind) -> &'static [&'static str] {
    match kind {
        ProductKind::Hose => HOSE_COLUMNS,
        ProductKind::Fitting => FITTING_COLUMNS,
    }
}

fn hose_values(h: &HoseRecord) -> Vec<CellValue> {
    vec![
        CellValue::text(h.article_number.as_ref().or(h.reference.as_ref())),
        CellValue::text(h.model.as_ref()),
        CellValue::number(h.nominal_diameter.map(f64::from)),
        CellValue::number(h.size_mm),
        CellValue::number(h.working_pressure.map(|p| p.to_mpa())),
        CellValue::text(h.standard.as_ref().map(|s| s.tag())),
        CellValue::text(h.construction),
        CellValue::number(h.inner_diameter_mm),
    ]
}

fn fitting_values(f: &FittingRecord) -> Vec<CellValue> {
    vec![
        CellValue::text(f.article_number.as_ref().or(f.reference.as_ref())),
        CellValue::text(f.model.as_ref()),
        CellValue::text(f.product_type.as_ref()),
        CellValue::number(f.nominal_diameter.map(f64::from)),
        CellValue::number(f.size_mm),
        CellValue::text(f.thread_size.as_ref()),
        CellValue::text(f.angle),
        CellValue::text(f.series),
        CellValue::text(f.standard.as_ref().map(|s| s.tag())),
        CellValue::text(f.seat_type),
        CellValue::text(Some(f.gender)),
    ]
}

/// 参照先の製品を位置で引き、キーが一致するか確認する
fn lookup<'p>(products: &'p [Product], position: usize, key: Option<&str>) -> Option<&'p Product> {
    let product = products.get(position)?;
    if product.key() != key {
        tracing::warn!(position, ?key, "レポート対象の製品キーが一致しません");
        return None;
    }
    Some(product)
}

fn attribute_values(kind: ProductKind, product: Option<&Product>) -> Vec<CellValue> {
    let values = match (kind, product) {
        (ProductKind::Hose, Some(Product::Hose(h))) => Some(hose_values(h)),
        (ProductKind::Fitting, Some(Product::Fitting(f))) => Some(fitting_values(f)),
        _ => None,
    };
    values.unwrap_or_else(|| vec![CellValue::Empty; attribute_columns(kind).len()])
}

/// レポート行の全列名
pub fn report_columns(kind: ProductKind) -> Vec<String> {
    let attributes = attribute_columns(kind);
    let mut columns = Vec::new();
    for side in ["Source", "Target"] {
        columns.push(format!("{} supplier", side));
        columns.push(format!("{} position", side));
        columns.extend(attributes.iter().map(|c| format!("{} {}", side, c)));
    }
    columns.extend(["Score", "Quality", "Reasons", "Warnings"].map(String::from));
    columns
}

/// 一致一覧を行に変換（スコア降順、安定ソート）
pub fn project_matches(
    kind: ProductKind,
    matches: &[Match],
    source: &[Product],
    target: &[Product],
) -> Vec<ReportRow> {
    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));

    let attributes = attribute_columns(kind);
    ordered
        .into_iter()
        .map(|m| {
            let mut row = ReportRow::default();
            for (side, reference, products) in [
                ("Source", m.source(), source),
                ("Target", m.target(), target),
            ] {
                row.push(format!("{} supplier", side), CellValue::Text(reference.supplier.to_string()));
                row.push(format!("{} position", side), CellValue::Number(reference.position as f64));
                let product = lookup(products, reference.position, reference.key.as_deref());
                for (column, value) in attributes.iter().zip(attribute_values(kind, product)) {
                    row.push(format!("{} {}", side, column), value);
                }
            }
            row.push("Score", CellValue::Number(m.score()));
            row.push("Quality", CellValue::Text(m.quality().to_string()));
            row.push("Reasons", CellValue::Text(m.reasons().join("; ")));
            row.push("Warnings", CellValue::text(Some(m.warnings().join("; "))));
            row
        })
        .collect()
}

const QUALITY_ORDER: [Quality; 5] = [
    Quality::Excellent,
    Quality::VeryGood,
    Quality::Good,
    Quality::Fair,
    Quality::Possible,
];

/// 集計を作成
pub fn summarize(matches: &[Match], stats: &MatchStats, threshold: f64) -> ReportSummary {
    let mut by_quality = BTreeMap::new();
    for quality in QUALITY_ORDER {
        let count = matches.iter().filter(|m| m.quality() == quality).count();
        if count > 0 {
            by_quality.insert(quality.to_string(), count);
        }
    }

    let average_score = if matches.is_empty() {
        0.0
    } else {
        let total: f64 = matches.iter().map(|m| m.score()).sum();
        (total / matches.len() as f64 * 10.0).round() / 10.0
    };

    ReportSummary {
        threshold,
        stats: stats.clone(),
        by_quality,
        average_score,
    }
}
