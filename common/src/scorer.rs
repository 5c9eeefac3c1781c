//! 照合スコア計算
//!
//! 項目ごとに「両方一致なら満点、許容範囲内なら部分点、範囲外は0点＋警告、
//! 片方だけ欠損なら注記、両方欠損なら何もしない」という同じ型で採点する。
//! ホース/継手の違いは重み表だけ。

use crate::gate::{gate_fitting, gate_hose, GateDecision};
use crate::normalizer::round1;
use crate::types::{FittingRecord, Gender, HoseRecord, Quality, Standard, Supplier};

/// 1組の採点結果
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

/// 相対差の許容範囲と配点（小さい順）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub max_relative_diff: f64,
    pub points: f64,
}

/// スコア -> 品質区分（下限の高い順）
#[derive(Debug, Clone, PartialEq)]
pub struct QualityBands {
    pub bands: Vec<(f64, Quality)>,
    pub floor: Quality,
}

impl QualityBands {
    pub fn quality(&self, score: f64) -> Quality {
        self.bands
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, q)| *q)
            .unwrap_or(self.floor)
    }
}

/// ホースの重み表（合計100）
#[derive(Debug, Clone, PartialEq)]
pub struct HoseWeights {
    pub dn_exact: f64,
    pub dn_close: f64,
    pub dn_close_mm: f64,
    /// 片側だけダッシュ表サイズのとき、呼び径との差をこの範囲で一致とみなす
    pub dn_nominal_mm: f64,
    pub pressure: Vec<Tolerance>,
    pub standard: f64,
    pub standard_partial: f64,
    pub construction_exact: f64,
    pub inner_diameter: Vec<Tolerance>,
    pub quality: QualityBands,
}

impl Default for HoseWeights {
    fn default() -> Self {
        Self {
            dn_exact: 30.0,
            dn_close: 15.0,
            dn_close_mm: 2.0,
            dn_nominal_mm: 1.0,
            pressure: vec![
                Tolerance { max_relative_diff: 0.05, points: 25.0 },
                Tolerance { max_relative_diff: 0.15, points: 15.0 },
                Tolerance { max_relative_diff: 0.30, points: 8.0 },
            ],
            standard: 20.0,
            standard_partial: 10.0,
            construction_exact: 15.0,
            inner_diameter: vec![
                Tolerance { max_relative_diff: 0.05, points: 10.0 },
                Tolerance { max_relative_diff: 0.15, points: 5.0 },
            ],
            quality: QualityBands {
                bands: vec![
                    (80.0, Quality::Excellent),
                    (60.0, Quality::Good),
                    (40.0, Quality::Fair),
                ],
                floor: Quality::Possible,
            },
        }
    }
}

/// 継手の重み表（合計100）。オス/メスは検証のみ
#[derive(Debug, Clone, PartialEq)]
pub struct FittingWeights {
    pub angle: f64,
    pub series: f64,
    pub standard_family: f64,
    pub dn_exact: f64,
    pub dn_exact_mm: f64,
    pub dn_close: f64,
    pub dn_close_mm: f64,
    pub dn_nominal_mm: f64,
    pub seat: f64,
    pub quality: QualityBands,
}

impl Default for FittingWeights {
    fn default() -> Self {
        Self {
            angle: 20.0,
            series: 20.0,
            standard_family: 30.0,
            dn_exact: 25.0,
            dn_exact_mm: 0.5,
            dn_close: 12.0,
            dn_close_mm: 2.0,
            dn_nominal_mm: 1.0,
            seat: 5.0,
            quality: QualityBands {
                bands: vec![
                    (90.0, Quality::Excellent),
                    (75.0, Quality::VeryGood),
                    (60.0, Quality::Good),
                ],
                floor: Quality::Fair,
            },
        }
    }
}

/// 照合できるレコード
pub trait Comparable {
    type Weights: Default + Sync;

    /// 既定のしきい値（以上で一致）
    const DEFAULT_THRESHOLD: f64;

    fn supplier(&self) -> Supplier;
    fn key(&self) -> Option<&str>;
    fn gate(&self, other: &Self) -> GateDecision;
    fn score(&self, other: &Self, weights: &Self::Weights) -> Evaluation;
    fn quality(score: f64, weights: &Self::Weights) -> Quality;
}

/// 両側の値の有無
pub enum Pair<T> {
    Both(T, T),
    OneSide,
    Neither,
}

pub fn pair<T>(a: Option<T>, b: Option<T>) -> Pair<T> {
    match (a, b) {
        (Some(a), Some(b)) => Pair::Both(a, b),
        (None, None) => Pair::Neither,
        _ => Pair::OneSide,
    }
}

/// 相対差（大きい方を基準）
pub fn relative_diff(a: f64, b: f64) -> f64 {
    let base = a.abs().max(b.abs());
    if base == 0.0 {
        0.0
    } else {
        (a - b).abs() / base
    }
}

/// 採点シート
#[derive(Debug, Default)]
pub struct ScoreSheet {
    score: f64,
    reasons: Vec<String>,
    warnings: Vec<String>,
}

impl ScoreSheet {
    pub fn award(&mut self, points: f64, reason: impl Into<String>) {
        self.score += points;
        self.reasons.push(reason.into());
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// 片方だけ欠損している項目の注記
    pub fn missing(&mut self, label: &str) {
        self.warn(format!("{} missing on one side", label));
    }

    /// 相対差の許容範囲表で採点
    pub fn tolerance(&mut self, label: &str, a: f64, b: f64, unit: &str, table: &[Tolerance]) {
        let diff = relative_diff(a, b);
        match table.iter().position(|t| diff <= t.max_relative_diff) {
            Some(0) => self.award(table[0].points, format!("{} match ({}{})", label, a, unit)),
            Some(i) => self.award(
                table[i].points,
                format!("{} close ({}{} vs {}{})", label, a, unit, b, unit),
            ),
            None => self.warn(format!("{} differs ({}{} vs {}{})", label, a, unit, b, unit)),
        }
    }

    pub fn finish(self) -> Evaluation {
        Evaluation {
            score: round1(self.score.clamp(0.0, 100.0)),
            reasons: self.reasons,
            warnings: self.warnings,
        }
    }
}

/// ホース規格の比較（EN番号 > SAE R番号 > タグ）
fn score_hose_standard(sheet: &mut ScoreSheet, a: &Standard, b: &Standard, weights: &HoseWeights) {
    if let (Some(x), Some(y)) = (a.en_number(), b.en_number()) {
        if x == y {
            sheet.award(weights.standard, format!("Standard match (EN {})", x));
        } else if matches!((x, y), (853, 857) | (857, 853)) {
            sheet.award(weights.standard_partial, format!("Standard compatible (EN {} / EN {})", x, y));
            sheet.warn(format!("Standard differs (EN {} vs EN {})", x, y));
        } else {
            sheet.warn(format!("Standard differs (EN {} vs EN {})", x, y));
        }
        return;
    }

    if let (Some(x), Some(y)) = (a.sae_r_number(), b.sae_r_number()) {
        if x == y {
            sheet.award(weights.standard, format!("Standard match (SAE 100R{})", x));
        } else {
            sheet.warn(format!("Standard differs (SAE 100R{} vs SAE 100R{})", x, y));
        }
        return;
    }

    let (ta, tb) = (a.tag(), b.tag());
    if ta == tb {
        sheet.award(weights.standard, format!("Standard match ({})", ta));
    } else if a.family == b.family && (ta.contains(&tb) || tb.contains(&ta)) {
        sheet.award(weights.standard_partial, format!("Standard partial ({} / {})", ta, tb));
    } else {
        sheet.warn(format!("Standard differs ({} vs {})", ta, tb));
    }
}

/// 片側だけダッシュコードを持つ組は、ダッシュ表サイズと呼び径の比較になる
fn nominal_tolerance(a: Option<u8>, b: Option<u8>, nominal_mm: f64) -> f64 {
    if a.is_some() != b.is_some() {
        nominal_mm
    } else {
        0.0
    }
}

fn record_key<'a>(article: &'a Option<String>, reference: &'a Option<String>) -> Option<&'a str> {
    article
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| reference.as_deref().filter(|s| !s.is_empty()))
}

impl Comparable for HoseRecord {
    type Weights = HoseWeights;

    const DEFAULT_THRESHOLD: f64 = 30.0;

    fn supplier(&self) -> Supplier {
        HoseRecord::supplier(self)
    }

    fn key(&self) -> Option<&str> {
        record_key(&self.article_number, &self.reference)
    }

    fn gate(&self, other: &Self) -> GateDecision {
        gate_hose(self, other)
    }

    fn score(&self, other: &Self, weights: &HoseWeights) -> Evaluation {
        let mut sheet = ScoreSheet::default();

        match pair(self.comparable_size_mm(), other.comparable_size_mm()) {
            Pair::Both(a, b) => {
                let (a, b) = (round1(a), round1(b));
                let nominal = nominal_tolerance(self.dash_code, other.dash_code, weights.dn_nominal_mm);
                if a == b || (a - b).abs() <= nominal {
                    sheet.award(weights.dn_exact, format!("DN match ({} mm)", a));
                } else if (a - b).abs() <= weights.dn_close_mm {
                    sheet.award(weights.dn_close, format!("DN close ({} mm vs {} mm)", a, b));
                } else {
                    sheet.warn(format!("DN differs ({} mm vs {} mm)", a, b));
                }
            }
            Pair::OneSide => sheet.missing("DN"),
            Pair::Neither => {}
        }

        match pair(
            self.working_pressure.map(|p| p.to_mpa()),
            other.working_pressure.map(|p| p.to_mpa()),
        ) {
            Pair::Both(a, b) => sheet.tolerance("Pressure", round1(a), round1(b), " MPa", &weights.pressure),
            Pair::OneSide => sheet.missing("Pressure"),
            Pair::Neither => {}
        }

        match pair(self.standard.as_ref(), other.standard.as_ref()) {
            Pair::Both(a, b) => score_hose_standard(&mut sheet, a, b, weights),
            Pair::OneSide => sheet.missing("Standard"),
            Pair::Neither => {}
        }

        match pair(self.construction, other.construction) {
            Pair::Both(a, b) if a == b => {
                sheet.award(weights.construction_exact, format!("Construction match ({})", a))
            }
            Pair::Both(a, b) => sheet.warn(format!("Construction differs ({} vs {})", a, b)),
            Pair::OneSide => sheet.missing("Construction"),
            Pair::Neither => {}
        }

        match pair(self.inner_diameter_mm, other.inner_diameter_mm) {
            Pair::Both(a, b) => sheet.tolerance("Inner diameter", a, b, " mm", &weights.inner_diameter),
            Pair::OneSide => sheet.missing("Inner diameter"),
            Pair::Neither => {}
        }

        sheet.finish()
    }

    fn quality(score: f64, weights: &HoseWeights) -> Quality {
        weights.quality.quality(score)
    }
}

impl Comparable for FittingRecord {
    type Weights = FittingWeights;

    const DEFAULT_THRESHOLD: f64 = 60.0;

    fn supplier(&self) -> Supplier {
        FittingRecord::supplier(self)
    }

    fn key(&self) -> Option<&str> {
        record_key(&self.article_number, &self.reference)
    }

    fn gate(&self, other: &Self) -> GateDecision {
        gate_fitting(self, other)
    }

    fn score(&self, other: &Self, weights: &FittingWeights) -> Evaluation {
        let mut sheet = ScoreSheet::default();

        match pair(self.angle, other.angle) {
            Pair::Both(a, b) if a == b => sheet.award(weights.angle, format!("Angle match ({})", a)),
            Pair::Both(a, b) => sheet.warn(format!("Angle differs ({} vs {})", a, b)),
            Pair::OneSide => sheet.missing("Angle"),
            Pair::Neither => {}
        }

        match pair(self.series, other.series) {
            Pair::Both(a, b) if a == b => sheet.award(weights.series, format!("Series match ({})", a)),
            Pair::Both(a, b) => sheet.warn(format!("Series differs ({} vs {})", a, b)),
            Pair::OneSide => sheet.missing("Series"),
            Pair::Neither => {}
        }

        match pair(self.standard.as_ref(), other.standard.as_ref()) {
            Pair::Both(a, b) if a.family == b.family => sheet.award(
                weights.standard_family,
                format!("Standard family match ({})", a.family),
            ),
            Pair::Both(a, b) => sheet.warn(format!("Standard differs ({} vs {})", a, b)),
            Pair::OneSide => sheet.missing("Standard"),
            Pair::Neither => {}
        }

        match pair(self.comparable_size_mm(), other.comparable_size_mm()) {
            Pair::Both(a, b) => {
                let diff = (a - b).abs();
                let exact_mm = weights
                    .dn_exact_mm
                    .max(nominal_tolerance(self.dash_code, other.dash_code, weights.dn_nominal_mm));
                if diff <= exact_mm {
                    sheet.award(weights.dn_exact, format!("Size match ({} mm)", round1(a)));
                } else if diff <= weights.dn_close_mm {
                    sheet.award(
                        weights.dn_close,
                        format!("Size close ({} mm vs {} mm)", round1(a), round1(b)),
                    );
                } else {
                    sheet.warn(format!("Size differs ({} mm vs {} mm)", round1(a), round1(b)));
                }
            }
            Pair::OneSide => sheet.missing("Size"),
            Pair::Neither => {}
        }

        match pair(self.seat_type, other.seat_type) {
            Pair::Both(a, b) if a == b => sheet.award(weights.seat, format!("Seat match ({})", a)),
            Pair::Both(a, b) => sheet.warn(format!("Seat differs ({} vs {})", a, b)),
            Pair::OneSide => sheet.missing("Seat"),
            Pair::Neither => {}
        }

        if self.gender != Gender::Unknown && other.gender != Gender::Unknown && self.gender != other.gender {
            sheet.warn(format!("Gender differs ({} vs {})", self.gender, other.gender));
        }

        sheet.finish()
    }

    fn quality(score: f64, weights: &FittingWeights) -> Quality {
        weights.quality.quality(score)
    }
}
