//! 製品レコードの型定義
//!
//! 2つのカタログ（供給元A: メーカーPDFカタログ / 供給元B: 販売店ショップ）で共有される型:
//! - Product: ホース/継手のタグ付きレコード
//! - Standard, Construction, Angle, Series など: 正規化済みの閉じた語彙
//! - Match: マッチャーだけが生成する照合結果

use serde::{Deserialize, Serialize};
use std::fmt;

/// カタログの供給元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Supplier {
    /// メーカーカタログ（PDF由来）
    A,
    /// 販売店カタログ（ショップ由来）
    B,
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Supplier::A => write!(f, "A"),
            Supplier::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Supplier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "catalog" | "manufacturer" => Ok(Supplier::A),
            "b" | "shop" | "distributor" => Ok(Supplier::B),
            _ => Err(format!("Unknown supplier: {}. Use a or b", s)),
        }
    }
}

/// 製品の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    #[default]
    Hose,
    Fitting,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductKind::Hose => write!(f, "hose"),
            ProductKind::Fitting => write!(f, "fitting"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hose" | "hoses" => Ok(ProductKind::Hose),
            "fitting" | "fittings" => Ok(ProductKind::Fitting),
            _ => Err(format!("Unknown kind: {}. Use hose or fitting", s)),
        }
    }
}

// ============================================
// 単位付き数値
// ============================================

/// 圧力の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    Mpa,
    Bar,
    Psi,
}

/// 単位付きの圧力値。比較は必ず `to_mpa()` を通す
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pressure {
    pub value: f64,
    pub unit: PressureUnit,
}

impl Pressure {
    pub fn mpa(value: f64) -> Self {
        Self { value, unit: PressureUnit::Mpa }
    }

    pub fn bar(value: f64) -> Self {
        Self { value, unit: PressureUnit::Bar }
    }

    pub fn psi(value: f64) -> Self {
        Self { value, unit: PressureUnit::Psi }
    }

    /// MPaに換算
    pub fn to_mpa(&self) -> f64 {
        match self.unit {
            PressureUnit::Mpa => self.value,
            PressureUnit::Bar => self.value / 10.0,
            PressureUnit::Psi => self.value * 0.006_894_757,
        }
    }

    /// barに換算
    pub fn to_bar(&self) -> f64 {
        self.to_mpa() * 10.0
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            PressureUnit::Mpa => "MPa",
            PressureUnit::Bar => "bar",
            PressureUnit::Psi => "psi",
        };
        write!(f, "{} {}", self.value, unit)
    }
}

// ============================================
// 閉じた語彙
// ============================================

/// 規格ファミリー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StandardFamily {
    En,
    Sae,
    Iso,
    Jis,
    Bsp,
    Npt,
    Jic,
    Orfs,
    Din,
    Komatsu,
    Caterpillar,
}

impl fmt::Display for StandardFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StandardFamily::En => "EN",
            StandardFamily::Sae => "SAE",
            StandardFamily::Iso => "ISO",
            StandardFamily::Jis => "JIS",
            StandardFamily::Bsp => "BSP",
            StandardFamily::Npt => "NPT",
            StandardFamily::Jic => "JIC",
            StandardFamily::Orfs => "ORFS",
            StandardFamily::Din => "DIN",
            StandardFamily::Komatsu => "KOMATSU",
            StandardFamily::Caterpillar => "CATERPILLAR",
        };
        write!(f, "{}", s)
    }
}

/// 正規化済みの規格（ファミリー + 番号トークン）
///
/// `code` は正規表現で切り出した番号のみ（"853", "100R2", "8434-1", "J518"）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Standard {
    pub family: StandardFamily,
    pub code: Option<String>,
}

impl Standard {
    pub fn new(family: StandardFamily, code: Option<&str>) -> Self {
        Self {
            family,
            code: code.map(|c| c.to_string()),
        }
    }

    /// "EN-853", "SAE-100R2", "BSP" 形式のタグ
    pub fn tag(&self) -> String {
        match &self.code {
            Some(code) => format!("{}-{}", self.family, code),
            None => self.family.to_string(),
        }
    }

    /// EN番号（"853"）を数値で取得
    pub fn en_number(&self) -> Option<u32> {
        if self.family != StandardFamily::En {
            return None;
        }
        self.code.as_deref().and_then(|c| c.parse().ok())
    }

    /// SAE 100R番号（"100R2" -> 2）
    pub fn sae_r_number(&self) -> Option<u32> {
        if self.family != StandardFamily::Sae {
            return None;
        }
        let code = self.code.as_deref()?;
        let (_, r) = code.split_once('R')?;
        r.parse().ok()
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// ホースの補強構造
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Construction {
    #[serde(rename = "spiral wire")]
    SpiralWire,
    #[serde(rename = "1 wire braid")]
    OneWireBraid,
    #[serde(rename = "2 wire braid")]
    TwoWireBraid,
    #[default]
    #[serde(rename = "wire braid")]
    WireBraid,
    #[serde(rename = "textile braid")]
    TextileBraid,
    #[serde(rename = "thermoplastic")]
    Thermoplastic,
}

/// 補強構造の系統（ゲート判定用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructionFamily {
    Wire,
    Spiral,
    Textile,
    Thermoplastic,
}

impl Construction {
    pub fn family(&self) -> ConstructionFamily {
        match self {
            Construction::SpiralWire => ConstructionFamily::Spiral,
            Construction::OneWireBraid | Construction::TwoWireBraid | Construction::WireBraid => {
                ConstructionFamily::Wire
            }
            Construction::TextileBraid => ConstructionFamily::Textile,
            Construction::Thermoplastic => ConstructionFamily::Thermoplastic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Construction::SpiralWire => "spiral wire",
            Construction::OneWireBraid => "1 wire braid",
            Construction::TwoWireBraid => "2 wire braid",
            Construction::WireBraid => "wire braid",
            Construction::TextileBraid => "textile braid",
            Construction::Thermoplastic => "thermoplastic",
        }
    }
}

impl fmt::Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 継手の角度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Angle {
    #[serde(rename = "straight")]
    Straight,
    #[serde(rename = "45°")]
    Deg45,
    #[serde(rename = "90°")]
    Deg90,
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Straight => write!(f, "Straight"),
            Angle::Deg45 => write!(f, "45°"),
            Angle::Deg90 => write!(f, "90°"),
        }
    }
}

/// ISO 8434-1 24°コーンのシリーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    #[serde(rename = "L")]
    Light,
    #[serde(rename = "S")]
    Heavy,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Light => write!(f, "L"),
            Series::Heavy => write!(f, "S"),
        }
    }
}

/// シール形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeatType {
    /// コーン（角度）
    Cone(u8),
    FlatFace,
    ORing,
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatType::Cone(deg) => write!(f, "{}° Cone", deg),
            SeatType::FlatFace => write!(f, "Flat Face"),
            SeatType::ORing => write!(f, "O-Ring"),
        }
    }
}

/// 継手のオス/メス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Unknown => write!(f, "Unknown"),
        }
    }
}

/// ねじ系統
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreadFamily {
    Metric,
    Bsp,
    Npt,
    Jic,
    Orfs,
    Jis,
    Sae,
}

impl fmt::Display for ThreadFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreadFamily::Metric => "Metric",
            ThreadFamily::Bsp => "BSP",
            ThreadFamily::Npt => "NPT",
            ThreadFamily::Jic => "JIC",
            ThreadFamily::Orfs => "ORFS",
            ThreadFamily::Jis => "JIS",
            ThreadFamily::Sae => "SAE",
        };
        write!(f, "{}", s)
    }
}

/// 継手の接続形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionShape {
    Straight,
    Elbow,
    Tee,
    Cross,
    Adapter,
    Flange,
    Ferrule,
}

impl fmt::Display for ConnectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionShape::Straight => "Straight",
            ConnectionShape::Elbow => "Elbow",
            ConnectionShape::Tee => "Tee",
            ConnectionShape::Cross => "Cross",
            ConnectionShape::Adapter => "Adapter",
            ConnectionShape::Flange => "Flange",
            ConnectionShape::Ferrule => "Ferrule",
        };
        write!(f, "{}", s)
    }
}

// ============================================
// 製品レコード
// ============================================

/// ホース製品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoseRecord {
    supplier: Supplier,
    pub model: Option<String>,
    pub reference: Option<String>,
    pub article_number: Option<String>,
    pub category: Option<String>,
    pub source_url: Option<String>,
    pub source_page: Option<usize>,

    /// 呼び径 DN（mm）
    pub nominal_diameter: Option<u16>,
    /// SAE J517 ダッシュサイズ
    pub dash_code: Option<u8>,
    pub inch_size: Option<String>,
    /// ダッシュ/インチ/DNから決めた基準サイズ（mm）
    pub size_mm: Option<f64>,

    pub standard: Option<Standard>,
    /// 表示用の規格原文
    pub standard_text: Option<String>,
    pub construction: Option<Construction>,

    pub inner_diameter_mm: Option<f64>,
    pub outer_diameter_mm: Option<f64>,
    pub working_pressure: Option<Pressure>,
    pub burst_pressure: Option<Pressure>,
    pub bend_radius_mm: Option<f64>,
    pub weight_kg_per_m: Option<f64>,
}

impl HoseRecord {
    pub fn new(supplier: Supplier) -> Self {
        Self {
            supplier,
            model: None,
            reference: None,
            article_number: None,
            category: None,
            source_url: None,
            source_page: None,
            nominal_diameter: None,
            dash_code: None,
            inch_size: None,
            size_mm: None,
            standard: None,
            standard_text: None,
            construction: None,
            inner_diameter_mm: None,
            outer_diameter_mm: None,
            working_pressure: None,
            burst_pressure: None,
            bend_radius_mm: None,
            weight_kg_per_m: None,
        }
    }

    pub fn supplier(&self) -> Supplier {
        self.supplier
    }

    /// 比較に使うサイズ（ダッシュコードがあればダッシュ表のサイズ、なければDN）
    pub fn comparable_size_mm(&self) -> Option<f64> {
        comparable_size(self.dash_code, self.nominal_diameter, self.size_mm)
    }
}

/// 継手製品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FittingRecord {
    supplier: Supplier,
    pub model: Option<String>,
    pub reference: Option<String>,
    pub article_number: Option<String>,
    pub category: Option<String>,
    /// 見出しの製品種別テキスト（表示用）
    pub product_type: Option<String>,
    pub source_url: Option<String>,
    pub source_page: Option<usize>,

    pub nominal_diameter: Option<u16>,
    pub dash_code: Option<u8>,
    pub inch_size: Option<String>,
    /// ホースサイズ（mm）。ダッシュ表を優先して決定
    pub size_mm: Option<f64>,

    pub standard: Option<Standard>,
    pub standard_text: Option<String>,
    pub thread_family: Option<ThreadFamily>,
    pub connection: Option<ConnectionShape>,
    pub thread_size: Option<String>,
    pub tube_od_mm: Option<f64>,

    pub angle: Option<Angle>,
    pub series: Option<Series>,
    pub seat_type: Option<SeatType>,
    #[serde(default)]
    pub gender: Gender,
}

impl FittingRecord {
    pub fn new(supplier: Supplier) -> Self {
        Self {
            supplier,
            model: None,
            reference: None,
            article_number: None,
            category: None,
            product_type: None,
            source_url: None,
            source_page: None,
            nominal_diameter: None,
            dash_code: None,
            inch_size: None,
            size_mm: None,
            standard: None,
            standard_text: None,
            thread_family: None,
            connection: None,
            thread_size: None,
            tube_od_mm: None,
            angle: None,
            series: None,
            seat_type: None,
            gender: Gender::Unknown,
        }
    }

    pub fn supplier(&self) -> Supplier {
        self.supplier
    }

    pub fn comparable_size_mm(&self) -> Option<f64> {
        comparable_size(self.dash_code, self.nominal_diameter, self.size_mm)
    }
}

/// ダッシュコード付きのレコードでは size_mm がダッシュ表の値。
/// 列ずれしたDNより優先する
fn comparable_size(dash_code: Option<u8>, dn: Option<u16>, size_mm: Option<f64>) -> Option<f64> {
    let dn = dn.map(f64::from);
    match dash_code {
        Some(_) => size_mm.or(dn),
        None => dn.or(size_mm),
    }
}

/// 製品レコード（ホース/継手）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Product {
    Hose(HoseRecord),
    Fitting(FittingRecord),
}

impl Product {
    pub fn kind(&self) -> ProductKind {
        match self {
            Product::Hose(_) => ProductKind::Hose,
            Product::Fitting(_) => ProductKind::Fitting,
        }
    }

    pub fn supplier(&self) -> Supplier {
        match self {
            Product::Hose(h) => h.supplier(),
            Product::Fitting(f) => f.supplier(),
        }
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            Product::Hose(h) => h.model.as_deref(),
            Product::Fitting(f) => f.model.as_deref(),
        }
    }

    /// 検索キー（品番、なければリファレンス）
    pub fn key(&self) -> Option<&str> {
        let (article, reference) = match self {
            Product::Hose(h) => (&h.article_number, &h.reference),
            Product::Fitting(f) => (&f.article_number, &f.reference),
        };
        article
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| reference.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn as_hose(&self) -> Option<&HoseRecord> {
        match self {
            Product::Hose(h) => Some(h),
            Product::Fitting(_) => None,
        }
    }

    pub fn as_fitting(&self) -> Option<&FittingRecord> {
        match self {
            Product::Fitting(f) => Some(f),
            Product::Hose(_) => None,
        }
    }
}

// ============================================
// 照合結果
// ============================================

/// レコード参照（オブジェクトではなく識別子で保持）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRef {
    pub supplier: Supplier,
    /// カタログ内の位置
    pub position: usize,
    pub key: Option<String>,
}

impl RecordRef {
    pub fn new(supplier: Supplier, position: usize, key: Option<&str>) -> Self {
        Self {
            supplier,
            position,
            key: key.map(|k| k.to_string()),
        }
    }
}

/// スコアから決まる品質区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Possible,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quality::Excellent => "Excellent",
            Quality::VeryGood => "Very Good",
            Quality::Good => "Good",
            Quality::Fair => "Fair",
            Quality::Possible => "Possible",
        };
        write!(f, "{}", s)
    }
}

/// 照合結果。マッチャーだけが生成し、以後は変更しない
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    source: RecordRef,
    target: RecordRef,
    score: f64,
    quality: Quality,
    reasons: Vec<String>,
    warnings: Vec<String>,
}

impl Match {
    pub(crate) fn new(
        source: RecordRef,
        target: RecordRef,
        score: f64,
        quality: Quality,
        reasons: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self { source, target, score, quality, reasons, warnings }
    }

    pub fn source(&self) -> &RecordRef {
        &self.source
    }

    pub fn target(&self) -> &RecordRef {
        &self.target
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== 圧力テスト =====

    #[test]
    fn test_pressure_bar_to_mpa() {
        assert_eq!(Pressure::bar(350.0).to_mpa(), 35.0);
        assert_eq!(Pressure::mpa(35.0).to_mpa(), 35.0);
        assert_eq!(Pressure::mpa(25.0).to_bar(), 250.0);
    }

    #[test]
    fn test_pressure_psi_to_mpa() {
        let mpa = Pressure::psi(6000.0).to_mpa();
        assert!((mpa - 41.37).abs() < 0.01);
    }

    // ===== 語彙テスト =====

    #[test]
    fn test_construction_family() {
        assert_eq!(Construction::TwoWireBraid.family(), ConstructionFamily::Wire);
        assert_eq!(Construction::SpiralWire.family(), ConstructionFamily::Spiral);
        assert_eq!(Construction::Thermoplastic.family(), ConstructionFamily::Thermoplastic);
        assert_eq!(Construction::default(), Construction::WireBraid);
    }

    #[test]
    fn test_standard_numbers() {
        let en = Standard::new(StandardFamily::En, Some("857"));
        assert_eq!(en.en_number(), Some(857));
        assert_eq!(en.tag(), "EN-857");

        let sae = Standard::new(StandardFamily::Sae, Some("100R2"));
        assert_eq!(sae.sae_r_number(), Some(2));
        assert_eq!(sae.en_number(), None);

        let bsp = Standard::new(StandardFamily::Bsp, None);
        assert_eq!(bsp.tag(), "BSP");
    }

    #[test]
    fn test_supplier_from_str() {
        assert_eq!("a".parse::<Supplier>(), Ok(Supplier::A));
        assert_eq!("Shop".parse::<Supplier>(), Ok(Supplier::B));
        assert!("c".parse::<Supplier>().is_err());
    }

    // ===== レコードテスト =====

    #[test]
    fn test_product_key_prefers_article_number() {
        let mut hose = HoseRecord::new(Supplier::A);
        hose.reference = Some("BESTFLEX-08".to_string());
        assert_eq!(Product::Hose(hose.clone()).key(), Some("BESTFLEX-08"));

        hose.article_number = Some("12345".to_string());
        assert_eq!(Product::Hose(hose).key(), Some("12345"));
    }

    #[test]
    fn test_product_serialize_tagged() {
        let mut hose = HoseRecord::new(Supplier::B);
        hose.nominal_diameter = Some(12);
        hose.construction = Some(Construction::TwoWireBraid);
        hose.working_pressure = Some(Pressure::bar(250.0));

        let json = serde_json::to_string(&Product::Hose(hose)).expect("シリアライズ失敗");
        assert!(json.contains("\"kind\":\"hose\""));
        assert!(json.contains("\"supplier\":\"B\""));
        assert!(json.contains("\"nominalDiameter\":12"));
        assert!(json.contains("\"construction\":\"2 wire braid\""));
        assert!(json.contains("\"unit\":\"bar\""));
    }

    #[test]
    fn test_product_deserialize_missing_fields() {
        let json = r#"{"kind": "fitting", "supplier": "A", "articleNumber": "10.124.08", "angle": "90°"}"#;
        let product: Product = serde_json::from_str(json).expect("デシリアライズ失敗");
        let fitting = product.as_fitting().expect("継手ではない");
        assert_eq!(fitting.supplier(), Supplier::A);
        assert_eq!(fitting.angle, Some(Angle::Deg90));
        assert_eq!(fitting.gender, Gender::Unknown);
        assert_eq!(fitting.series, None);
    }

    #[test]
    fn test_comparable_size_prefers_dn_without_dash() {
        let mut hose = HoseRecord::new(Supplier::A);
        hose.size_mm = Some(12.7);
        assert_eq!(hose.comparable_size_mm(), Some(12.7));
        hose.nominal_diameter = Some(12);
        assert_eq!(hose.comparable_size_mm(), Some(12.0));
    }

    #[test]
    fn test_comparable_size_dash_beats_misaligned_dn() {
        let mut fitting = FittingRecord::new(Supplier::A);
        fitting.nominal_diameter = Some(19);
        fitting.dash_code = Some(10);
        fitting.size_mm = Some(15.9);
        assert_eq!(fitting.comparable_size_mm(), Some(15.9));

        // サイズが無ければDNに戻る
        fitting.size_mm = None;
        assert_eq!(fitting.comparable_size_mm(), Some(19.0));
    }
}
