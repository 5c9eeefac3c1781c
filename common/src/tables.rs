//! 参照テーブル
//!
//! ダッシュサイズ表、インチ表、規格キーワードの優先順位、補強構造ルール、
//! モデル名パターン、シリーズ判定表、テーブルレイアウト。
//! 起動時に一度だけ構築し、正規化・抽出処理へ参照で渡す。

use crate::error::{Error, Result};
use crate::extractor::layout::{self, TableLayout};
use crate::types::{Construction, Series, StandardFamily};
use regex::Regex;

/// SAE J517 ダッシュサイズ
#[derive(Debug, Clone, PartialEq)]
pub struct DashSize {
    pub code: u8,
    pub mm: f64,
    pub inch: &'static str,
}

const DASH_SIZES: &[(u8, f64, &str)] = &[
    (2, 3.2, "1/8"),
    (3, 4.8, "3/16"),
    (4, 6.4, "1/4"),
    (5, 7.9, "5/16"),
    (6, 9.5, "3/8"),
    (8, 12.7, "1/2"),
    (10, 15.9, "5/8"),
    (12, 19.0, "3/4"),
    (16, 25.4, "1"),
    (20, 31.8, "1-1/4"),
    (24, 38.1, "1-1/2"),
    (32, 50.8, "2"),
    (40, 63.5, "2-1/2"),
    (48, 76.2, "3"),
];

/// ダッシュ表にないインチサイズ
const EXTRA_INCH_SIZES: &[(&str, f64)] = &[("7/8", 22.2)];

/// 番号トークンの組み立て方
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CodeFormat {
    /// 番号なし
    None,
    /// キャプチャをそのまま使う
    Captured,
    /// 接頭辞を付ける（"100R" + "2"）
    Prefixed(&'static str),
}

/// 規格判定ルール（優先順）
#[derive(Debug, Clone)]
pub struct StandardRule {
    pub family: StandardFamily,
    pub pattern: Regex,
    pub code: CodeFormat,
}

/// 補強構造ルール（優先順）
#[derive(Debug, Clone)]
pub struct ConstructionRule {
    pub pattern: Regex,
    pub construction: Construction,
}

/// モデルトークンから規格を推定するルール
#[derive(Debug, Clone)]
pub struct ModelStandard {
    pub pattern: Regex,
    pub standard: String,
}

/// ISO 8434-1 シリーズ判定（管外径 + ねじ）
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub tube_od_mm: f64,
    pub thread: &'static str,
    pub series: Series,
}

const SERIES_TABLE: &[(f64, &str, Series)] = &[
    (6.0, "M12X1.5", Series::Light),
    (6.0, "M14X1.5", Series::Heavy),
    (8.0, "M14X1.5", Series::Light),
    (8.0, "M16X1.5", Series::Heavy),
    (10.0, "M16X1.5", Series::Light),
    (10.0, "M18X1.5", Series::Heavy),
    (12.0, "M18X1.5", Series::Light),
    (12.0, "M20X1.5", Series::Heavy),
    (14.0, "M22X1.5", Series::Heavy),
    (15.0, "M22X1.5", Series::Light),
    (16.0, "M24X1.5", Series::Heavy),
    (18.0, "M26X1.5", Series::Light),
    (20.0, "M30X2.0", Series::Heavy),
    (22.0, "M30X2.0", Series::Light),
    (25.0, "M36X2.0", Series::Heavy),
    (28.0, "M36X2.0", Series::Light),
    (30.0, "M42X2.0", Series::Heavy),
    (35.0, "M45X2.0", Series::Light),
    (38.0, "M52X2.0", Series::Heavy),
    (42.0, "M52X2.0", Series::Light),
];

/// メーカーカタログのモデル名（ページ本文から探す）
const MODEL_NAMES: &[&str] = &[
    "POWERSPIR BESTFLEX",
    "BALMASTER BESTFLEX",
    "BALPAC IMPACTUS",
    "TEXMASTER",
    "BALFLON",
    "FORZA",
    "MULTIFLEX",
    "MULTIPURPOSE",
];

/// モデルトークン → 規格
const MODEL_STANDARDS: &[(&str, &str)] = &[
    ("1SN", "DIN EN 853 1SN"),
    ("2SN", "DIN EN 853 2SN"),
    ("1SC", "DIN EN 857 1SC"),
    ("2SC", "DIN EN 857 2SC"),
    ("1TE", "DIN EN 854 1TE"),
    ("2TE", "DIN EN 854 2TE"),
    ("3TE", "DIN EN 854 3TE"),
    ("4SP", "DIN EN 856 4SP"),
    ("4SH", "DIN EN 856 4SH"),
    ("R12", "DIN EN 856 R12"),
    ("R13", "DIN EN 856 R13"),
    ("R15", "DIN EN 856 R15"),
    ("AT3", "SAE 100R3"),
    ("AT7", "SAE 100R7"),
    ("AT8", "SAE 100R8"),
    ("R1", "SAE 100R1"),
    ("R2", "SAE 100R2"),
    ("R3", "SAE 100R3"),
    ("R5", "SAE 100R5"),
    ("R6", "SAE 100R6"),
    ("R7", "SAE 100R7"),
    ("R8", "SAE 100R8"),
    ("R16", "SAE 100R16"),
    ("R17", "SAE 100R17"),
];

/// 継手カテゴリのキーワード（優先順）
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("FERRULE", "Ferrule"),
    ("JIC", "JIC 37"),
    ("ORFS", "ORFS"),
    ("FLANGE", "Flange"),
    ("BSP", "BSP"),
    ("NPT", "NPT"),
    ("METRIC", "Metric"),
    ("ADAPTER", "Adapter"),
    ("ELBOW", "Elbow"),
    ("TEE", "Tee"),
    ("CROSS", "Cross"),
];

/// 参照テーブル一式
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub dash_sizes: Vec<DashSize>,
    pub inch_sizes: Vec<(String, f64)>,
    pub standard_rules: Vec<StandardRule>,
    pub construction_rules: Vec<ConstructionRule>,
    pub model_names: Vec<String>,
    pub model_standards: Vec<ModelStandard>,
    pub series_table: Vec<SeriesEntry>,
    pub category_keywords: Vec<(String, String)>,
    pub layouts: Vec<TableLayout>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("正規表現エラー ({}): {}", pattern, e)))
}

/// SAE R番号トークン（"R2", "100R2AT"）
fn r_number(numbers: &str) -> String {
    format!(r"(?:\b|100)R(?:{})(?:[^0-9]|$)", numbers)
}

impl ReferenceTables {
    /// 組み込みテーブルを構築
    pub fn new() -> Result<Self> {
        let dash_sizes: Vec<DashSize> = DASH_SIZES
            .iter()
            .map(|&(code, mm, inch)| DashSize { code, mm, inch })
            .collect();

        let mut inch_sizes: Vec<(String, f64)> = dash_sizes
            .iter()
            .map(|d| (d.inch.to_string(), d.mm))
            .collect();
        inch_sizes.extend(EXTRA_INCH_SIZES.iter().map(|&(inch, mm)| (inch.to_string(), mm)));

        // 具体的なパターンを先に評価する
        let standard_rules = vec![
            StandardRule {
                family: StandardFamily::En,
                pattern: compile(r"(?i)\b(?:DIN\s*)?EN\s*(\d{3,5})\b")?,
                code: CodeFormat::Captured,
            },
            StandardRule {
                family: StandardFamily::Sae,
                pattern: compile(r"(?i)\bSAE\s*(?:J517\s*)?(?:100\s*)?R\s*(\d{1,2})")?,
                code: CodeFormat::Prefixed("100R"),
            },
            StandardRule {
                family: StandardFamily::Sae,
                pattern: compile(r"(?i)\b100\s*R(\d{1,2})")?,
                code: CodeFormat::Prefixed("100R"),
            },
            StandardRule {
                family: StandardFamily::Iso,
                pattern: compile(r"(?i)\bISO\s*(\d{3,5}(?:-\d+)?)")?,
                code: CodeFormat::Captured,
            },
            StandardRule {
                family: StandardFamily::Jis,
                pattern: compile(r"(?i)\bJIS\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Bsp,
                pattern: compile(r"(?i)\bBSP[PT]?\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Npt,
                pattern: compile(r"(?i)\bNPTF?\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Jic,
                pattern: compile(r"(?i)\bJIC\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Orfs,
                pattern: compile(r"(?i)\bORFS\b|O-RING\s+FACE\s+SEAL")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Sae,
                pattern: compile(r"(?i)\bSAE\s*(J\d{3,4})")?,
                code: CodeFormat::Captured,
            },
            StandardRule {
                family: StandardFamily::Sae,
                pattern: compile(r"(?i)\bSAE\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Din,
                pattern: compile(r"(?i)\bDIN\s*(\d{4,5})")?,
                code: CodeFormat::Captured,
            },
            StandardRule {
                family: StandardFamily::Din,
                pattern: compile(r"(?i)\bDIN\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Komatsu,
                pattern: compile(r"(?i)\bKOMATSU\b")?,
                code: CodeFormat::None,
            },
            StandardRule {
                family: StandardFamily::Caterpillar,
                pattern: compile(r"(?i)\bCATERPILLAR\b")?,
                code: CodeFormat::None,
            },
        ];

        // スパイラル > 2層ブレード > 1層ブレード > 繊維 > 熱可塑 > ワイヤー
        let construction_rules = vec![
            ConstructionRule {
                pattern: compile(&format!(r"4SP|4SH|3SPT|SPIRAL|{}", r_number("12|13|15")))?,
                construction: Construction::SpiralWire,
            },
            ConstructionRule {
                pattern: compile(&format!(r"2SC|2SN|\b2\s*WIRE|{}", r_number("2")))?,
                construction: Construction::TwoWireBraid,
            },
            ConstructionRule {
                pattern: compile(&format!(r"1SC|1SN|\b1\s*WIRE|{}", r_number("1")))?,
                construction: Construction::OneWireBraid,
            },
            ConstructionRule {
                pattern: compile(&format!(r"TEXTILE|TEXMASTER|\b[123]?TE\b|{}", r_number("3|5|6")))?,
                construction: Construction::TextileBraid,
            },
            ConstructionRule {
                pattern: compile(&format!(r"THERMOPLAST|{}", r_number("7|8")))?,
                construction: Construction::Thermoplastic,
            },
            ConstructionRule {
                pattern: compile(&format!(r"WIRE|{}", r_number("16|17")))?,
                construction: Construction::WireBraid,
            },
        ];

        let model_standards = MODEL_STANDARDS
            .iter()
            .map(|&(token, standard)| {
                let pattern = if token.starts_with('R') {
                    r_number(&token[1..])
                } else {
                    format!(r"\b{}\b", regex::escape(token))
                };
                Ok(ModelStandard {
                    pattern: compile(&format!("(?i){}", pattern))?,
                    standard: standard.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let series_table = SERIES_TABLE
            .iter()
            .map(|&(tube_od_mm, thread, series)| SeriesEntry { tube_od_mm, thread, series })
            .collect();

        Ok(Self {
            dash_sizes,
            inch_sizes,
            standard_rules,
            construction_rules,
            model_names: MODEL_NAMES.iter().map(|s| s.to_string()).collect(),
            model_standards,
            series_table,
            category_keywords: CATEGORY_KEYWORDS
                .iter()
                .map(|&(k, c)| (k.to_string(), c.to_string()))
                .collect(),
            layouts: layout::builtin_layouts(),
        })
    }

    /// 設定ファイル由来のモデル名を追加（組み込みより後ろ）
    pub fn with_model_names(mut self, names: &[String]) -> Self {
        for name in names {
            let upper = name.trim().to_uppercase();
            if !upper.is_empty() && !self.model_names.contains(&upper) {
                self.model_names.push(upper);
            }
        }
        self
    }

    /// ダッシュコードからサイズを引く
    pub fn dash(&self, code: u8) -> Option<&DashSize> {
        self.dash_sizes.iter().find(|d| d.code == code)
    }

    /// 標準サイズ（mm）の一覧
    pub fn standard_sizes_mm(&self) -> impl Iterator<Item = f64> + '_ {
        self.dash_sizes.iter().map(|d| d.mm)
    }
}
