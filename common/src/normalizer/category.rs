//! 継手カテゴリからの推定（規格・シール形状・ねじ系統・接続形状）

use super::standard::normalize_standard;
use crate::tables::ReferenceTables;
use crate::types::{ConnectionShape, SeatType, Standard, StandardFamily, ThreadFamily};
use regex::Regex;

fn tokens(text: &str) -> Vec<String> {
    text.to_uppercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// 本文から継手カテゴリを判定（キーワード表の順で最初に一致したもの）
pub fn category_from_text(text: &str, tables: &ReferenceTables) -> Option<String> {
    let words = tokens(text);
    tables
        .category_keywords
        .iter()
        .find(|(keyword, _)| words.iter().any(|w| w == keyword))
        .map(|(_, category)| category.clone())
}

/// カテゴリから規格を推定（製品種別テキストで補正）
pub fn standard_from_category(
    category: &str,
    product_type: Option<&str>,
    tables: &ReferenceTables,
) -> Option<Standard> {
    let hint = product_type.unwrap_or("").to_uppercase();

    match category.to_uppercase().as_str() {
        "METRIC" => {
            if hint.contains("JIS") || hint.contains("60°") {
                Some(Standard::new(StandardFamily::Jis, None))
            } else {
                Some(Standard::new(StandardFamily::Iso, Some("8434-1")))
            }
        }
        "BSP" => Some(Standard::new(StandardFamily::Bsp, None)),
        "JIC 37" => Some(Standard::new(StandardFamily::Jic, None)),
        "ORFS" => {
            if hint.contains("NPT") {
                Some(Standard::new(StandardFamily::Npt, None))
            } else {
                Some(Standard::new(StandardFamily::Orfs, None))
            }
        }
        "NPT" => Some(Standard::new(StandardFamily::Npt, None)),
        "FLANGE" => {
            if hint.contains("O-RING") || hint.contains("ORING") {
                Some(Standard::new(StandardFamily::Orfs, None))
            } else {
                Some(Standard::new(StandardFamily::Sae, Some("J518")))
            }
        }
        "FERRULE" => None,
        "TEE" | "ELBOW" | "CROSS" | "ADAPTER" => normalize_standard(&hint, tables),
        _ => None,
    }
}

/// カテゴリ・規格からシール形状の既定値を推定
pub fn seat_from_category(category: Option<&str>, standard: Option<&Standard>) -> Option<SeatType> {
    if category.is_some_and(|c| c.eq_ignore_ascii_case("ferrule")) {
        return Some(SeatType::FlatFace);
    }

    let standard = standard?;
    match standard.family {
        StandardFamily::Jic => Some(SeatType::Cone(37)),
        StandardFamily::Orfs => Some(SeatType::ORing),
        StandardFamily::Jis => Some(SeatType::Cone(60)),
        StandardFamily::Iso if standard.code.as_deref() == Some("8434-1") => Some(SeatType::Cone(24)),
        _ => None,
    }
}

/// ねじ系統を推定（カテゴリ > ねじサイズ > 規格）
pub fn thread_family_from(
    category: Option<&str>,
    thread_size: Option<&str>,
    standard: Option<&Standard>,
) -> Option<ThreadFamily> {
    lazy_static::lazy_static! {
        static ref METRIC_RE: Regex = Regex::new(r"^M\d").unwrap();
        static ref UNF_RE: Regex = Regex::new(r"^\d+(?:-\d+)?/\d+-\d+$").unwrap();
    }

    let from_category = category.and_then(|c| match c.to_uppercase().as_str() {
        "METRIC" => Some(ThreadFamily::Metric),
        "BSP" => Some(ThreadFamily::Bsp),
        "NPT" => Some(ThreadFamily::Npt),
        "JIC 37" => Some(ThreadFamily::Jic),
        "ORFS" => Some(ThreadFamily::Orfs),
        _ => None,
    });
    if from_category.is_some() {
        return from_category;
    }

    let family = standard.map(|s| s.family);
    if let Some(thread) = thread_size {
        if METRIC_RE.is_match(thread) {
            return Some(ThreadFamily::Metric);
        }
        if thread.starts_with('G') {
            return Some(ThreadFamily::Bsp);
        }
        if thread.ends_with("NPT") {
            return Some(ThreadFamily::Npt);
        }
        if UNF_RE.is_match(thread) {
            return match family {
                Some(StandardFamily::Orfs) => Some(ThreadFamily::Orfs),
                Some(StandardFamily::Sae) => Some(ThreadFamily::Sae),
                _ => Some(ThreadFamily::Jic),
            };
        }
    }

    match family? {
        StandardFamily::Bsp => Some(ThreadFamily::Bsp),
        StandardFamily::Npt => Some(ThreadFamily::Npt),
        StandardFamily::Jic => Some(ThreadFamily::Jic),
        StandardFamily::Orfs => Some(ThreadFamily::Orfs),
        StandardFamily::Jis => Some(ThreadFamily::Jis),
        StandardFamily::Iso | StandardFamily::Din => Some(ThreadFamily::Metric),
        _ => None,
    }
}

/// 接続形状を推定（カテゴリ > 本文キーワード）
pub fn connection_from(category: Option<&str>, text: &str) -> Option<ConnectionShape> {
    lazy_static::lazy_static! {
        static ref ELBOW_RE: Regex = Regex::new(r"(?i)\belbow|\bbogen|\bwinkel|\bswept").unwrap();
        static ref TEE_RE: Regex = Regex::new(r"(?i)\btee\b|\bt-st(?:ü|ue)ck").unwrap();
        static ref CROSS_RE: Regex = Regex::new(r"(?i)\bcross\b|\bkreuz").unwrap();
        static ref FLANGE_RE: Regex = Regex::new(r"(?i)\bflange|\bflansch").unwrap();
        static ref FERRULE_RE: Regex = Regex::new(r"(?i)\bferrule|\bh(?:ü|ue)lse").unwrap();
        static ref ADAPTER_RE: Regex = Regex::new(r"(?i)\badapt(?:er|or)|\b(?:ü|ue)bergang").unwrap();
        static ref STRAIGHT_RE: Regex = Regex::new(r"(?i)\b(?:straight|gerade?)\b").unwrap();
    }

    if let Some(category) = category {
        let shape = match category.to_uppercase().as_str() {
            "FERRULE" => Some(ConnectionShape::Ferrule),
            "FLANGE" => Some(ConnectionShape::Flange),
            "ELBOW" => Some(ConnectionShape::Elbow),
            "TEE" => Some(ConnectionShape::Tee),
            "CROSS" => Some(ConnectionShape::Cross),
            "ADAPTER" => Some(ConnectionShape::Adapter),
            _ => None,
        };
        if shape.is_some() {
            return shape;
        }
    }

    let rules: [(&Regex, ConnectionShape); 7] = [
        (&*ELBOW_RE, ConnectionShape::Elbow),
        (&*TEE_RE, ConnectionShape::Tee),
        (&*CROSS_RE, ConnectionShape::Cross),
        (&*FLANGE_RE, ConnectionShape::Flange),
        (&*FERRULE_RE, ConnectionShape::Ferrule),
        (&*ADAPTER_RE, ConnectionShape::Adapter),
        (&*STRAIGHT_RE, ConnectionShape::Straight),
    ];
    rules
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, shape)| *shape)
}
