//! サイズ表記の正規化（DN / ダッシュ / インチ）
//!
//! ダッシュコードがある場合は常にSAE J517表の値を基準サイズとする。
//! 表から抽出したmm値は列ずれで誤ることがあるため、表の標準サイズから
//! 2mm以上離れた値は採用しない。

use super::numeric::{normalize_decimal, round1};
use crate::tables::ReferenceTables;
use regex::Regex;

/// 標準サイズとの許容差（mm）
const STANDARD_SIZE_TOLERANCE_MM: f64 = 2.0;

/// 本文中の "DN" 表記だけを探す
pub fn find_dn(text: &str) -> Option<u16> {
    lazy_static::lazy_static! {
        static ref DN_RE: Regex = Regex::new(r"(?i)\bDN\s*(\d{1,4})").unwrap();
    }

    let caps = DN_RE.captures(text)?;
    caps[1].parse::<u16>().ok().filter(|&dn| dn > 0)
}

/// DN列のセルを解析（"DN 12", "DN12", "12"）
pub fn parse_dn(text: &str) -> Option<u16> {
    if let Some(dn) = find_dn(text) {
        return Some(dn);
    }

    // 分数はDNではない
    if text.contains('/') {
        return None;
    }

    let value = normalize_decimal(text)?;
    if value > 0.0 && value < 1000.0 {
        Some(value.round() as u16)
    } else {
        None
    }
}

/// ダッシュコードを解析（"-10", "10", "Dash 10"）
pub fn parse_dash_code(text: &str) -> Option<u8> {
    lazy_static::lazy_static! {
        static ref DASH_RE: Regex = Regex::new(r"(?i)^\s*(?:DASH\s*)?-?\s*(\d{1,2})\s*$").unwrap();
    }

    let caps = DASH_RE.captures(text)?;
    caps[1].parse::<u8>().ok().filter(|&c| (1..=64).contains(&c))
}

/// ダッシュコード -> mm（SAE J517表）
pub fn dash_to_mm(code: u8, tables: &ReferenceTables) -> Option<f64> {
    tables.dash(code).map(|d| d.mm)
}

/// ダッシュコード -> インチ表記
pub fn inch_from_dash(code: u8, tables: &ReferenceTables) -> Option<String> {
    tables.dash(code).map(|d| format!("{}\"", d.inch))
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// インチ表記を正規化（"1 1/4", "1-1/4\"", "8/16" -> "1/2\""）
pub fn normalize_inch(text: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref MIXED_RE: Regex = Regex::new(r"(\d+)\s*[-\s]\s*(\d+)\s*/\s*(\d+)").unwrap();
        static ref FRAC_RE: Regex = Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap();
        static ref WHOLE_RE: Regex = Regex::new(r#"(?i)^\s*(\d{1,2})\s*(?:"|''|inch|zoll)?\s*$"#).unwrap();
    }

    let (whole, num, den) = if let Some(caps) = MIXED_RE.captures(text) {
        (caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?, caps[3].parse::<u32>().ok()?)
    } else if let Some(caps) = FRAC_RE.captures(text) {
        (0, caps[1].parse::<u32>().ok()?, caps[2].parse::<u32>().ok()?)
    } else if let Some(caps) = WHOLE_RE.captures(text) {
        (caps[1].parse::<u32>().ok()?, 0, 1)
    } else {
        return None;
    };

    if den == 0 {
        return None;
    }

    let whole = whole.checked_add(num / den)?;
    let num = num % den;
    if num == 0 {
        return (whole > 0).then(|| format!("{}\"", whole));
    }

    let g = gcd(num, den);
    let (num, den) = (num / g, den / g);
    if whole > 0 {
        Some(format!("{}-{}/{}\"", whole, num, den))
    } else {
        Some(format!("{}/{}\"", num, den))
    }
}

/// インチ表記 -> mm（表にあれば表の値、なければ換算して小数1桁）
pub fn inch_to_mm(text: &str, tables: &ReferenceTables) -> Option<f64> {
    let label = normalize_inch(text)?;
    let key = label.trim_end_matches('"');

    if let Some((_, mm)) = tables.inch_sizes.iter().find(|(inch, _)| inch == key) {
        return Some(*mm);
    }

    let (whole, frac) = match key.split_once('-') {
        Some((w, f)) => (w.parse::<f64>().ok()?, Some(f)),
        None if key.contains('/') => (0.0, Some(key)),
        None => (key.parse::<f64>().ok()?, None),
    };
    let frac_value = match frac {
        Some(f) => {
            let (n, d) = f.split_once('/')?;
            n.parse::<f64>().ok()? / d.parse::<f64>().ok()?
        }
        None => 0.0,
    };

    Some(round1((whole + frac_value) * 25.4))
}

/// 基準サイズを決定: ダッシュ > インチ > 標準サイズに近いmm値
pub fn resolve_size_mm(
    dash: Option<u8>,
    inch: Option<&str>,
    mm: Option<f64>,
    tables: &ReferenceTables,
) -> Option<f64> {
    if let Some(size) = dash.and_then(|code| dash_to_mm(code, tables)) {
        return Some(size);
    }
    if let Some(size) = inch.and_then(|i| inch_to_mm(i, tables)) {
        return Some(size);
    }

    let mm = mm?;
    let near_standard = tables
        .standard_sizes_mm()
        .any(|size| (size - mm).abs() <= STANDARD_SIZE_TOLERANCE_MM);
    near_standard.then(|| round1(mm))
}
