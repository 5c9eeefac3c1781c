//! ねじサイズ・管外径の正規化とシリーズ判定表

use super::numeric::normalize_decimal;
use crate::tables::ReferenceTables;
use crate::types::Series;
use regex::Regex;

lazy_static::lazy_static! {
    static ref METRIC_RE: Regex = Regex::new(r"M\s*(\d{1,3})\s*[X×]\s*(\d+(?:\.\d+)?)").unwrap();
    static ref NPT_RE: Regex = Regex::new(r#"(\d+(?:-\d+)?/\d+)\s*(?:"|-\s*\d+)?\s*NPTF?\b"#).unwrap();
    static ref UNF_RE: Regex = Regex::new(r"\b(\d+(?:-\d+)?/\d+)\s*-\s*(\d{1,2})\b").unwrap();
    static ref BSP_RE: Regex = Regex::new(r#"\bG\s*(\d+(?:-\d+)?/\d+|\d+(?:"|\b))"#).unwrap();
}

/// 本文からねじサイズを探す（メートル > NPT > UNF > BSP）
fn find_thread(text: &str) -> Option<String> {
    let upper = text.to_uppercase().replace(',', ".");

    if let Some(caps) = METRIC_RE.captures(&upper) {
        let diameter: u32 = caps[1].parse().ok()?;
        let pitch: f64 = caps[2].parse().ok()?;
        return Some(format!("M{}X{:.1}", diameter, pitch));
    }
    if let Some(caps) = NPT_RE.captures(&upper) {
        return Some(format!("{} NPT", &caps[1]));
    }
    if let Some(caps) = UNF_RE.captures(&upper) {
        return Some(format!("{}-{}", &caps[1], &caps[2]));
    }
    if let Some(caps) = BSP_RE.captures(&upper) {
        return Some(format!("G{}", caps[1].trim_end_matches('"')));
    }

    None
}

/// ねじ列のセル値を正規化（"M16x1,5" -> "M16X1.5"）
///
/// 既知の書式でなければ大文字化した原文を返す。
pub fn normalize_thread_size(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(find_thread(trimmed).unwrap_or_else(|| trimmed.to_uppercase()))
}

/// 識別テキストからねじサイズを抽出（既知の書式のみ）
pub fn extract_thread_size(text: &str) -> Option<String> {
    find_thread(text)
}

/// 管外径を抽出（"Ø12", "Rohr-AD 15", "OD 8"）
pub fn parse_tube_od(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref OD_RE: Regex = Regex::new(r"(?i)(?:Ø|ø|\bOD\b|\bRohr(?:-?AD)?)\s*:?\s*(\d+(?:[.,]\d+)?)").unwrap();
    }

    let caps = OD_RE.captures(text)?;
    normalize_decimal(&caps[1])
}

/// 管外径とねじからシリーズを判定（ISO 8434-1 表）
pub fn series_from_lookup(tube_od_mm: f64, thread: &str, tables: &ReferenceTables) -> Option<Series> {
    let thread = extract_thread_size(thread)?;
    tables
        .series_table
        .iter()
        .find(|e| (e.tube_od_mm - tube_od_mm).abs() < 0.05 && e.thread == thread)
        .map(|e| e.series)
}

/// メーカー品番の5文字目からシリーズを判定（'0' = L, '1' = S）
pub fn series_from_article(article: &str) -> Option<Series> {
    match article.trim().chars().nth(4)? {
        '0' => Some(Series::Light),
        '1' => Some(Series::Heavy),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_thread_metric() {
        assert_eq!(normalize_thread_size("M16x1,5"), Some("M16X1.5".to_string()));
        assert_eq!(normalize_thread_size("m30 x 2"), Some("M30X2.0".to_string()));
        assert_eq!(normalize_thread_size(""), None);
        assert_eq!(normalize_thread_size("spezial"), Some("SPEZIAL".to_string()));
    }

    #[test]
    fn test_extract_thread_from_identification() {
        assert_eq!(extract_thread_size("DN10 M18x1,5 DKOL"), Some("M18X1.5".to_string()));
        assert_eq!(extract_thread_size("G1/4 Nippel"), Some("G1/4".to_string()));
        assert_eq!(extract_thread_size("JIC 1/2-20"), Some("1/2-20".to_string()));
        assert_eq!(extract_thread_size("1/4\" NPT male"), Some("1/4 NPT".to_string()));
        assert_eq!(extract_thread_size("Schlauch DN 12"), None);
    }

    #[test]
    fn test_parse_tube_od() {
        assert_eq!(parse_tube_od("DKOL Ø12 M18x1,5"), Some(12.0));
        assert_eq!(parse_tube_od("Rohr-AD 15"), Some(15.0));
        assert_eq!(parse_tube_od("DN 12"), None);
    }

    #[test]
    fn test_series_from_lookup() {
        let tables = ReferenceTables::new().unwrap();
        assert_eq!(series_from_lookup(12.0, "M18x1,5", &tables), Some(Series::Light));
        assert_eq!(series_from_lookup(12.0, "M20X1.5", &tables), Some(Series::Heavy));
        assert_eq!(series_from_lookup(20.0, "M30x2", &tables), Some(Series::Heavy));
        assert_eq!(series_from_lookup(13.0, "M20X1.5", &tables), None);
    }

    #[test]
    fn test_series_from_article() {
        assert_eq!(series_from_article("20.101.08"), Some(Series::Light));
        assert_eq!(series_from_article("20.111.08"), Some(Series::Heavy));
        assert_eq!(series_from_article("20.1"), None);
        assert_eq!(series_from_article("20.121.08"), None);
    }
}
