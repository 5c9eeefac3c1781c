//! 数値・セル文字列の正規化

use regex::Regex;

/// セル文字列を整形（空、"-" は欠損扱い）
pub fn clean_text(text: Option<&str>) -> Option<&str> {
    let trimmed = text?.trim();
    match trimmed {
        "" | "-" | "–" | "—" | "n/a" | "N/A" => None,
        _ => Some(trimmed),
    }
}

/// 最初の数値トークンを取り出す（小数点のカンマ表記に対応）
///
/// "45,0 6600" -> 45.0, "12.5 mm" -> 12.5
pub fn normalize_decimal(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref NUM_RE: Regex = Regex::new(r"\d+(?:[.,]\d+)?").unwrap();
    }

    let token = NUM_RE.find(text)?.as_str().replace(',', ".");
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 小数1桁に丸める
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_decimal_comma() {
        assert_eq!(normalize_decimal("45,0 6600"), Some(45.0));
        assert_eq!(normalize_decimal("12,7"), Some(12.7));
    }

    #[test]
    fn test_normalize_decimal_noisy() {
        assert_eq!(normalize_decimal("ca. 12.5 mm"), Some(12.5));
        assert_eq!(normalize_decimal("250 bar"), Some(250.0));
        assert_eq!(normalize_decimal("-"), None);
        assert_eq!(normalize_decimal(""), None);
        assert_eq!(normalize_decimal("abc"), None);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  DN 12 ")), Some("DN 12"));
        assert_eq!(clean_text(Some("-")), None);
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(15.875), 15.9);
        assert_eq!(round1(12.66), 12.7);
        assert_eq!(round1(12.0), 12.0);
    }
}
