//! 規格表記の正規化
//!
//! 優先順位付きのルール表で最初に一致したファミリーを採用する。
//! 番号は必ずトークン全体を切り出す（"EN 85" のような部分一致で 853/857 を混同しない）。

use crate::tables::{CodeFormat, ReferenceTables};
use crate::types::Standard;
use regex::Regex;

/// 自由記述の規格を閉じた語彙へ変換
pub fn normalize_standard(text: &str, tables: &ReferenceTables) -> Option<Standard> {
    if text.trim().is_empty() {
        return None;
    }

    for rule in &tables.standard_rules {
        let Some(caps) = rule.pattern.captures(text) else {
            continue;
        };
        let captured = caps.get(1).map(|m| m.as_str().to_uppercase());
        let code = match rule.code {
            CodeFormat::None => None,
            CodeFormat::Captured => captured,
            CodeFormat::Prefixed(prefix) => captured.map(|c| format!("{}{}", prefix, c)),
        };
        return Some(Standard { family: rule.family, code });
    }

    None
}

/// 本文から規格の原文を切り出す（DIN EN > SAE > ISO）
pub fn find_standard_text(text: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref EN_RE: Regex = Regex::new(
            r"(?i)\b(?:DIN\s+)?EN\s*\d{3,5}(?:\s+[1-4](?:SN|SC|SP|SH|TE))?\b"
        ).unwrap();
        static ref SAE_RE: Regex = Regex::new(
            r"(?i)\bSAE\s*(?:J517\s*)?100\s*R\s*\d{1,2}(?:AT|S)?\b"
        ).unwrap();
        static ref ISO_RE: Regex = Regex::new(r"(?i)\bISO\s*\d{3,5}(?:-\d+)?").unwrap();
        static ref J517_RE: Regex = Regex::new(r"(?i)J517\s*").unwrap();
        static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let found = EN_RE
        .find(text)
        .or_else(|| SAE_RE.find(text))
        .or_else(|| ISO_RE.find(text))?;

    let cleaned = J517_RE.replace_all(found.as_str(), "");
    Some(SPACES_RE.replace_all(cleaned.trim(), " ").to_string())
}

/// モデル名の行から2行先までを優先して規格を探し、なければ本文全体
pub fn standard_lookahead(text: &str, model: Option<&str>) -> Option<String> {
    if let Some(model) = model.map(str::to_uppercase).filter(|m| !m.is_empty()) {
        let lines: Vec<&str> = text.lines().collect();
        if let Some(start) = lines.iter().position(|l| l.to_uppercase().contains(&model)) {
            let end = (start + 3).min(lines.len());
            let window = lines[start..end].join("\n");
            if let Some(found) = find_standard_text(&window) {
                return Some(found);
            }
        }
    }

    find_standard_text(text)
}

/// モデル名のトークンから規格を推定（"2SN" -> "DIN EN 853 2SN"）
pub fn infer_standard_from_model(model: &str, tables: &ReferenceTables) -> Option<String> {
    tables
        .model_standards
        .iter()
        .find(|m| m.pattern.is_match(model))
        .map(|m| m.standard.clone())
}
