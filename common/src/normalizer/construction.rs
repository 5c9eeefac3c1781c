//! ホース補強構造の正規化

use crate::tables::ReferenceTables;
use crate::types::Construction;

/// リファレンス・モデル名・規格から補強構造を決める
///
/// ルール表を優先順に評価し、どれにも一致しなければ `WireBraid` を返す。
pub fn normalize_construction(
    reference: Option<&str>,
    model: Option<&str>,
    standard: Option<&str>,
    tables: &ReferenceTables,
) -> Construction {
    let combined = [reference, model, standard]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    tables
        .construction_rules
        .iter()
        .find(|rule| rule.pattern.is_match(&combined))
        .map(|rule| rule.construction)
        .unwrap_or_default()
}
