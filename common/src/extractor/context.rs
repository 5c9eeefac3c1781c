//! ページ単位の文脈（モデル名・規格・製品種別）

use super::RawPage;
use crate::normalizer::{category_from_text, find_standard_text, infer_standard_from_model, standard_lookahead};
use crate::tables::ReferenceTables;
use crate::types::ProductKind;

/// 表の行に引き継ぐ文脈。ページごとに作り直し、区切り行で更新する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub model: Option<String>,
    /// 規格の原文
    pub standard_text: Option<String>,
    pub product_type: Option<String>,
    pub category: Option<String>,
}

/// 既知のモデル名を本文から探す
fn find_model_name(text: &str, tables: &ReferenceTables) -> Option<String> {
    let upper = text.to_uppercase();
    tables
        .model_names
        .iter()
        .find(|name| upper.contains(name.as_str()))
        .cloned()
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

impl PageContext {
    pub fn from_page(page: &RawPage, kind: ProductKind, tables: &ReferenceTables) -> Self {
        let title = non_empty(page.title.as_deref());
        let text = page.text.as_deref().unwrap_or("");
        let attribute = page.attribute(&["Normen", "Norm", "Standard"]).map(String::from);

        let model = title
            .and_then(|t| find_model_name(t, tables))
            .or_else(|| find_model_name(text, tables))
            .or_else(|| title.map(String::from));

        let standard_text = match kind {
            // 継手ページの本文には適合ホースの規格が並ぶため属性だけを使う
            ProductKind::Fitting => attribute,
            ProductKind::Hose => attribute
                .or_else(|| standard_lookahead(text, model.as_deref()))
                .or_else(|| title.and_then(find_standard_text))
                .or_else(|| model.as_deref().and_then(|m| infer_standard_from_model(m, tables)))
                .or_else(|| title.and_then(|t| infer_standard_from_model(t, tables))),
        };

        let product_type = title
            .map(String::from)
            .or_else(|| text.lines().map(str::trim).find(|l| !l.is_empty()).map(String::from));

        let category = page
            .attribute(&["Kategorie", "Category"])
            .map(String::from)
            .or_else(|| category_from_text(&format!("{} {}", title.unwrap_or(""), text), tables));

        Self {
            model,
            standard_text,
            product_type,
            category,
        }
    }

    /// 区切り行（"BALPAC IMPACTUS 2SN", "FEMALE METRIC LIGHT SERIE"）で文脈を更新
    pub fn absorb_section(&mut self, texts: &[String], kind: ProductKind, tables: &ReferenceTables) {
        let joined = texts.join(" ");
        if joined.trim().is_empty() {
            return;
        }

        if let Some(model) = find_model_name(&joined, tables) {
            if kind == ProductKind::Hose {
                let standard = find_standard_text(&joined)
                    .or_else(|| infer_standard_from_model(&joined, tables));
                // 別モデルに切り替わったら前のモデルの規格は引き継がない
                if standard.is_some() || self.model.as_deref() != Some(model.as_str()) {
                    self.standard_text = standard;
                }
            }
            self.model = Some(model);
        } else if kind == ProductKind::Hose {
            if let Some(standard) = find_standard_text(&joined) {
                self.standard_text = Some(standard);
            }
        }

        if let Some(category) = category_from_text(&joined, tables) {
            self.category = Some(category);
        }
        self.product_type = Some(joined);
    }
}
