//! 継手行の組み立て
//!
//! 規格: 属性「Normen」> 製品種別・識別テキスト > カテゴリ
//! シール: 属性「Dichtform」> テキスト > カテゴリ既定値
//! シリーズ: テキスト > 品番の5文字目（ISO 8434-1 のメーカー品番）> 管外径・ねじ表

use super::context::PageContext;
use super::layout::{CellPattern, Field, RowCells, TableLayout};
use super::RawPage;
use crate::normalizer::{
    connection_from, dash_to_mm, extract_thread_size, find_dn, inch_from_dash, normalize_angle,
    normalize_decimal, normalize_gender, normalize_inch, normalize_seat_type, normalize_series,
    normalize_standard, normalize_thread_size, parse_dash_code, parse_dn, parse_tube_od,
    resolve_size_mm, seat_from_category, series_from_article, series_from_lookup,
    standard_from_category, thread_family_from,
};
use crate::tables::ReferenceTables;
use crate::types::{FittingRecord, Standard, StandardFamily};

fn is_iso_8434(standard: Option<&Standard>) -> bool {
    standard.is_some_and(|s| s.family == StandardFamily::Iso && s.code.as_deref() == Some("8434-1"))
}

pub(super) fn build_fitting(
    cells: &RowCells,
    context: &PageContext,
    page: &RawPage,
    layout: &TableLayout,
    tables: &ReferenceTables,
) -> Option<FittingRecord> {
    let article = cells
        .get(Field::ArticleNumber)
        .filter(|a| layout.article_pattern.map_or(true, |p| p.matches(a)));
    let reference = cells.get(Field::Reference);
    if article.is_none() && reference.is_none() {
        return None;
    }

    let identification = cells.get(Field::Identification);
    let dn = cells
        .get(Field::Dn)
        .and_then(parse_dn)
        .or_else(|| identification.and_then(find_dn));
    let dash = cells.get(Field::DashCode).and_then(parse_dash_code);
    let inch = cells
        .get(Field::InchSize)
        .and_then(normalize_inch)
        .or_else(|| dash.and_then(|code| inch_from_dash(code, tables)));
    let cell_mm = cells.get(Field::HoseSizeMm).and_then(normalize_decimal);
    if let (Some(mm), Some(table_mm)) = (cell_mm, dash.and_then(|code| dash_to_mm(code, tables))) {
        if (mm - table_mm).abs() > 0.5 {
            tracing::debug!(page = page.number, mm, table_mm, "ホースサイズをダッシュ表の値で補正");
        }
    }
    let size_mm = resolve_size_mm(dash, inch.as_deref(), cell_mm, tables);
    if dn.is_none() && size_mm.is_none() && inch.is_none() {
        return None;
    }

    let mut fitting = FittingRecord::new(layout.supplier);
    fitting.reference = reference.map(String::from);
    fitting.article_number = article.map(String::from);
    fitting.model = context.model.clone();
    fitting.product_type = context.product_type.clone();
    fitting.category = context.category.clone();
    fitting.source_url = page.url.clone();
    fitting.source_page = Some(page.number);

    fitting.nominal_diameter = dn;
    fitting.dash_code = dash.filter(|&code| tables.dash(code).is_some());
    fitting.inch_size = inch;
    fitting.size_mm = size_mm;

    let text = [
        page.title.as_deref(),
        context.product_type.as_deref(),
        reference,
        identification,
    ]
    .iter()
    .flatten()
    .copied()
    .collect::<Vec<_>>()
    .join(" ");
    let category = context.category.as_deref();

    fitting.thread_size = cells
        .get(Field::ThreadSize)
        .and_then(normalize_thread_size)
        .or_else(|| extract_thread_size(&text));
    fitting.tube_od_mm = cells
        .get(Field::TubeOd)
        .and_then(normalize_decimal)
        .or_else(|| parse_tube_od(&text));

    fitting.standard_text = context.standard_text.clone();
    fitting.standard = context
        .standard_text
        .as_deref()
        .and_then(|s| normalize_standard(s, tables))
        .or_else(|| normalize_standard(&text, tables))
        .or_else(|| category.and_then(|c| standard_from_category(c, context.product_type.as_deref(), tables)));

    fitting.connection = connection_from(category, &text);
    fitting.thread_family = thread_family_from(
        category,
        fitting.thread_size.as_deref(),
        fitting.standard.as_ref(),
    );
    fitting.seat_type = page
        .attribute(&["Dichtform", "Seat"])
        .and_then(normalize_seat_type)
        .or_else(|| normalize_seat_type(&text))
        .or_else(|| seat_from_category(category, fitting.standard.as_ref()));
    fitting.angle = normalize_angle(&text, fitting.connection);

    let code = article.or(reference).filter(|c| CellPattern::CatalogArticle.matches(c));
    fitting.series = normalize_series(&text)
        .or_else(|| {
            if layout.series_from_article && is_iso_8434(fitting.standard.as_ref()) {
                code.and_then(series_from_article)
            } else {
                None
            }
        })
        .or_else(|| {
            let od = fitting.tube_od_mm?;
            let thread = fitting.thread_size.as_deref()?;
            series_from_lookup(od, thread, tables)
        });

    fitting.gender = normalize_gender(page.attribute(&["Anschluss", "Connection"]), &text);

    Some(fitting)
}
