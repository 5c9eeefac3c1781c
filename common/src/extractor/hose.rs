//! ホース行の組み立て

use super::context::PageContext;
use super::layout::{Field, RowCells, TableLayout};
use super::RawPage;
use crate::normalizer::{
    inch_from_dash, normalize_construction, normalize_decimal, normalize_inch, normalize_standard,
    parse_dash_code, parse_dn, resolve_size_mm,
};
use crate::tables::ReferenceTables;
use crate::types::{HoseRecord, Pressure, PressureUnit};

/// 圧力セル（"45,0 6600" のように併記されていれば最初の値）
fn pressure(text: &str, unit: PressureUnit) -> Option<Pressure> {
    let value = normalize_decimal(text)?;
    Some(Pressure { value, unit })
}

pub(super) fn build_hose(
    cells: &RowCells,
    context: &PageContext,
    page: &RawPage,
    layout: &TableLayout,
    tables: &ReferenceTables,
) -> Option<HoseRecord> {
    let article = cells
        .get(Field::ArticleNumber)
        .filter(|a| layout.article_pattern.map_or(true, |p| p.matches(a)));
    let reference = cells.get(Field::Reference);
    if article.is_none() && reference.is_none() {
        return None;
    }

    let dn = cells.get(Field::Dn).and_then(parse_dn);
    let dash_cell = cells.get(Field::DashCode);
    let dash = dash_cell.and_then(parse_dash_code);
    // 「Zoll」列に分数が入っていることがある
    let inch = cells
        .get(Field::InchSize)
        .and_then(normalize_inch)
        .or_else(|| if dash.is_none() { dash_cell.and_then(normalize_inch) } else { None })
        .or_else(|| dash.and_then(|code| inch_from_dash(code, tables)));
    if dn.is_none() && dash.is_none() && inch.is_none() {
        return None;
    }

    let mut hose = HoseRecord::new(layout.supplier);
    hose.reference = reference.map(String::from);
    hose.article_number = article.map(String::from);
    hose.model = context.model.clone();
    hose.category = page.attribute(&["Kategorie", "Category"]).map(String::from);
    hose.source_url = page.url.clone();
    hose.source_page = Some(page.number);

    hose.nominal_diameter = dn;
    hose.dash_code = dash.filter(|&code| tables.dash(code).is_some());
    hose.size_mm = resolve_size_mm(dash, inch.as_deref(), None, tables).or(dn.map(f64::from));
    hose.inch_size = inch;

    hose.standard_text = context.standard_text.clone();
    hose.standard = context
        .standard_text
        .as_deref()
        .and_then(|s| normalize_standard(s, tables));
    hose.construction = Some(normalize_construction(
        reference,
        context.model.as_deref(),
        context.standard_text.as_deref(),
        tables,
    ));

    hose.inner_diameter_mm = cells.get(Field::InnerDiameter).and_then(normalize_decimal);
    hose.outer_diameter_mm = cells.get(Field::OuterDiameter).and_then(normalize_decimal);
    hose.working_pressure = cells
        .get(Field::WorkingPressure)
        .and_then(|t| pressure(t, layout.pressure_unit));
    hose.burst_pressure = cells
        .get(Field::BurstPressure)
        .and_then(|t| pressure(t, layout.pressure_unit));
    hose.bend_radius_mm = cells.get(Field::BendRadius).and_then(normalize_decimal);
    hose.weight_kg_per_m = cells.get(Field::Weight).and_then(normalize_decimal);

    Some(hose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::layout::{ResolvedTable, SHOP_HOSE};
    use crate::types::{Construction, StandardFamily, Supplier};

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|c| Some(c.to_string())).collect()
    }

    fn shop_cells(values: &[&str]) -> RowCells {
        let header = row(&["DN", "Zoll", "Ø innen", "Ø aussen", "Biegeradius", "Berstdruck bar", "Betriebsdruck bar", "Gewicht", "Prod. Nr.", "Art. Nr."]);
        let resolved = ResolvedTable::resolve(&SHOP_HOSE, Some(header.as_slice()), &[]).unwrap();
        resolved.read_row(&row(values))
    }

    fn shop_context() -> PageContext {
        PageContext {
            model: Some("Hydraulikschlauch 2SC".to_string()),
            standard_text: Some("DIN EN 857 2SC".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_shop_hose_row_in_bar() {
        let tables = ReferenceTables::new().unwrap();
        let cells = shop_cells(&["10", "06", "9,5", "17,5", "90", "1400", "350", "0,3", "2SC-06", "123456"]);
        let hose = build_hose(&cells, &shop_context(), &RawPage::default(), &SHOP_HOSE, &tables).unwrap();

        assert_eq!(hose.supplier(), Supplier::B);
        assert_eq!(hose.nominal_diameter, Some(10));
        assert_eq!(hose.dash_code, Some(6));
        assert_eq!(hose.inch_size.as_deref(), Some("3/8\""));
        assert_eq!(hose.size_mm, Some(9.5));
        let wp = hose.working_pressure.unwrap();
        assert_eq!(wp.unit, PressureUnit::Bar);
        assert!((wp.to_mpa() - 35.0).abs() < 1e-9);
        assert_eq!(hose.standard.as_ref().unwrap().family, StandardFamily::En);
        assert_eq!(hose.standard.unwrap().code.as_deref(), Some("857"));
        assert_eq!(hose.construction, Some(Construction::TwoWireBraid));
        assert_eq!(hose.article_number.as_deref(), Some("123456"));
    }

    #[test]
    fn test_inch_fraction_in_code_column() {
        let tables = ReferenceTables::new().unwrap();
        let cells = shop_cells(&["12", "1/2\"", "12,7", "", "", "", "", "", "", "654321"]);
        let hose = build_hose(&cells, &shop_context(), &RawPage::default(), &SHOP_HOSE, &tables).unwrap();
        assert_eq!(hose.dash_code, None);
        assert_eq!(hose.inch_size.as_deref(), Some("1/2\""));
        assert_eq!(hose.size_mm, Some(12.7));
    }

    #[test]
    fn test_row_without_identifier_or_size_is_dropped() {
        let tables = ReferenceTables::new().unwrap();
        // 品番の桁数が不正
        let cells = shop_cells(&["10", "06", "", "", "", "", "", "", "", "12"]);
        assert!(build_hose(&cells, &shop_context(), &RawPage::default(), &SHOP_HOSE, &tables).is_none());
        // サイズなし
        let cells = shop_cells(&["", "", "", "", "", "", "", "", "", "123456"]);
        assert!(build_hose(&cells, &shop_context(), &RawPage::default(), &SHOP_HOSE, &tables).is_none());
    }

    #[test]
    fn test_first_number_of_combined_pressure_cell() {
        assert_eq!(pressure("45,0 6600", PressureUnit::Mpa).unwrap().value, 45.0);
        assert!(pressure("-", PressureUnit::Bar).is_none());
    }
}
