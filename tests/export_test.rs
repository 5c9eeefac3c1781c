//! レポート出力の統合テスト

use hose_match_common::matcher::match_products;
use hose_match_common::types::{Construction, HoseRecord, Pressure, Standard, StandardFamily};
use hose_match_common::{MatchConfig, Product, ProductKind, Supplier};
use hose_match_rust::export;
use std::path::Path;
use tempfile::tempdir;

fn create_test_hose(supplier: Supplier, index: u16) -> Product {
    let mut h = HoseRecord::new(supplier);
    h.reference = Some(format!("{}-{:02}", supplier, index));
    h.nominal_diameter = Some(6 + index * 2);
    h.working_pressure = Some(Pressure::mpa(40.0 - index as f64));
    h.standard = Some(Standard::new(StandardFamily::En, Some("853")));
    h.construction = Some(Construction::TwoWireBraid);
    Product::Hose(h)
}

fn catalog(supplier: Supplier, count: u16) -> Vec<Product> {
    (1..=count).map(|i| create_test_hose(supplier, i)).collect()
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("test_output.xlsx");

    let source = catalog(Supplier::A, 5);
    let target = catalog(Supplier::B, 5);
    let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
    let report = export::build_report(ProductKind::Hose, &run, &source, &target, 30.0).unwrap();
    assert_eq!(report.rows.len(), 5);

    let result = export::excel::generate_excel(&report, &output_path);

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    assert!(output_path.exists(), "Excelファイルが作成されていない");

    let metadata = std::fs::metadata(&output_path).expect("ファイルメタデータ取得失敗");
    assert!(metadata.len() > 0, "Excelファイルが空");
}

#[test]
fn test_excel_generation_empty_results() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.xlsx");

    let run = match_products(ProductKind::Fitting, &[], &[], &MatchConfig::for_kind(ProductKind::Fitting), None);
    let report = export::build_report(ProductKind::Fitting, &run, &[], &[], 60.0).unwrap();
    assert!(report.rows.is_empty());

    let result = export::excel::generate_excel(&report, &output_path);

    assert!(result.is_ok(), "空のExcel生成に失敗: {:?}", result.err());
}

#[test]
fn test_fingerprint_is_stable() {
    let source = catalog(Supplier::A, 4);
    let target = catalog(Supplier::B, 4);
    let first = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
    let second = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);

    assert_eq!(
        export::fingerprint(&first.matches).unwrap(),
        export::fingerprint(&second.matches).unwrap()
    );
    assert_ne!(
        export::fingerprint(&first.matches).unwrap(),
        export::fingerprint(&first.matches[1..]).unwrap()
    );
}

#[test]
fn test_report_json_is_camel_case() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = catalog(Supplier::A, 2);
    let target = catalog(Supplier::B, 2);
    let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
    let report = export::build_report(ProductKind::Hose, &run, &source, &target, 30.0).unwrap();

    let path = dir.path().join("report.json");
    export::write_report_json(&report, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();

    assert!(text.contains("\"generatedAt\""));
    assert!(text.contains("\"byQuality\""));
    assert!(text.contains("\"sourceTotal\": 2"));
    assert!(text.contains("\"kind\": \"hose\""));
    // 列順は宣言順のまま
    let source_key = text.find("\"Source Key\"").unwrap();
    let target_key = text.find("\"Target Key\"").unwrap();
    let score = text.find("\"Score\"").unwrap();
    assert!(source_key < target_key && target_key < score);
}

#[test]
fn test_output_path_for_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    assert_eq!(
        export::output_path_for_format(dir.path(), "report", "xlsx"),
        dir.path().join("report.xlsx")
    );
    assert_eq!(
        export::output_path_for_format(Path::new("out/matches.xlsx"), "report", "xlsx"),
        Path::new("out/matches.xlsx")
    );
}
