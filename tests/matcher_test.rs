//! 照合の性質テスト（決定性・並列・境界）

use hose_match_common::matcher::match_products;
use hose_match_common::types::{
    Angle, Construction, FittingRecord, HoseRecord, Pressure, Series, Standard, StandardFamily,
};
use hose_match_common::{GateDecision, MatchConfig, Product, ProductKind, Supplier};
use hose_match_common::gate::{gate_fitting, gate_hose};
use hose_match_common::scorer::{Comparable, FittingWeights, HoseWeights};

const CONSTRUCTIONS: [Construction; 4] = [
    Construction::TwoWireBraid,
    Construction::OneWireBraid,
    Construction::SpiralWire,
    Construction::TextileBraid,
];

/// 寸法・圧力・構造を振ったホース一覧
fn hose_grid(supplier: Supplier, offset: f64) -> Vec<Product> {
    let mut products = Vec::new();
    for (i, dn) in [6u16, 8, 10, 12, 16, 20, 25, 32].iter().enumerate() {
        for (j, construction) in CONSTRUCTIONS.iter().enumerate() {
            let mut h = HoseRecord::new(supplier);
            h.reference = Some(format!("{}-{}-{}", supplier, dn, j));
            h.nominal_diameter = Some(*dn);
            h.working_pressure = Some(Pressure::mpa(10.0 + (i * 4 + j) as f64 + offset));
            let code = if j % 2 == 0 { "853" } else { "857" };
            h.standard = Some(Standard::new(StandardFamily::En, Some(code)));
            h.construction = Some(*construction);
            if j == 3 {
                h.inner_diameter_mm = Some(*dn as f64 + offset / 10.0);
            }
            products.push(Product::Hose(h));
        }
    }
    products
}

fn fitting(supplier: Supplier, dn: u16, angle: Option<Angle>, series: Option<Series>) -> FittingRecord {
    let mut f = FittingRecord::new(supplier);
    f.reference = Some(format!("{}-{}", supplier, dn));
    f.nominal_diameter = Some(dn);
    f.angle = angle;
    f.series = series;
    f.standard = Some(Standard::new(StandardFamily::Iso, Some("8434-1")));
    f
}

// ===== 決定性テスト =====

#[test]
fn test_two_runs_serialize_identically() {
    let source = hose_grid(Supplier::A, 0.0);
    let target = hose_grid(Supplier::B, 1.5);
    let config = MatchConfig::default();

    let first = match_products(ProductKind::Hose, &source, &target, &config, None);
    let second = match_products(ProductKind::Hose, &source, &target, &config, None);

    assert_eq!(
        serde_json::to_string(&first.matches).unwrap(),
        serde_json::to_string(&second.matches).unwrap()
    );
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_parallel_equals_sequential() {
    let source = hose_grid(Supplier::A, 0.0);
    let target = hose_grid(Supplier::B, 2.0);
    let sequential = MatchConfig::default();
    let parallel = MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    };

    let a = match_products(ProductKind::Hose, &source, &target, &sequential, None);
    let b = match_products(ProductKind::Hose, &source, &target, &parallel, None);
    assert_eq!(a.matches, b.matches);
    assert_eq!(a.stats, b.stats);
}

// ===== 範囲・件数テスト =====

#[test]
fn test_scores_within_bounds_and_above_threshold() {
    let source = hose_grid(Supplier::A, 0.0);
    let target = hose_grid(Supplier::B, 3.0);
    let config = MatchConfig::default();
    let run = match_products(ProductKind::Hose, &source, &target, &config, None);

    assert!(!run.matches.is_empty());
    for m in &run.matches {
        assert!((0.0..=100.0).contains(&m.score()));
        assert!(m.score() >= config.threshold);
    }
    assert_eq!(run.stats.matched + run.stats.unmatched, run.stats.source_total);
    assert_eq!(run.stats.pairs_evaluated, source.len() * target.len());
}

#[test]
fn test_exclusive_never_reuses_target() {
    let source = hose_grid(Supplier::A, 0.0);
    let target = hose_grid(Supplier::B, 0.5);
    let config = MatchConfig {
        allow_many_to_one: false,
        ..MatchConfig::default()
    };
    let run = match_products(ProductKind::Hose, &source, &target, &config, None);

    let mut positions: Vec<usize> = run.matches.iter().map(|m| m.target().position).collect();
    let total = positions.len();
    positions.sort_unstable();
    positions.dedup();
    assert_eq!(positions.len(), total);
    assert_eq!(run.stats.targets_claimed_multiple, 0);
}

#[test]
fn test_matched_pairs_pass_gate() {
    let source = hose_grid(Supplier::A, 0.0);
    let target = hose_grid(Supplier::B, 1.0);
    let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);

    for m in &run.matches {
        let a = source[m.source().position].as_hose().unwrap();
        let b = target[m.target().position].as_hose().unwrap();
        assert!(gate_hose(a, b).is_proceed());
        assert_eq!(m.source().key.as_deref(), source[m.source().position].key());
    }
}

// ===== ゲート単調性テスト =====

#[test]
fn test_gate_rejection_is_not_rescued_by_other_fields() {
    // 他の属性がすべて一致していても角度違いは除外
    let a = fitting(Supplier::A, 12, Some(Angle::Deg90), Some(Series::Light));
    let b = fitting(Supplier::B, 12, Some(Angle::Deg45), Some(Series::Light));
    assert!(matches!(gate_fitting(&a, &b), GateDecision::Reject(_)));

    let run = match_products(
        ProductKind::Fitting,
        &[Product::Fitting(a)],
        &[Product::Fitting(b)],
        &MatchConfig {
            threshold: 0.0,
            ..MatchConfig::for_kind(ProductKind::Fitting)
        },
        None,
    );
    assert!(run.matches.is_empty());
    assert_eq!(run.stats.rejections.total(), 1);
}

#[test]
fn test_threshold_is_inclusive() {
    let a = fitting(Supplier::A, 12, Some(Angle::Straight), Some(Series::Light));
    let b = fitting(Supplier::B, 12, Some(Angle::Straight), Some(Series::Light));
    let score = a.score(&b, &FittingWeights::default()).score;

    let at = MatchConfig {
        threshold: score,
        ..MatchConfig::for_kind(ProductKind::Fitting)
    };
    let above = MatchConfig {
        threshold: score + 0.1,
        ..MatchConfig::for_kind(ProductKind::Fitting)
    };
    let source = [Product::Fitting(a)];
    let target = [Product::Fitting(b)];

    assert_eq!(match_products(ProductKind::Fitting, &source, &target, &at, None).matches.len(), 1);
    let run = match_products(ProductKind::Fitting, &source, &target, &above, None);
    assert!(run.matches.is_empty());
    assert_eq!(run.stats.below_threshold, 1);
}

#[test]
fn test_bar_and_mpa_score_the_same() {
    let mut a = HoseRecord::new(Supplier::A);
    a.nominal_diameter = Some(10);
    a.working_pressure = Some(Pressure::mpa(35.0));
    let mut b = a.clone();
    b.working_pressure = Some(Pressure::bar(350.0));
    let mut c = a.clone();
    c.working_pressure = Some(Pressure::mpa(35.0));

    let weights = HoseWeights::default();
    assert_eq!(a.score(&b, &weights).score, a.score(&c, &weights).score);
}
