//! 照合処理
//!
//! 照合元の各レコードについて全候補をゲート判定・採点し、最高点の候補を採用する。
//! 同点は先に見つかった候補を優先し、しきい値以上なら一致とする。

use crate::gate::{GateDecision, RejectReason};
use crate::scorer::{Comparable, Evaluation, FittingWeights, HoseWeights};
use crate::types::{FittingRecord, HoseRecord, Match, Product, ProductKind, RecordRef};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 照合設定
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// この値以上で一致
    pub threshold: f64,
    /// 同じ照合先を複数の照合元に割り当てる
    pub allow_many_to_one: bool,
    /// 照合元ごとの探索を並列化する（多対一のときのみ）
    pub parallel: bool,
}

impl MatchConfig {
    pub fn for_kind(kind: ProductKind) -> Self {
        let threshold = match kind {
            ProductKind::Hose => HoseRecord::DEFAULT_THRESHOLD,
            ProductKind::Fitting => FittingRecord::DEFAULT_THRESHOLD,
        };
        Self {
            threshold,
            allow_many_to_one: true,
            parallel: false,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::for_kind(ProductKind::Hose)
    }
}

/// 除外理由ごとの件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionCounts {
    pub construction_textile_vs_wire: usize,
    pub construction_spiral_vs_non_spiral: usize,
    pub angle_mismatch: usize,
    pub series_mismatch: usize,
    pub standard_mismatch: usize,
}

impl RejectionCounts {
    pub fn record(&mut self, reason: RejectReason) {
        *self.slot(reason) += 1;
    }

    fn slot(&mut self, reason: RejectReason) -> &mut usize {
        match reason {
            RejectReason::ConstructionTextileVsWire => &mut self.construction_textile_vs_wire,
            RejectReason::ConstructionSpiralVsNonSpiral => &mut self.construction_spiral_vs_non_spiral,
            RejectReason::AngleMismatch => &mut self.angle_mismatch,
            RejectReason::SeriesMismatch => &mut self.series_mismatch,
            RejectReason::StandardMismatch => &mut self.standard_mismatch,
        }
    }

    pub fn get(&self, reason: RejectReason) -> usize {
        match reason {
            RejectReason::ConstructionTextileVsWire => self.construction_textile_vs_wire,
            RejectReason::ConstructionSpiralVsNonSpiral => self.construction_spiral_vs_non_spiral,
            RejectReason::AngleMismatch => self.angle_mismatch,
            RejectReason::SeriesMismatch => self.series_mismatch,
            RejectReason::StandardMismatch => self.standard_mismatch,
        }
    }

    pub fn total(&self) -> usize {
        RejectReason::ALL.iter().map(|r| self.get(*r)).sum()
    }

    fn merge(&mut self, other: &RejectionCounts) {
        for reason in RejectReason::ALL {
            *self.slot(reason) += other.get(reason);
        }
    }
}

/// 照合の集計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub source_total: usize,
    pub target_total: usize,
    pub pairs_evaluated: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// しきい値未満で不採用になった照合元
    pub below_threshold: usize,
    pub rejections: RejectionCounts,
    /// 複数の照合元から選ばれた照合先の数
    pub targets_claimed_multiple: usize,
}

/// 照合結果
#[derive(Debug, Clone, Default)]
pub struct MatchRun {
    pub matches: Vec<Match>,
    pub stats: MatchStats,
}

/// 照合元1件の探索結果
struct Scan {
    best: Option<(usize, Evaluation)>,
    evaluated: usize,
    rejections: RejectionCounts,
}

fn scan<T: Comparable>(
    source: &T,
    targets: &[(usize, &T)],
    weights: &T::Weights,
    claimed: Option<&HashSet<usize>>,
) -> Scan {
    let mut result = Scan {
        best: None,
        evaluated: 0,
        rejections: RejectionCounts::default(),
    };

    for (index, (_, target)) in targets.iter().enumerate() {
        if claimed.is_some_and(|c| c.contains(&index)) {
            continue;
        }
        result.evaluated += 1;

        if let GateDecision::Reject(reason) = source.gate(target) {
            result.rejections.record(reason);
            continue;
        }

        let evaluation = source.score(target, weights);
        let better = match &result.best {
            Some((_, best)) => evaluation.score > best.score,
            None => true,
        };
        if better {
            result.best = Some((index, evaluation));
        }
    }

    result
}

/// 位置付きレコード列を照合
pub fn match_records<T: Comparable + Sync>(
    source: &[(usize, &T)],
    target: &[(usize, &T)],
    config: &MatchConfig,
    weights: &T::Weights,
    progress: Option<&(dyn Fn() + Sync)>,
) -> MatchRun {
    let tick = || {
        if let Some(progress) = progress {
            progress();
        }
    };

    let mut stats = MatchStats {
        source_total: source.len(),
        target_total: target.len(),
        ..Default::default()
    };
    let mut matches = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut claim_counts: HashMap<usize, usize> = HashMap::new();

    let mut accept = |src: &(usize, &T), result: Scan, stats: &mut MatchStats| -> Option<usize> {
        stats.pairs_evaluated += result.evaluated;
        stats.rejections.merge(&result.rejections);

        let (index, evaluation) = result.best?;
        if evaluation.score < config.threshold {
            stats.below_threshold += 1;
            return None;
        }

        let (src_pos, src_record) = src;
        let (tgt_pos, tgt_record) = target[index];
        matches.push(Match::new(
            RecordRef::new(src_record.supplier(), *src_pos, src_record.key()),
            RecordRef::new(tgt_record.supplier(), tgt_pos, tgt_record.key()),
            evaluation.score,
            T::quality(evaluation.score, weights),
            evaluation.reasons,
            evaluation.warnings,
        ));
        *claim_counts.entry(index).or_insert(0) += 1;
        Some(index)
    };

    if config.allow_many_to_one && config.parallel {
        let scans: Vec<Scan> = source
            .par_iter()
            .map(|(_, record)| {
                let result = scan(*record, target, weights, None);
                tick();
                result
            })
            .collect();
        for (src, result) in source.iter().zip(scans) {
            accept(src, result, &mut stats);
        }
    } else {
        for src in source {
            let exclusive = (!config.allow_many_to_one).then_some(&claimed);
            let result = scan(src.1, target, weights, exclusive);
            tick();
            if let Some(index) = accept(src, result, &mut stats) {
                if !config.allow_many_to_one {
                    claimed.insert(index);
                }
            }
        }
    }

    stats.matched = matches.len();
    stats.unmatched = stats.source_total - stats.matched;
    stats.targets_claimed_multiple = claim_counts.values().filter(|&&n| n > 1).count();

    tracing::info!(
        sources = stats.source_total,
        targets = stats.target_total,
        matched = stats.matched,
        rejected = stats.rejections.total(),
        "照合完了"
    );

    MatchRun { matches, stats }
}

/// 指定種別の製品だけを位置付きで取り出す
fn indexed<'p, T>(products: &'p [Product], pick: impl Fn(&'p Product) -> Option<&'p T>) -> Vec<(usize, &'p T)> {
    products
        .iter()
        .enumerate()
        .filter_map(|(i, p)| pick(p).map(|r| (i, r)))
        .collect()
}

/// 製品一覧を照合（種別の異なる製品は無視する）
pub fn match_products(
    kind: ProductKind,
    source: &[Product],
    target: &[Product],
    config: &MatchConfig,
    progress: Option<&(dyn Fn() + Sync)>,
) -> MatchRun {
    match kind {
        ProductKind::Hose => match_records(
            &indexed(source, Product::as_hose),
            &indexed(target, Product::as_hose),
            config,
            &HoseWeights::default(),
            progress,
        ),
        ProductKind::Fitting => match_records(
            &indexed(source, Product::as_fitting),
            &indexed(target, Product::as_fitting),
            config,
            &FittingWeights::default(),
            progress,
        ),
    }
}

/// 照合元として数える製品数
pub fn count_kind(products: &[Product], kind: ProductKind) -> usize {
    products.iter().filter(|p| p.kind() == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Construction, Pressure, Quality, Standard, StandardFamily, Supplier};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn hose(supplier: Supplier, dn: u16, mpa: f64, construction: Construction) -> Product {
        let mut h = HoseRecord::new(supplier);
        h.reference = Some(format!("{}-{}", supplier, dn));
        h.nominal_diameter = Some(dn);
        h.working_pressure = Some(Pressure::mpa(mpa));
        h.standard = Some(Standard::new(StandardFamily::En, Some("853")));
        h.construction = Some(construction);
        Product::Hose(h)
    }

    fn catalog() -> (Vec<Product>, Vec<Product>) {
        let source = vec![
            hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::A, 12, 40.0, Construction::TwoWireBraid),
            hose(Supplier::A, 10, 8.0, Construction::TextileBraid),
        ];
        let target = vec![
            hose(Supplier::B, 12, 40.0, Construction::TwoWireBraid),
            hose(Supplier::B, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::B, 10, 8.0, Construction::TwoWireBraid),
        ];
        (source, target)
    }

    // ===== 照合テスト =====

    #[test]
    fn test_best_candidate_selected() {
        let (source, target) = catalog();
        let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);

        assert_eq!(run.matches.len(), 2);
        assert_eq!(run.matches[0].source().position, 0);
        assert_eq!(run.matches[0].target().position, 1);
        assert_eq!(run.matches[0].score(), 90.0);
        assert_eq!(run.matches[0].quality(), Quality::Excellent);
        assert_eq!(run.matches[1].target().position, 0);

        // 繊維ホースはワイヤー補強の候補と組まれない
        assert_eq!(run.stats.rejections.construction_textile_vs_wire, 3);
        assert_eq!(run.stats.unmatched, 1);
        assert_eq!(run.stats.pairs_evaluated, 9);
    }

    #[test]
    fn test_first_seen_wins_on_tie() {
        let source = vec![hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid)];
        let target = vec![
            hose(Supplier::B, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::B, 16, 35.0, Construction::TwoWireBraid),
        ];
        let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
        assert_eq!(run.matches[0].target().position, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let source = vec![hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid)];
        // DN差・圧力差で規格20点 + 構造15点 = 35点
        let target = vec![hose(Supplier::B, 40, 10.0, Construction::TwoWireBraid)];

        let mut config = MatchConfig::default();
        config.threshold = 35.0;
        let run = match_products(ProductKind::Hose, &source, &target, &config, None);
        assert_eq!(run.matches.len(), 1);
        assert_eq!(run.matches[0].score(), 35.0);

        config.threshold = 35.1;
        let run = match_products(ProductKind::Hose, &source, &target, &config, None);
        assert!(run.matches.is_empty());
        assert_eq!(run.stats.below_threshold, 1);
    }

    #[test]
    fn test_many_to_one_by_default() {
        let source = vec![
            hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid),
        ];
        let target = vec![hose(Supplier::B, 16, 35.0, Construction::TwoWireBraid)];
        let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
        assert_eq!(run.matches.len(), 2);
        assert_eq!(run.stats.targets_claimed_multiple, 1);
    }

    #[test]
    fn test_exclusive_claiming_in_source_order() {
        let source = vec![
            hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::A, 16, 35.0, Construction::TwoWireBraid),
        ];
        let target = vec![
            hose(Supplier::B, 16, 35.0, Construction::TwoWireBraid),
            hose(Supplier::B, 16, 31.0, Construction::TwoWireBraid),
        ];
        let config = MatchConfig {
            allow_many_to_one: false,
            ..Default::default()
        };
        let run = match_products(ProductKind::Hose, &source, &target, &config, None);
        assert_eq!(run.matches.len(), 2);
        assert_eq!(run.matches[0].target().position, 0);
        assert_eq!(run.matches[1].target().position, 1);
        assert_eq!(run.stats.targets_claimed_multiple, 0);
    }

    #[test]
    fn test_parallel_equals_sequential() {
        let (source, target) = catalog();
        let sequential = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
        let config = MatchConfig {
            parallel: true,
            ..Default::default()
        };
        let parallel = match_products(ProductKind::Hose, &source, &target, &config, None);
        assert_eq!(sequential.matches, parallel.matches);
        assert_eq!(sequential.stats, parallel.stats);
    }

    #[test]
    fn test_progress_ticks_per_source() {
        let (source, target) = catalog();
        let ticks = AtomicUsize::new(0);
        let progress = || {
            ticks.fetch_add(1, Ordering::SeqCst);
        };
        match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), Some(&progress));
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_other_kind_is_ignored() {
        let (mut source, target) = catalog();
        source.insert(0, Product::Fitting(crate::types::FittingRecord::new(Supplier::A)));
        let run = match_products(ProductKind::Hose, &source, &target, &MatchConfig::default(), None);
        assert_eq!(run.stats.source_total, 3);
        // 位置は元の一覧での位置
        assert_eq!(run.matches[0].source().position, 1);
        assert_eq!(count_kind(&source, ProductKind::Fitting), 1);
    }

    #[test]
    fn test_fitting_default_threshold() {
        assert_eq!(MatchConfig::for_kind(ProductKind::Fitting).threshold, 60.0);
        assert_eq!(MatchConfig::default().threshold, 30.0);
    }
}
