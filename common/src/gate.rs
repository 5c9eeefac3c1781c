//! 互換性ゲート
//!
//! 採点の前に、物理的に置き換えられない組み合わせを除外する。
//! どちらかの値が不明な場合は除外しない。

use crate::types::{ConstructionFamily, FittingRecord, HoseRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 除外理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    ConstructionTextileVsWire,
    ConstructionSpiralVsNonSpiral,
    AngleMismatch,
    SeriesMismatch,
    StandardMismatch,
}

impl RejectReason {
    pub const ALL: [RejectReason; 5] = [
        RejectReason::ConstructionTextileVsWire,
        RejectReason::ConstructionSpiralVsNonSpiral,
        RejectReason::AngleMismatch,
        RejectReason::SeriesMismatch,
        RejectReason::StandardMismatch,
    ];
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::ConstructionTextileVsWire => "textile vs wire construction",
            RejectReason::ConstructionSpiralVsNonSpiral => "spiral vs non-spiral construction",
            RejectReason::AngleMismatch => "angle mismatch",
            RejectReason::SeriesMismatch => "series mismatch",
            RejectReason::StandardMismatch => "standard mismatch",
        };
        write!(f, "{}", s)
    }
}

/// ゲート判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Reject(RejectReason),
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// ホースの組み合わせ判定（補強構造の系統）
pub fn gate_hose(a: &HoseRecord, b: &HoseRecord) -> GateDecision {
    let (Some(ca), Some(cb)) = (a.construction, b.construction) else {
        return GateDecision::Proceed;
    };

    use ConstructionFamily::*;
    match (ca.family(), cb.family()) {
        (Textile, Wire) | (Wire, Textile) | (Textile, Spiral) | (Spiral, Textile) => {
            GateDecision::Reject(RejectReason::ConstructionTextileVsWire)
        }
        (Spiral, other) | (other, Spiral) if other != Spiral => {
            GateDecision::Reject(RejectReason::ConstructionSpiralVsNonSpiral)
        }
        _ => GateDecision::Proceed,
    }
}

/// 継手の組み合わせ判定（角度 > シリーズ > 規格ファミリー）
pub fn gate_fitting(a: &FittingRecord, b: &FittingRecord) -> GateDecision {
    if let (Some(x), Some(y)) = (a.angle, b.angle) {
        if x != y {
            return GateDecision::Reject(RejectReason::AngleMismatch);
        }
    }
    if let (Some(x), Some(y)) = (a.series, b.series) {
        if x != y {
            return GateDecision::Reject(RejectReason::SeriesMismatch);
        }
    }
    if let (Some(x), Some(y)) = (&a.standard, &b.standard) {
        if x.family != y.family {
            return GateDecision::Reject(RejectReason::StandardMismatch);
        }
    }
    GateDecision::Proceed
}
