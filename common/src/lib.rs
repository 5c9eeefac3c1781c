//! Hose Match Common Library
//!
//! カタログ抽出と照合のコア（CLIから利用）

pub mod error;
pub mod types;
pub mod tables;
pub mod normalizer;
pub mod extractor;
pub mod gate;
pub mod scorer;
pub mod matcher;
pub mod report;
pub mod export;

pub use error::{Error, Result};
pub use types::{
    FittingRecord, HoseRecord, Match, Product, ProductKind, Quality, RecordRef, Supplier,
};
pub use tables::ReferenceTables;
pub use extractor::{Extraction, ExtractionStats, Extractor, RawPage, RawTable};
pub use gate::{GateDecision, RejectReason};
pub use scorer::{Comparable, Evaluation, FittingWeights, HoseWeights};
pub use matcher::{match_products, MatchConfig, MatchRun, MatchStats};
pub use report::{project_matches, summarize, CellValue, MatchReport, ReportRow, ReportSummary};
