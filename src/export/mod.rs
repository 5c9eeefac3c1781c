pub mod excel;

use crate::error::Result;
use hose_match_common::report::{project_matches, summarize};
use hose_match_common::{MatchReport, MatchRun, Match, Product, ProductKind};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 出力先がディレクトリなら既定のファイル名を付ける
pub fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

/// 一致一覧の SHA-256（16進）
pub fn fingerprint(matches: &[Match]) -> Result<String> {
    let json = serde_json::to_vec(matches)?;
    Ok(hex::encode(Sha256::digest(&json)))
}

/// 照合結果からレポートを作成
pub fn build_report(
    kind: ProductKind,
    run: &MatchRun,
    source: &[Product],
    target: &[Product],
    threshold: f64,
) -> Result<MatchReport> {
    Ok(MatchReport {
        kind,
        generated_at: chrono::Local::now().to_rfc3339(),
        fingerprint: fingerprint(&run.matches)?,
        summary: summarize(&run.matches, &run.stats, threshold),
        rows: project_matches(kind, &run.matches, source, target),
    })
}

pub fn write_report_json(report: &MatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<MatchReport> {
    let reader = BufReader::new(File::open(path)?);
    let report: MatchReport = serde_json::from_reader(reader)?;
    Ok(report)
}
