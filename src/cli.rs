use clap::{Parser, Subcommand};
use hose_match_common::{ProductKind, Supplier};
use std::path::PathBuf;

/// しきい値の引数（0〜100）
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("数値ではありません: {}", s))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("0〜100 の範囲で指定してください: {}", s))
    }
}

#[derive(Parser)]
#[command(name = "hose-match")]
#[command(about = "油圧ホース・継手カタログ照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カタログのページから製品一覧を抽出
    Extract {
        /// ページ入力（JSON / xlsx / フォルダ）
        #[arg(required = true)]
        input: PathBuf,

        /// 供給元 (a: メーカーカタログ / b: 販売店ショップ)
        #[arg(short, long)]
        supplier: Supplier,

        /// 製品種別 (hose/fitting)
        #[arg(short, long, default_value = "hose")]
        kind: ProductKind,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "products.json")]
        output: PathBuf,
    },

    /// 2つの製品一覧を照合
    Match {
        /// 照合元の製品JSON
        #[arg(required = true)]
        source: PathBuf,

        /// 照合先の製品JSON
        #[arg(required = true)]
        target: PathBuf,

        /// 製品種別 (hose/fitting)
        #[arg(short, long, default_value = "hose")]
        kind: ProductKind,

        /// 一致とみなすスコア（省略時は設定値）
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// 照合先を1件の照合元にだけ割り当てる
        #[arg(long)]
        exclusive: bool,

        /// 並列で照合
        #[arg(long)]
        parallel: bool,

        /// 出力レポートJSON
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Excelレポートも出力
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// レポートJSONからExcelを生成
    Export {
        /// 入力レポートJSON
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 抽出から照合・Excel出力まで一括実行
    Run {
        /// 供給元Aのページ入力
        #[arg(required = true)]
        pages_a: PathBuf,

        /// 供給元Bのページ入力
        #[arg(required = true)]
        pages_b: PathBuf,

        /// 製品種別 (hose/fitting)
        #[arg(short, long, default_value = "hose")]
        kind: ProductKind,

        /// 一致とみなすスコア（省略時は設定値）
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// 照合先を1件の照合元にだけ割り当てる
        #[arg(long)]
        exclusive: bool,

        /// 並列で照合
        #[arg(long)]
        parallel: bool,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// ホースのしきい値を設定
        #[arg(long, value_parser = parse_threshold)]
        set_hose_threshold: Option<f64>,

        /// 継手のしきい値を設定
        #[arg(long, value_parser = parse_threshold)]
        set_fitting_threshold: Option<f64>,

        /// 多対一の割り当てを許可するか (true/false)
        #[arg(long)]
        set_many_to_one: Option<bool>,

        /// 認識するモデル名を追加
        #[arg(long)]
        add_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
