use clap::Parser;
use hose_match_common::matcher::{count_kind, match_products};
use hose_match_common::{MatchConfig, MatchRun, Product, ProductKind, ReferenceTables, Supplier};
use hose_match_rust::{catalog, cli, config, error, export};
use cli::{Cli, Commands};
use config::Config;
use error::{HoseMatchError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  {bar:40.cyan/blue} {pos}/{len} 件 ({eta})")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb
}

/// 進捗バー付きで照合
fn run_match(kind: ProductKind, source: &[Product], target: &[Product], match_config: &MatchConfig) -> MatchRun {
    let pb = create_progress_bar(count_kind(source, kind) as u64);
    let tick: &(dyn Fn() + Sync) = &|| pb.inc(1);
    let run = match_products(kind, source, target, match_config, Some(tick));
    pb.finish_and_clear();
    run
}

fn print_run_summary(run: &MatchRun) {
    let stats = &run.stats;
    println!(
        "✔ {}件中 {}件が一致（未一致 {}件、しきい値未満 {}件）",
        stats.source_total, stats.matched, stats.unmatched, stats.below_threshold
    );
    let rejected = stats.rejections.total();
    if rejected > 0 {
        println!("  ゲート除外: {}組", rejected);
    }
    if stats.targets_claimed_multiple > 0 {
        println!("  複数の照合元に選ばれた照合先: {}件", stats.targets_claimed_multiple);
    }
}

fn ensure_kind(products: &[Product], kind: ProductKind, path: &Path) -> Result<()> {
    if !products.is_empty() && count_kind(products, kind) == 0 {
        return Err(HoseMatchError::KindMismatch(format!(
            "{} に {} の製品がありません",
            path.display(),
            kind
        )));
    }
    Ok(())
}

fn extract_side(
    input: &Path,
    supplier: Supplier,
    kind: ProductKind,
    tables: &ReferenceTables,
    output: &Path,
) -> Result<Vec<Product>> {
    let extraction = catalog::extract_catalog(input, supplier, kind, tables)?;
    let stats = &extraction.stats;
    println!(
        "✔ 供給元{}: {}ページ / 表{}件 / 製品{}件（スキップ {}行）",
        supplier, stats.pages, stats.tables_recognized, stats.products, stats.rows_dropped
    );
    catalog::save_products(&extraction.products, output)?;
    println!("  保存: {}", output.display());
    Ok(extraction.products)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { input, supplier, kind, output } => {
            println!("🔎 hose-match - 抽出\n");

            println!("[1/2] 参照テーブルを準備中...");
            let tables = ReferenceTables::new()?.with_model_names(&config.extra_model_names);
            println!("✔ 準備完了\n");

            println!("[2/2] ページを抽出中...");
            extract_side(&input, supplier, kind, &tables, &output)?;

            println!("\n✅ 抽出完了");
        }

        Commands::Match { source, target, kind, threshold, exclusive, parallel, output, xlsx } => {
            println!("🔗 hose-match - 照合\n");

            println!("[1/3] 製品一覧を読み込み中...");
            let source_products = catalog::load_products(&source)?;
            let target_products = catalog::load_products(&target)?;
            ensure_kind(&source_products, kind, &source)?;
            ensure_kind(&target_products, kind, &target)?;
            println!(
                "✔ 照合元 {}件 / 照合先 {}件\n",
                count_kind(&source_products, kind),
                count_kind(&target_products, kind)
            );

            let match_config = config.match_config(kind, threshold, exclusive, parallel)?;
            println!("[2/3] 照合中... (しきい値: {})", match_config.threshold);
            let run = run_match(kind, &source_products, &target_products, &match_config);
            print_run_summary(&run);
            println!();

            println!("[3/3] レポートを保存中...");
            let report = export::build_report(kind, &run, &source_products, &target_products, match_config.threshold)?;
            export::write_report_json(&report, &output)?;
            println!("✔ レポート: {}", output.display());
            if let Some(xlsx) = xlsx {
                export::excel::generate_excel(&report, &xlsx)?;
                println!("✔ Excel出力: {}", xlsx.display());
            }

            println!("\n✅ 照合完了");
        }

        Commands::Export { input, output } => {
            println!("📄 hose-match - エクスポート\n");

            let report = export::load_report(&input)?;
            let output = output.unwrap_or_else(|| input.with_extension("xlsx"));
            let output = export::output_path_for_format(&output, "report", "xlsx");

            println!("- Excelを生成中... ({}行)", report.rows.len());
            export::excel::generate_excel(&report, &output)?;
            println!("✔ Excel出力: {}", output.display());

            println!("\n✅ エクスポート完了");
        }

        Commands::Run { pages_a, pages_b, kind, threshold, exclusive, parallel, output } => {
            println!("🚀 hose-match - 一括処理\n");
            std::fs::create_dir_all(&output)?;
            let tables = ReferenceTables::new()?.with_model_names(&config.extra_model_names);

            // 片側の抽出に失敗しても、もう一方は保存してから終了する
            println!("[1/4] 供給元Aを抽出中...");
            let products_a = extract_side(&pages_a, Supplier::A, kind, &tables, &output.join(format!("{}_a.json", kind)));
            if let Err(e) = &products_a {
                println!("⚠ 供給元Aの抽出に失敗: {}", e);
            }
            println!();

            println!("[2/4] 供給元Bを抽出中...");
            let products_b = extract_side(&pages_b, Supplier::B, kind, &tables, &output.join(format!("{}_b.json", kind)));
            if let Err(e) = &products_b {
                println!("⚠ 供給元Bの抽出に失敗: {}", e);
            }
            println!();

            let products_a = products_a?;
            let products_b = products_b?;

            let match_config = config.match_config(kind, threshold, exclusive, parallel)?;
            println!("[3/4] 照合中... (しきい値: {})", match_config.threshold);
            let run = run_match(kind, &products_a, &products_b, &match_config);
            print_run_summary(&run);
            println!();

            println!("[4/4] レポートを保存中...");
            let report = export::build_report(kind, &run, &products_a, &products_b, match_config.threshold)?;
            let json_path = output.join(format!("{}_matches.json", kind));
            let xlsx_path: PathBuf = output.join(format!("{}_matches.xlsx", kind));
            export::write_report_json(&report, &json_path)?;
            println!("✔ レポート: {}", json_path.display());
            export::excel::generate_excel(&report, &xlsx_path)?;
            println!("✔ Excel出力: {}", xlsx_path.display());

            println!("\n✅ 完了");
        }

        Commands::Config { set_hose_threshold, set_fitting_threshold, set_many_to_one, add_model, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(value) = set_hose_threshold {
                config.set_threshold(ProductKind::Hose, value)?;
                println!("✔ ホースのしきい値を {} に設定しました", value);
                changed = true;
            }

            if let Some(value) = set_fitting_threshold {
                config.set_threshold(ProductKind::Fitting, value)?;
                println!("✔ 継手のしきい値を {} に設定しました", value);
                changed = true;
            }

            if let Some(value) = set_many_to_one {
                config.allow_many_to_one = value;
                println!("✔ 多対一の割り当て: {}", if value { "許可" } else { "禁止" });
                changed = true;
            }

            if let Some(name) = add_model {
                if config.add_model_name(&name) {
                    println!("✔ モデル名を追加しました: {}", name.trim().to_uppercase());
                    changed = true;
                } else {
                    println!("モデル名は登録済みです: {}", name);
                }
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定: {}", Config::config_path()?.display());
                println!("  ホースしきい値: {}", config.hose_threshold);
                println!("  継手しきい値: {}", config.fitting_threshold);
                println!("  多対一の割り当て: {}", if config.allow_many_to_one { "許可" } else { "禁止" });
                println!("  並列照合: {}", if config.parallel { "有効" } else { "無効" });
                println!("  追加モデル名: {}", if config.extra_model_names.is_empty() {
                    "なし".to_string()
                } else {
                    config.extra_model_names.join(", ")
                });
            }
        }
    }

    Ok(())
}
