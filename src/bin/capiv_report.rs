//! Capítulo IV production report
//!
//! Resolves the two source datasets (download-and-cache for URLs, local
//! paths pass through), runs the full report and prints it, optionally
//! exporting the normalized tables as CSV.
//!
//! Usage:
//!   cargo run --bin capiv-report
//!   cargo run --bin capiv-report -- --production data/prod.csv --no-fracture
//!   cargo run --bin capiv-report -- --company VISTA --gor-threshold 15000 --json

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use capiv::config::AnalysisConfig;
use capiv::export;
use capiv::ingest::{load_fracture_csv, load_production_csv};
use capiv::report::{run_report, ProductionReport, ReportParams};
use capiv::source::{DatasetCache, FRACTURE_DATASET_URL, PRODUCTION_DATASET_URL};

#[derive(Parser, Debug)]
#[command(
    name = "capiv-report",
    about = "Production analytics over the Capítulo IV open datasets"
)]
struct Cli {
    /// Production CSV: local path or http(s) URL
    #[arg(long, env = "CAPIV_PRODUCTION", default_value = PRODUCTION_DATASET_URL)]
    production: String,

    /// Fracture CSV: local path or http(s) URL
    #[arg(long, env = "CAPIV_FRACTURE", default_value = FRACTURE_DATASET_URL)]
    fracture: String,

    /// Skip the fracture dataset (production-only report)
    #[arg(long)]
    no_fracture: bool,

    /// Analysis config TOML (defaults to $CAPIV_CONFIG / ./capiv.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep only this operator (alias-resolved)
    #[arg(long)]
    company: Option<String>,

    /// Keep only this field area
    #[arg(long)]
    area: Option<String>,

    /// Keep only wells of this campaign year
    #[arg(long)]
    campaign: Option<i32>,

    /// Override the configured GOR threshold (m³/m³)
    #[arg(long)]
    gor_threshold: Option<f64>,

    /// Override the configured top-N for company/area rollups
    #[arg(long)]
    top_n: Option<usize>,

    /// Never download; serve cached datasets only
    #[arg(long)]
    offline: bool,

    /// Cache directory override
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Write production_records.csv and well_summaries.csv here
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the whole report as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AnalysisConfig::load(),
    };

    let mut cache = match &cli.cache_dir {
        Some(dir) => DatasetCache::new(
            Some(dir.clone()),
            Some(Duration::from_secs(config.cache.max_age_hours * 3600)),
            cli.offline,
        )?,
        None => DatasetCache::from_config(&config.cache, cli.offline)?,
    };

    let production_path = cache
        .resolve(&cli.production)
        .context("resolving production dataset")?;
    let production =
        load_production_csv(&production_path).context("loading production CSV")?;

    let fracture = if cli.no_fracture {
        None
    } else {
        let path = cache
            .resolve(&cli.fracture)
            .context("resolving fracture dataset")?;
        Some(load_fracture_csv(&path).context("loading fracture CSV")?)
    };

    let params = ReportParams {
        company: cli.company.clone(),
        field_area: cli.area.clone(),
        start_year: cli.campaign,
        gor_threshold: cli.gor_threshold,
        top_n: cli.top_n,
    };

    let report = run_report(production, fracture, &config, &params)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)?;

        let records_path = dir.join("production_records.csv");
        let file = File::create(&records_path)
            .with_context(|| format!("creating {}", records_path.display()))?;
        export::write_records_csv(BufWriter::new(file), &report.records)?;

        let summaries_path = dir.join("well_summaries.csv");
        let file = File::create(&summaries_path)
            .with_context(|| format!("creating {}", summaries_path.display()))?;
        export::write_summaries_csv(BufWriter::new(file), &report.summaries)?;

        tracing::info!(dir = %dir.display(), "Exported CSV tables");
    }

    Ok(())
}

fn print_summary(report: &ProductionReport) {
    let d = &report.diagnostics;

    println!("=== Capítulo IV Production Report ===");
    println!("  Latest allocation:       {}", report.latest_period);
    println!("  Consolidated month:      {}", report.totals.period);
    println!(
        "  Total gas rate:          {:.1} MMm³/d",
        report.totals.gas_rate_mmm3d
    );
    println!(
        "  Total oil rate:          {:.1} km³/d ({:.1} kbpd)",
        report.totals.oil_rate_km3d, report.totals.oil_rate_kbpd
    );
    println!("  Wells:                   {}", d.wells);
    println!(
        "  Rows:                    {} read, {} dropped, {} with undefined rates",
        d.production.rows_read, d.production.rows_dropped, d.undefined_rates
    );
    if d.fracture.rows_read > 0 {
        println!(
            "  Fracture rows:           {} read, {} dropped, {} cut, {} unmatched wells",
            d.fracture.rows_read, d.fracture.rows_dropped, d.frac_rows_cut, d.frac_wells_unmatched
        );
    }

    println!("\n--- Wells by company ---");
    for (company, count) in report.wells_by_company.iter().take(10) {
        println!("  {count:>5}  {company}");
    }

    println!("\n--- Oil rate by company (totals over history) ---");
    for series in &report.oil_by_company {
        println!("  {:>12.1}  {}", series.total(), series.key);
    }

    println!("\n--- Gas rate by company (totals over history) ---");
    for series in &report.gas_by_company {
        println!("  {:>12.1}  {}", series.total(), series.key);
    }

    if !report.completion.is_empty() {
        println!("\n--- Completion by campaign ---");
        println!("  year  wells  lateral avg (m)  stages avg  sand (t)  imported %");
        for c in &report.completion {
            println!(
                "  {:>4}  {:>5}  {:>15.0}  {:>10.1}  {:>8.0}  {:>9.1}",
                c.start_year,
                c.well_count,
                c.lateral_mean_m,
                c.stages_mean,
                c.sand_total_tn,
                c.imported_sand_pct
            );
        }
    }
}
