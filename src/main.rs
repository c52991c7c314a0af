mod config;
mod models;
mod pipeline;
mod scraper;
mod stats;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::scraper::{BribeScraper, ReportSource};
use crate::stats::{Summary, summarize};

#[derive(Parser)]
#[command(name = "bribewatch", about = "Self-reported bribe listing scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape all configured pages and print summary statistics
    Run {
        /// Emit the summary as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single listing page and print its rows
    Page {
        /// Pagination offset (0 = first page)
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "bribewatch=info,warn",
        1 => "bribewatch=debug,info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Run { json } => {
            let _t = utils::Timer::start("Scrape run");

            let source = BribeScraper::new(&config.scraper, config.pipeline.mismatch)?;
            let outcome = Pipeline::new(source, config)
                .with_progress(Box::new(|p| {
                    info!("Page {}/{} (offset {})", p.page, p.total, p.offset);
                }))
                .run()
                .await?;

            info!(
                "Done: {} rows from {} pages, {} errors",
                outcome.table.len(),
                outcome.pages_fetched,
                outcome.errors
            );

            let summary = summarize(&outcome.table);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_report(&summary, outcome.table.len());
            }
        }

        Command::Page { offset } => {
            let source = BribeScraper::new(&config.scraper, config.pipeline.mismatch)?;
            let rows = source.fetch_page(offset).await?;

            println!("{} rows at offset {}:", rows.len(), offset);
            for row in &rows {
                let amount = row
                    .amount
                    .map(|a| format!("{:.0}", a))
                    .unwrap_or("?".into());
                println!("  {:>10}  {}  [{}]", amount, row.transaction, row.department);
            }
        }
    }

    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(utils::fmt_amount).unwrap_or("—".into())
}

fn print_report(summary: &Summary, rows: usize) {
    println!("─────────────────────────────────────────");
    println!("  bribewatch — Scrape Summary");
    println!("─────────────────────────────────────────");
    println!("  Rows      : {}", utils::fmt_number(rows as i64));
    println!(
        "  Amounts   : {} ({} unparseable)",
        utils::fmt_number(summary.overall.count as i64),
        summary.overall.missing
    );
    println!("  Min       : {}", fmt_opt(summary.overall.min));
    println!("  Q1        : {}", fmt_opt(summary.overall.q1));
    println!("  Median    : {}", fmt_opt(summary.overall.median));
    println!("  Q3        : {}", fmt_opt(summary.overall.q3));
    println!("  Max       : {}", fmt_opt(summary.overall.max));
    println!("  Mean      : {}", fmt_opt(summary.overall.mean));

    println!("─────────────────────────────────────────");
    println!("  Mean amount by department");
    for dept in &summary.by_department {
        println!(
            "  {:>12}  {}  ({} reports)",
            utils::fmt_amount(dept.mean_amount),
            dept.department,
            dept.reports
        );
    }

    println!("─────────────────────────────────────────");
    println!("  Amount histogram (log buckets)");
    for bucket in &summary.histogram {
        println!(
            "  [{:>10} – {:>10})  {}",
            utils::fmt_amount(bucket.lower),
            utils::fmt_amount(bucket.upper),
            utils::fmt_number(bucket.count as i64)
        );
    }
    println!("─────────────────────────────────────────");
}
