use anyhow::{Context, Result};
use clap::Parser;
use states_scraper::{
    config::{Overrides, ScrapeConfig},
    logging, pipeline,
    present::{self, export::ExportFormat},
};
use std::{path::PathBuf, time::Instant};
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scrape state name, population and area from the Wikipedia list of US states"
)]
struct Args {
    /// Source page (default: the Wikipedia list of states)
    #[arg(long)]
    url: Option<String>,

    /// Rows to preview
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Skip rows that fail to parse instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Remove bracketed footnote markers before parsing numbers
    #[arg(long)]
    strip_footnotes: bool,

    /// Fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full table here
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Export format (csv, json, parquet); inferred from --out when omitted
    #[arg(long, requires = "out")]
    format: Option<ExportFormat>,
}

fn load_config(args: &Args) -> Result<ScrapeConfig> {
    let cfg = match &args.config {
        Some(path) => ScrapeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config `{}`", path.display()))?,
        None => ScrapeConfig::default(),
    };
    let cfg = cfg.apply_env().context("reading STATES_* environment")?;

    Ok(cfg.apply_overrides(&Overrides {
        url: args.url.clone(),
        preview_rows: args.limit,
        timeout_secs: args.timeout,
        lenient: args.lenient,
        strip_footnotes: args.strip_footnotes,
    }))
}

fn main() -> Result<()> {
    logging::init();
    let start = Instant::now();
    let args = Args::parse();
    let cfg = load_config(&args)?;
    info!(url = %cfg.url, mode = %cfg.mode, "starting");

    let set = pipeline::scrape(&cfg).with_context(|| format!("scraping {}", cfg.url))?;
    for skipped in &set.skipped {
        eprintln!("skipped row {} ({}): {}", skipped.row, skipped.error.stage(), skipped.error);
    }

    let batch = present::to_table(&set.records).context("building table")?;
    println!("{}", present::preview(&batch, cfg.preview_rows)?);
    println!(
        "{} states, {} rows skipped",
        set.records.len(),
        set.skipped.len()
    );

    if let Some(out) = &args.out {
        let format = present::export::export(&set.records, &batch, out, args.format)
            .with_context(|| format!("exporting to `{}`", out.display()))?;
        println!("wrote {} ({})", out.display(), format);
    }

    info!(elapsed = ?start.elapsed(), "done");
    Ok(())
}
