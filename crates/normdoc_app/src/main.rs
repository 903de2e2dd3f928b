//! One-shot harvest entry point.
//!
//! Stands in for the external scheduler: builds the pipeline with the real
//! collaborators, runs a single harvest, and logs the summary. A config
//! file path may be passed as the first argument (default `normdoc.json`).

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;

use harvest_logging::{harvest_info, harvest_warn, LogDestination};
use normdoc_engine::{
    FetchSettings, HarvestPipeline, JsonRecordWriter, ManifestArchiver, MemoryDedupeStore,
    ProgressBoard, ProxyPool, ReqwestFetcher, SiteConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    harvest_logging::initialize(LogDestination::Both);

    let config = load_config()?;
    if config.search_url.is_empty() || config.base_url.is_empty() {
        bail!("config must set base_url and search_url");
    }

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            harvest_warn!("kill signal received, in-flight work will finish");
            cancel_on_signal.cancel();
        }
    });

    let board = Arc::new(ProgressBoard::new());
    let output_dir = PathBuf::from(&config.output_dir);
    let proxies = ProxyPool::new(config.attachment_proxies.clone());

    let page_fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::listing()));
    let attachment_fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::attachment(
        proxies.next().map(str::to_string),
    )));
    let records = Arc::new(JsonRecordWriter::new(output_dir.clone()));
    let archiver = Arc::new(ManifestArchiver::new(output_dir, board.clone()));
    let dedupe = Arc::new(MemoryDedupeStore::new());

    let pipeline = HarvestPipeline::new(
        config,
        page_fetcher,
        attachment_fetcher,
        dedupe,
        records,
        archiver,
        board,
        cancel,
    );

    let run_id = format!("normdoc-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    let summary = pipeline.run(&run_id).await?;
    harvest_info!(
        "{}: {} pages, {} documents, aborted={}",
        summary.run_id,
        summary.total_pages,
        summary.total_docs,
        summary.aborted
    );
    Ok(())
}

fn load_config() -> anyhow::Result<SiteConfig> {
    let path = env::args().nth(1).unwrap_or_else(|| "normdoc.json".to_string());
    let raw = fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("parsing config {path}"))?;
    Ok(config)
}
