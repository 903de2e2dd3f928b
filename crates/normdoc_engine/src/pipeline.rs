use std::collections::BTreeMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use harvest_logging::{harvest_info, harvest_warn};
use normdoc_core::{filter_cards, Card};

use crate::archive::{ArchiveError, Archiver};
use crate::attach::AttachmentLoader;
use crate::config::SiteConfig;
use crate::decode::{decode_listing, DecodeError};
use crate::dedupe::DedupeStore;
use crate::fetch::Fetcher;
use crate::listing::{parse_listing, ListingError, ListingPage};
use crate::progress::{metrics, ProgressBoard};
use crate::record::{RecordError, RecordSink};
use crate::retry::with_retry;
use crate::scatter::fan_out_join;
use crate::types::FetchError;

/// Coordinator stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Searching,
    PageFetching,
    PagesJoined,
    CardProcessing,
    Finalized,
    Aborted,
}

/// Report handed back when a run tears down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: String,
    pub total_docs: u64,
    pub total_pages: u64,
    pub aborted: bool,
    pub counters: BTreeMap<String, u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("finalize failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Failure of one page-fetching unit, after retries.
#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Failure of one card-processing unit, after retries.
#[derive(Debug, thiserror::Error)]
enum CardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Orchestrates one harvest run end to end.
///
/// The cancel token is re-read before every unit of work; once observed,
/// remaining units are skipped but both joins still complete and finalize
/// still runs, exactly once per run.
pub struct HarvestPipeline {
    config: Arc<SiteConfig>,
    page_fetcher: Arc<dyn Fetcher>,
    attachment_fetcher: Arc<dyn Fetcher>,
    dedupe: Arc<dyn DedupeStore>,
    records: Arc<dyn RecordSink>,
    archiver: Arc<dyn Archiver>,
    board: Arc<ProgressBoard>,
    cancel: CancellationToken,
}

impl HarvestPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SiteConfig,
        page_fetcher: Arc<dyn Fetcher>,
        attachment_fetcher: Arc<dyn Fetcher>,
        dedupe: Arc<dyn DedupeStore>,
        records: Arc<dyn RecordSink>,
        archiver: Arc<dyn Archiver>,
        board: Arc<ProgressBoard>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            page_fetcher,
            attachment_fetcher,
            dedupe,
            records,
            archiver,
            board,
            cancel,
        }
    }

    /// Runs the full harvest for `run_id` and tears the run down.
    ///
    /// Partial failures surface only in the counters; the returned error
    /// covers finalization itself.
    pub async fn run(&self, run_id: &str) -> Result<RunSummary, PipelineError> {
        self.enter(run_id, Stage::Init);
        let mut total_docs = 0;
        let mut total_pages = 0;

        if !self.cancel.is_cancelled() {
            self.enter(run_id, Stage::Searching);
            match self.discover(run_id).await {
                Ok(listing) => {
                    total_docs = listing.total_docs;
                    total_pages = listing.page_count;
                    self.board.add(run_id, metrics::PAGES_FOUND, total_pages);
                    self.board.add(run_id, metrics::CARDS_FOUND, total_docs);
                }
                Err(err) => {
                    harvest_warn!("{run_id}: search discovery failed: {err}");
                    self.board.bump(run_id, metrics::PAGE_ERRORS);
                }
            }
        }

        self.enter(run_id, Stage::PageFetching);
        let pages = fan_out_join(&self.cancel, 1..=total_pages, |page| {
            load_page(
                page,
                run_id.to_string(),
                self.config.clone(),
                self.page_fetcher.clone(),
                self.board.clone(),
            )
        })
        .await;
        self.board
            .add(run_id, metrics::PAGE_ERRORS, pages.failed as u64);

        self.enter(run_id, Stage::PagesJoined);
        let cards: Vec<Card> = pages.completed.into_iter().flatten().collect();

        self.enter(run_id, Stage::CardProcessing);
        let loader = Arc::new(AttachmentLoader::new(self.attachment_fetcher.clone()));
        let processed = fan_out_join(&self.cancel, cards.into_iter().enumerate(), |(index, card)| {
            process_card(
                index,
                card,
                run_id.to_string(),
                self.config.clone(),
                loader.clone(),
                self.dedupe.clone(),
                self.records.clone(),
                self.board.clone(),
            )
        })
        .await;
        self.board
            .add(run_id, metrics::CARD_ERRORS, processed.failed as u64);

        let aborted = self.cancel.is_cancelled();
        self.enter(run_id, if aborted { Stage::Aborted } else { Stage::Finalized });
        self.archiver.finalize(run_id)?;

        let counters = self.board.snapshot(run_id);
        self.board.clear_run(run_id);
        harvest_info!("{run_id}: run finished, counters {counters:?}");

        Ok(RunSummary {
            run_id: run_id.to_string(),
            total_docs,
            total_pages,
            aborted,
            counters,
        })
    }

    fn enter(&self, run_id: &str, stage: Stage) {
        harvest_info!("{run_id}: stage {stage:?}");
    }

    /// Fetches the listing root and discovers page and document totals.
    async fn discover(&self, run_id: &str) -> Result<ListingPage, PageError> {
        let url = self.config.search_url.clone();
        let label = format!("{run_id}: init search");
        let payload = with_retry(self.config.page_retry, &label, || {
            self.page_fetcher.fetch(&url)
        })
        .await?;
        let html = decode_listing(&payload.bytes, payload.content_type.as_deref())?;
        Ok(parse_listing(&html, &self.config.base_url)?)
    }
}

/// One page-fetching unit: fetch, parse, filter, count.
async fn load_page(
    page: u64,
    run_id: String,
    config: Arc<SiteConfig>,
    fetcher: Arc<dyn Fetcher>,
    board: Arc<ProgressBoard>,
) -> Result<Vec<Card>, PageError> {
    let url = config.page_url(page);
    let label = format!("{run_id}: load page {page}");
    let payload = with_retry(config.page_retry, &label, || fetcher.fetch(&url)).await?;
    let html = decode_listing(&payload.bytes, payload.content_type.as_deref())?;
    let listing = parse_listing(&html, &config.base_url)?;

    let outcome = filter_cards(listing.cards, &config.excluded_categories);
    board.add(&run_id, metrics::CARDS_SKIPPED, outcome.skipped as u64);
    board.add(
        &run_id,
        metrics::CARDS_ACCEPTED,
        outcome.accepted.len() as u64,
    );
    board.bump(&run_id, metrics::PAGES_LOADED);
    Ok(outcome.accepted)
}

/// One card-processing unit: dedup claim, attachment load, record emit.
#[allow(clippy::too_many_arguments)]
async fn process_card(
    index: usize,
    mut card: Card,
    run_id: String,
    config: Arc<SiteConfig>,
    loader: Arc<AttachmentLoader>,
    dedupe: Arc<dyn DedupeStore>,
    records: Arc<dyn RecordSink>,
    board: Arc<ProgressBoard>,
) -> Result<(), CardError> {
    // The claim must precede any IO: of two concurrent units carrying the
    // same fingerprint, the loser stops here.
    if !dedupe.claim(&card.content_fingerprint) {
        board.bump(&run_id, metrics::CARDS_ALREADY_PRESENT);
        return Ok(());
    }

    let saved: Result<(), CardError> = async {
        let label = format!("{run_id}: save card {index}");
        let attachment = with_retry(config.card_retry, &label, || loader.load(&card)).await?;
        if let Some(attachment) = attachment {
            attachment.apply(&mut card);
        }
        let unit_id = format!("card-{index:05}");
        records.emit(&run_id, &unit_id, &card)?;
        Ok(())
    }
    .await;

    if let Err(err) = saved {
        dedupe.release(&card.content_fingerprint);
        return Err(err);
    }
    board.bump(&run_id, metrics::CARDS_SAVED);
    Ok(())
}
