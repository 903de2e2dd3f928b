//! Normdoc engine: IO pipeline, collaborators, and run coordination.
mod archive;
mod attach;
mod config;
mod decode;
mod dedupe;
mod fetch;
mod listing;
mod persist;
mod pipeline;
mod progress;
mod record;
mod retry;
mod scatter;
mod types;

pub use archive::{ArchiveError, Archiver, ManifestArchiver};
pub use attach::{AttachmentLoader, EncodedAttachment};
pub use config::SiteConfig;
pub use decode::{decode_listing, DecodeError};
pub use dedupe::{DedupeStore, MemoryDedupeStore};
pub use fetch::{FetchSettings, Fetcher, ProxyPool, ReqwestFetcher};
pub use listing::{parse_listing, ListingError, ListingPage};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{HarvestPipeline, PipelineError, RunSummary, Stage};
pub use progress::{metrics, ProgressBoard};
pub use record::{JsonRecordWriter, RecordError, RecordSink};
pub use retry::{with_retry, RetryPolicy, TransientError};
pub use scatter::{fan_out_join, JoinOutcome};
pub use types::{FailureKind, FetchError, FetchPayload};
