use std::fmt;
use std::sync::Arc;

use joy_parser::normalize::subjects_by_episode;
use joy_parser::{DateFailure, DateLookup, EpisodeId, SourceTables};
use joy_store::DocumentStore;
use tracing::{debug, error, info};

use crate::episode::Episode;
use crate::join::join_episodes;
use crate::ProcessingError;

pub const DEFAULT_COLLECTION: &str = "episodes";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub collection: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Joined episodes ready for upload, plus the date rows that could not be parsed.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub episodes: Vec<Episode>,
    pub date_failures: Vec<DateFailure>,
}

/// Normalizes and joins the three source tables. Never touches the store.
pub fn prepare(tables: &SourceTables) -> PreparedBatch {
    let dates = DateLookup::build(&tables.dates);
    let subjects = subjects_by_episode(&tables.subjects);
    let episodes = join_episodes(&tables.colors, &subjects, &dates);

    info!(
        episodes = episodes.len(),
        dated = episodes.iter().filter(|e| e.air_date.is_some()).count(),
        date_failures = dates.failure_count(),
        "joined episodes"
    );

    PreparedBatch {
        episodes,
        date_failures: dates.failures().to_vec(),
    }
}

/// Outcome of a completed run.
///
/// A failed write aborts the run with [`ProcessingError::Upload`], so a report always has
/// `uploaded == total`; the second summary form only appears when air dates failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub total: usize,
    pub uploaded: usize,
    pub date_failures: usize,
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.date_failures == 0 && self.uploaded == self.total {
            write!(f, "All {} episodes uploaded successfully.", self.total)
        } else {
            write!(
                f,
                "{}/{} episodes uploaded; {} air dates could not be parsed.",
                self.uploaded, self.total, self.date_failures
            )
        }
    }
}

pub struct UploadPipeline {
    store: Arc<dyn DocumentStore>,
    config: PipelineConfig,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    pub async fn run(
        &self,
        tables: &SourceTables,
        on_uploaded: impl FnMut(&EpisodeId),
    ) -> Result<UploadReport, ProcessingError> {
        let batch = prepare(tables);
        self.upload(&batch, on_uploaded).await
    }

    /// Writes every episode in order, one at a time. The first failed write ends the run.
    pub async fn upload(
        &self,
        batch: &PreparedBatch,
        mut on_uploaded: impl FnMut(&EpisodeId),
    ) -> Result<UploadReport, ProcessingError> {
        let collection = self.config.collection.as_str();
        let mut uploaded = 0;

        for episode in &batch.episodes {
            let document = episode.to_document();
            if let Err(source) = self
                .store
                .set_document(collection, episode.id.as_str(), &document)
                .await
            {
                error!(episode_id = %episode.id, uploaded, "upload failed: {source}");
                return Err(ProcessingError::Upload {
                    id: episode.id.clone(),
                    source,
                });
            }
            uploaded += 1;
            debug!(episode_id = %episode.id, collection, "uploaded episode");
            on_uploaded(&episode.id);
        }

        let report = UploadReport {
            total: batch.episodes.len(),
            uploaded,
            date_failures: batch.date_failures.len(),
        };
        info!(
            total = report.total,
            uploaded = report.uploaded,
            date_failures = report.date_failures,
            "upload finished"
        );
        Ok(report)
    }
}
