//! Processing pipeline: load -> normalize -> join -> upload.

pub mod episode;
mod join;
mod pipeline;

use joy_parser::{EpisodeId, ParserError};
use joy_store::StoreError;
use thiserror::Error;

pub use episode::{Episode, fields};
pub use join::join_episodes;
pub use pipeline::{
    DEFAULT_COLLECTION, PipelineConfig, PreparedBatch, UploadPipeline, UploadReport, prepare,
};

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("parser error: {0}")]
    Parser(#[from] ParserError),
    #[error("upload of {id} failed: {source}")]
    Upload {
        id: EpisodeId,
        #[source]
        source: StoreError,
    },
    #[error("document {id} is malformed: {message}")]
    Decode { id: String, message: String },
}
