pub mod dates;
pub mod errors;
pub mod formats;
pub mod model;
pub mod normalize;
mod registry;

pub use dates::{parse_air_date, DateFailure, DateLookup};
pub use errors::ParserError;
pub use model::{ColorRecord, DateRecord, EpisodeId, SourceTables, SubjectRow, SubjectTable};
pub use registry::{load_source_tables, SourceTable};
