mod colors;
mod common;
mod episode_dates;
mod subjects;

pub use colors::ColorsTable;
pub use episode_dates::EpisodeDatesTable;
pub use subjects::SubjectsTable;

pub(crate) use common::{field, headers, line_of, parse_required_u32, reader, require_column};
