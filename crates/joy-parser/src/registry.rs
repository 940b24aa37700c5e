use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::ParserError;
use crate::formats::{ColorsTable, EpisodeDatesTable, SubjectsTable};
use crate::model::SourceTables;

pub trait SourceTable {
    type Output;

    fn name(&self) -> &'static str;
    fn file_name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<Self::Output, ParserError>;

    fn load(&self, dir: &Path) -> Result<Self::Output, ParserError> {
        let path = dir.join(self.file_name());
        debug!(table = self.name(), path = %path.display(), "reading table");
        let content = fs::read_to_string(&path).map_err(|source| ParserError::Io {
            table: self.name(),
            path: path.clone(),
            source,
        })?;
        self.parse(&content)
    }
}

/// Reads all three input tables from `dir`. Any missing file or column aborts the load.
pub fn load_source_tables(dir: &Path) -> Result<SourceTables, ParserError> {
    let colors = ColorsTable.load(dir)?;
    let subjects = SubjectsTable.load(dir)?;
    let dates = EpisodeDatesTable.load(dir)?;

    info!(
        colors = colors.len(),
        subjects = subjects.rows.len(),
        categories = subjects.categories.len(),
        dates = dates.len(),
        "loaded source tables"
    );

    Ok(SourceTables {
        colors,
        subjects,
        dates,
    })
}
