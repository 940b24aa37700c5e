use csv::Trim;

use crate::errors::ParserError;
use crate::model::DateRecord;
use crate::registry::SourceTable;

use super::{field, headers, reader, require_column};

/// `Episode_Dates.csv`: pipe separated `title|date`, cells often padded around the separator.
pub struct EpisodeDatesTable;

impl EpisodeDatesTable {
    const NAME: &'static str = "EPISODE_DATES";
}

impl SourceTable for EpisodeDatesTable {
    type Output = Vec<DateRecord>;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn file_name(&self) -> &'static str {
        "Episode_Dates.csv"
    }

    fn parse(&self, content: &str) -> Result<Self::Output, ParserError> {
        let mut rdr = reader(content, b'|', Trim::All);
        let headers = headers(Self::NAME, &mut rdr)?;

        let title_idx = require_column(Self::NAME, &headers, "title")?;
        let date_idx = require_column(Self::NAME, &headers, "date")?;

        rdr.records()
            .map(|record| {
                let record = record.map_err(ParserError::csv(Self::NAME))?;
                Ok(DateRecord {
                    title: field(&record, title_idx).to_string(),
                    date: field(&record, date_idx).to_string(),
                })
            })
            .collect()
    }
}
