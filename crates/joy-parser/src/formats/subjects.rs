use csv::Trim;

use crate::errors::ParserError;
use crate::model::{EpisodeId, SubjectRow, SubjectTable};
use crate::registry::SourceTable;

use super::{field, headers, reader, require_column};

/// `Subject_Matter.csv`: `EPISODE`, `TITLE`, then one 0/1 column per subject category.
pub struct SubjectsTable;

impl SubjectsTable {
    const NAME: &'static str = "SUBJECT_MATTER";
}

impl SourceTable for SubjectsTable {
    type Output = SubjectTable;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn file_name(&self) -> &'static str {
        "Subject_Matter.csv"
    }

    fn parse(&self, content: &str) -> Result<Self::Output, ParserError> {
        let mut rdr = reader(content, b',', Trim::None);
        let headers = headers(Self::NAME, &mut rdr)?;

        let episode_idx = require_column(Self::NAME, &headers, "EPISODE")?;
        let title_idx = require_column(Self::NAME, &headers, "TITLE")?;

        let indicator_columns: Vec<usize> = (0..headers.len())
            .filter(|idx| *idx != episode_idx && *idx != title_idx)
            .collect();
        let categories = indicator_columns
            .iter()
            .map(|idx| field(&headers, *idx).trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(ParserError::csv(Self::NAME))?;
            rows.push(SubjectRow {
                episode_id: EpisodeId::new(field(&record, episode_idx).trim()),
                title: field(&record, title_idx).to_string(),
                indicators: indicator_columns
                    .iter()
                    .map(|idx| field(&record, *idx).to_string())
                    .collect(),
            });
        }

        Ok(SubjectTable { categories, rows })
    }
}
