use csv::Trim;

use crate::errors::ParserError;
use crate::model::ColorRecord;
use crate::registry::SourceTable;

use super::{field, headers, line_of, parse_required_u32, reader, require_column};

/// `Colors_Used.csv`: comma separated, one row per painting. Unused columns are ignored.
pub struct ColorsTable;

impl ColorsTable {
    const NAME: &'static str = "COLORS_USED";
}

impl SourceTable for ColorsTable {
    type Output = Vec<ColorRecord>;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn file_name(&self) -> &'static str {
        "Colors_Used.csv"
    }

    fn parse(&self, content: &str) -> Result<Self::Output, ParserError> {
        let mut rdr = reader(content, b',', Trim::None);
        let headers = headers(Self::NAME, &mut rdr)?;

        let season_idx = require_column(Self::NAME, &headers, "season")?;
        let episode_idx = require_column(Self::NAME, &headers, "episode")?;
        let title_idx = require_column(Self::NAME, &headers, "painting_title")?;
        let img_idx = require_column(Self::NAME, &headers, "img_src")?;
        let youtube_idx = require_column(Self::NAME, &headers, "youtube_src")?;
        let colors_idx = require_column(Self::NAME, &headers, "colors")?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(ParserError::csv(Self::NAME))?;
            let line = line_of(&record);

            rows.push(ColorRecord {
                season: parse_required_u32(Self::NAME, field(&record, season_idx), line, "season")?,
                episode: parse_required_u32(
                    Self::NAME,
                    field(&record, episode_idx),
                    line,
                    "episode",
                )?,
                painting_title: field(&record, title_idx).to_string(),
                img_src: field(&record, img_idx).to_string(),
                youtube_src: field(&record, youtube_idx).to_string(),
                colors: field(&record, colors_idx).to_string(),
            });
        }

        Ok(rows)
    }
}
