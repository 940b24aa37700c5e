use chrono::{NaiveDate, NaiveTime};
use joy_parser::EpisodeId;
use joy_store::{Document, Value};
use serde::Serialize;

use crate::ProcessingError;

/// Document field names shared by the uploader and the query side.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const IMG_SRC: &str = "img_src";
    pub const YOUTUBE_SRC: &str = "youtube_src";
    pub const COLORS: &str = "colors";
    pub const SUBJECTS: &str = "subjects";
    pub const AIR_DATE: &str = "air_date";
    pub const SEASON: &str = "season";
    pub const EPISODE: &str = "episode";
}

/// One joined episode, stored at `episodes/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub title: String,
    pub img_src: String,
    pub youtube_src: String,
    pub colors: Vec<String>,
    pub subjects: Vec<String>,
    pub air_date: Option<NaiveDate>,
    pub season: u32,
    pub episode: u32,
}

impl Episode {
    /// Field map for the store. The id is the document key, not a field. A missing air date
    /// is written as an explicit null; a known one as a timestamp at UTC midnight.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::TITLE.into(), self.title.clone().into());
        doc.insert(fields::IMG_SRC.into(), self.img_src.clone().into());
        doc.insert(fields::YOUTUBE_SRC.into(), self.youtube_src.clone().into());
        doc.insert(fields::COLORS.into(), self.colors.clone().into());
        doc.insert(fields::SUBJECTS.into(), self.subjects.clone().into());
        doc.insert(
            fields::AIR_DATE.into(),
            self.air_date
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
                .into(),
        );
        doc.insert(fields::SEASON.into(), i64::from(self.season).into());
        doc.insert(fields::EPISODE.into(), i64::from(self.episode).into());
        doc
    }

    pub fn from_document(id: &str, doc: &Document) -> Result<Self, ProcessingError> {
        let reader = FieldReader { id, doc };
        Ok(Self {
            id: EpisodeId::new(id),
            title: reader.string(fields::TITLE)?,
            img_src: reader.string(fields::IMG_SRC)?,
            youtube_src: reader.string(fields::YOUTUBE_SRC)?,
            colors: reader.strings(fields::COLORS)?,
            subjects: reader.strings(fields::SUBJECTS)?,
            air_date: reader.date(fields::AIR_DATE)?,
            season: reader.number(fields::SEASON)?,
            episode: reader.number(fields::EPISODE)?,
        })
    }
}

struct FieldReader<'a> {
    id: &'a str,
    doc: &'a Document,
}

impl FieldReader<'_> {
    fn error(&self, field: &str, expected: &str) -> ProcessingError {
        ProcessingError::Decode {
            id: self.id.to_string(),
            message: format!("field '{field}' missing or not {expected}"),
        }
    }

    fn string(&self, field: &str) -> Result<String, ProcessingError> {
        self.doc
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.error(field, "a string"))
    }

    /// Absent and null arrays both read as empty.
    fn strings(&self, field: &str) -> Result<Vec<String>, ProcessingError> {
        match self.doc.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.error(field, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.error(field, "a list of strings")),
        }
    }

    fn date(&self, field: &str) -> Result<Option<NaiveDate>, ProcessingError> {
        match self.doc.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Timestamp(ts)) => Ok(Some(ts.date_naive())),
            Some(_) => Err(self.error(field, "a timestamp")),
        }
    }

    fn number(&self, field: &str) -> Result<u32, ProcessingError> {
        self.doc
            .get(field)
            .and_then(Value::as_i64)
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| self.error(field, "a non-negative integer"))
    }
}
