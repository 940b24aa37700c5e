use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical episode key, `S<season>E<episode>` with both numbers zero-padded to two digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(String);

impl EpisodeId {
    pub fn from_parts(season: u32, episode: u32) -> Self {
        Self(format!("S{season:02}E{episode:02}"))
    }

    /// Wraps an identifier that already arrives in canonical form (subject table, document ids).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EpisodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One row of `Colors_Used.csv`. `colors` is still the raw bracketed pseudo-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRecord {
    pub season: u32,
    pub episode: u32,
    pub painting_title: String,
    pub img_src: String,
    pub youtube_src: String,
    pub colors: String,
}

impl ColorRecord {
    pub fn episode_id(&self) -> EpisodeId {
        EpisodeId::from_parts(self.season, self.episode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRow {
    pub episode_id: EpisodeId,
    pub title: String,
    /// Raw indicator cells, aligned with [`SubjectTable::categories`].
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectTable {
    pub categories: Vec<String>,
    pub rows: Vec<SubjectRow>,
}

/// One row of `Episode_Dates.csv` before title and date cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRecord {
    pub title: String,
    pub date: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub colors: Vec<ColorRecord>,
    pub subjects: SubjectTable,
    pub dates: Vec<DateRecord>,
}
