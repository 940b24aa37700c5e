//! String cleanup applied between loading and joining.

use std::collections::HashMap;

use crate::model::{EpisodeId, SubjectTable};

pub fn episode_id(season: u32, episode: u32) -> EpisodeId {
    EpisodeId::from_parts(season, episode)
}

/// Splits the `['Red', 'Blue']` export format into color names.
///
/// Only one leading `[` and one trailing `]` are removed, quotes are dropped everywhere and the
/// remainder is split on `", "`. Nothing is trimmed, so an empty or malformed cell comes back as
/// a single odd element rather than an error.
pub fn parse_color_list(raw: &str) -> Vec<String> {
    let inner = raw.strip_prefix('[').unwrap_or(raw);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .replace('\'', "")
        .split(", ")
        .map(str::to_string)
        .collect()
}

/// Category names whose indicator cell is exactly the integer 1, in column order.
pub fn subjects_from_indicators(categories: &[String], indicators: &[String]) -> Vec<String> {
    categories
        .iter()
        .zip(indicators)
        .filter(|(_, value)| is_set(value))
        .map(|(category, _)| category.clone())
        .collect()
}

fn is_set(value: &str) -> bool {
    matches!(value.trim().parse::<i64>(), Ok(1))
}

/// Subjects per episode. Later rows for the same episode replace earlier ones.
pub fn subjects_by_episode(table: &SubjectTable) -> HashMap<EpisodeId, Vec<String>> {
    table
        .rows
        .iter()
        .map(|row| {
            (
                row.episode_id.clone(),
                subjects_from_indicators(&table.categories, &row.indicators),
            )
        })
        .collect()
}

pub fn clean_title(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

pub fn clean_date(raw: &str) -> String {
    raw.trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .to_string()
}
