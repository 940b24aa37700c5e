//! Translation of `/episodes/filter` query parameters into store queries.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use joy_processing::fields;
use joy_store::{FieldFilter, FilterOp, Query, Value};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("At least one of query params 'month', 'subjects', or 'colors' is required.")]
    MissingFilter,
    #[error("Query param 'month' must be MM/YYYY, got '{0}'.")]
    InvalidMonth(String),
    #[error("Query param 'match' must be 'all' or 'any', got '{0}'.")]
    InvalidMatch(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub month: Option<String>,
    pub subjects: Option<String>,
    pub colors: Option<String>,
    #[serde(rename = "match")]
    pub match_mode: Option<String>,
}

/// How list values combine inside a filter, and how filters combine with each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

impl FromStr for MatchMode {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(MatchMode::All),
            "any" => Ok(MatchMode::Any),
            _ => Err(FilterError::InvalidMatch(raw.to_string())),
        }
    }
}

/// `[first instant of the month, first instant of the next month)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthRange {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let invalid = || FilterError::InvalidMonth(raw.to_string());

        let (month, year) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end: end.and_time(NaiveTime::MIN).and_utc(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFilter {
    pub month: Option<MonthRange>,
    pub subjects: Vec<String>,
    pub colors: Vec<String>,
    pub mode: MatchMode,
}

impl EpisodeFilter {
    pub fn from_params(params: &FilterParams) -> Result<Self, FilterError> {
        let mode = match params.match_mode.as_deref() {
            Some(raw) => raw.parse()?,
            None => MatchMode::default(),
        };
        let month = params
            .month
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(MonthRange::parse)
            .transpose()?;
        // Subject columns are upper-case; colors are matched as written.
        let subjects = split_list(params.subjects.as_deref(), str::to_uppercase);
        let colors = split_list(params.colors.as_deref(), str::to_string);

        if month.is_none() && subjects.is_empty() && colors.is_empty() {
            return Err(FilterError::MissingFilter);
        }

        Ok(Self {
            month,
            subjects,
            colors,
            mode,
        })
    }

    /// One query in `all` mode; one query per supplied filter in `any` mode.
    pub fn queries(&self) -> Vec<Query> {
        let mut groups: Vec<Vec<FieldFilter>> = Vec::new();

        if let Some(range) = self.month {
            groups.push(vec![
                FieldFilter::new(fields::AIR_DATE, FilterOp::GreaterThanOrEqual, range.start),
                FieldFilter::new(fields::AIR_DATE, FilterOp::LessThan, range.end),
            ]);
        }
        if !self.subjects.is_empty() {
            groups.push(self.list_filters(fields::SUBJECTS, &self.subjects));
        }
        if !self.colors.is_empty() {
            groups.push(self.list_filters(fields::COLORS, &self.colors));
        }

        match self.mode {
            MatchMode::All => vec![Query {
                filters: groups.concat(),
                limit: None,
            }],
            MatchMode::Any => groups
                .into_iter()
                .map(|filters| Query {
                    filters,
                    limit: None,
                })
                .collect(),
        }
    }

    fn list_filters(&self, field: &str, values: &[String]) -> Vec<FieldFilter> {
        match self.mode {
            MatchMode::All => values
                .iter()
                .map(|value| FieldFilter::new(field, FilterOp::ArrayContains, value.as_str()))
                .collect(),
            MatchMode::Any => vec![FieldFilter::new(
                field,
                FilterOp::ArrayContainsAny,
                Value::from(values.to_vec()),
            )],
        }
    }
}

fn split_list(raw: Option<&str>, normalize: impl Fn(&str) -> String) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(normalize)
            .collect()
    })
    .unwrap_or_default()
}
