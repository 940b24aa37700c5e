use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::warn;

use crate::errors::ParserError;
use crate::model::DateRecord;
use crate::normalize::{clean_date, clean_title};

/// `January 21, 1990`
pub const AIR_DATE_FORMAT: &str = "%B %d, %Y";

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses `<full month name> <day>, <four-digit year>`.
///
/// chrono's `%B` also takes abbreviations and `%Y` any digit count, so both tokens are
/// checked again after a successful parse.
pub fn parse_air_date(value: &str) -> Result<NaiveDate, ParserError> {
    let invalid = || ParserError::InvalidDate {
        value: value.to_string(),
    };

    let date = NaiveDate::parse_from_str(value, AIR_DATE_FORMAT).map_err(|_| invalid())?;

    let mut tokens = value.split_whitespace();
    let full_month = tokens.next().is_some_and(|month| {
        MONTH_NAMES
            .iter()
            .any(|name| name.eq_ignore_ascii_case(month))
    });
    let four_digit_year = tokens
        .last()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));

    if full_month && four_digit_year {
        Ok(date)
    } else {
        Err(invalid())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFailure {
    pub title: String,
    pub value: String,
}

impl fmt::Display for DateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse date '{}' for '{}'", self.value, self.title)
    }
}

/// Air dates keyed by cleaned painting title.
///
/// Rows whose date does not parse are recorded in [`DateLookup::failures`] and never inserted,
/// so a title seen earlier with a good date keeps it.
#[derive(Debug, Clone, Default)]
pub struct DateLookup {
    dates: HashMap<String, NaiveDate>,
    failures: Vec<DateFailure>,
}

impl DateLookup {
    pub fn build(records: &[DateRecord]) -> Self {
        let mut lookup = Self::default();

        for record in records {
            let title = clean_title(&record.title);
            let value = clean_date(&record.date);
            match parse_air_date(&value) {
                Ok(date) => {
                    lookup.dates.insert(title, date);
                }
                Err(_) => {
                    warn!(title = %title, date = %value, "unparseable air date");
                    lookup.failures.push(DateFailure { title, value });
                }
            }
        }

        lookup
    }

    pub fn get(&self, title: &str) -> Option<NaiveDate> {
        self.dates.get(title).copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn failures(&self) -> &[DateFailure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
