use std::cmp::Ordering;

use crate::value::{Document, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    GreaterThanOrEqual,
    LessThan,
    ArrayContains,
    /// `value` must be an array; matches when the field shares at least one element with it.
    ArrayContainsAny,
}

impl FilterOp {
    pub fn is_array(&self) -> bool {
        matches!(self, FilterOp::ArrayContains | FilterOp::ArrayContainsAny)
    }

    pub fn is_inequality(&self) -> bool {
        matches!(self, FilterOp::GreaterThanOrEqual | FilterOp::LessThan)
    }

    pub(crate) fn firestore_name(&self) -> &'static str {
        match self {
            FilterOp::Equal => "EQUAL",
            FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            FilterOp::LessThan => "LESS_THAN",
            FilterOp::ArrayContains => "ARRAY_CONTAINS",
            FilterOp::ArrayContainsAny => "ARRAY_CONTAINS_ANY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        let Some(actual) = document.get(&self.field) else {
            return false;
        };

        match self.op {
            FilterOp::Equal => actual == &self.value,
            FilterOp::GreaterThanOrEqual => matches!(
                actual.compare(&self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::LessThan => actual.compare(&self.value) == Some(Ordering::Less),
            FilterOp::ArrayContains => actual
                .as_array()
                .is_some_and(|values| values.contains(&self.value)),
            FilterOp::ArrayContainsAny => {
                let (Some(values), Some(wanted)) = (actual.as_array(), self.value.as_array())
                else {
                    return false;
                };
                wanted.iter().any(|candidate| values.contains(candidate))
            }
        }
    }
}

/// Conjunction of field filters over one collection. Results come back ordered by document id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<FieldFilter>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(FieldFilter::new(field, op, value));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.filters.iter().all(|filter| filter.matches(document))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn episode(colors: &[&str], aired: (i32, u32, u32)) -> Document {
        let mut doc = Document::new();
        doc.insert("title".into(), "Ebony Sunset".into());
        doc.insert("colors".into(), colors.to_vec().into());
        doc.insert(
            "air_date".into(),
            Utc.with_ymd_and_hms(aired.0, aired.1, aired.2, 0, 0, 0)
                .unwrap()
                .into(),
        );
        doc
    }

    #[test]
    fn range_filter_is_half_open() {
        let start = Utc.with_ymd_and_hms(1983, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(1983, 2, 1, 0, 0, 0).unwrap();
        let query = Query::new()
            .filter("air_date", FilterOp::GreaterThanOrEqual, start)
            .filter("air_date", FilterOp::LessThan, end);

        assert!(query.matches(&episode(&[], (1983, 1, 1))));
        assert!(query.matches(&episode(&[], (1983, 1, 31))));
        assert!(!query.matches(&episode(&[], (1983, 2, 1))));
    }

    #[test]
    fn array_filters() {
        let doc = episode(&["Sap Green", "Titanium White"], (1983, 1, 18));

        assert!(FieldFilter::new("colors", FilterOp::ArrayContains, "Sap Green").matches(&doc));
        assert!(!FieldFilter::new("colors", FilterOp::ArrayContains, "sap green").matches(&doc));
        assert!(FieldFilter::new(
            "colors",
            FilterOp::ArrayContainsAny,
            vec!["Bright Red", "Titanium White"]
        )
        .matches(&doc));
        assert!(!FieldFilter::new("colors", FilterOp::ArrayContainsAny, vec!["Bright Red"])
            .matches(&doc));
    }

    #[test]
    fn missing_or_null_fields_never_match() {
        let mut doc = Document::new();
        doc.insert("air_date".into(), Value::Null);
        let start = Utc.with_ymd_and_hms(1983, 1, 1, 0, 0, 0).unwrap();

        assert!(!FieldFilter::new("air_date", FilterOp::GreaterThanOrEqual, start).matches(&doc));
        assert!(!FieldFilter::new("subjects", FilterOp::ArrayContains, "TREE").matches(&doc));
    }
}
