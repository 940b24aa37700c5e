use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::errors::ParserError;

pub(crate) fn reader(content: &str, delimiter: u8, trim: Trim) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(trim)
        .from_reader(content.as_bytes())
}

pub(crate) fn headers(
    table: &'static str,
    reader: &mut Reader<&[u8]>,
) -> Result<StringRecord, ParserError> {
    reader.headers().cloned().map_err(ParserError::csv(table))
}

pub(crate) fn require_column(
    table: &'static str,
    headers: &StringRecord,
    column: &'static str,
) -> Result<usize, ParserError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or(ParserError::MissingColumn { table, column })
}

pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

pub(crate) fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or_default()
}

pub(crate) fn parse_required_u32(
    table: &'static str,
    value: &str,
    line: u64,
    column: &str,
) -> Result<u32, ParserError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|err| ParserError::DataRow {
            table,
            line,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}
