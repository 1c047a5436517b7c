//! CSV escaping, parsing, header-keyed reading and whole-file writing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::mem::take;
use std::path::Path;

use crate::error::ListingsError;

/// Quote a field when it contains `"`, `,`, `\n` or `\r`, doubling inner quotes.
#[must_use]
pub fn escape_csv(value: &str) -> Cow<'_, str> {
    if value.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Escape and comma-join one record, without a line terminator.
#[must_use]
pub fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| escape_csv(field.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// One data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    values: HashMap<String, String>,
}

impl CsvRow {
    /// Value of `column`, or `""` when the column is absent.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map_or("", String::as_str)
    }

    /// First value among `columns` that is not blank, or `""`.
    #[must_use]
    pub fn first_of(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .map(|column| self.get(column))
            .find(|value| !value.trim().is_empty())
            .unwrap_or("")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Split CSV text into records of raw fields.
///
/// Quoted fields may contain separators, doubled quotes and line breaks.
/// `\r\n` and `\n` both end a record. Empty lines yield no record.
#[must_use]
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => record.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut field);
            }
            c => field.push(c),
        }
    }
    end_record(&mut records, &mut record, &mut field);
    records
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(take(field));
    if record.len() == 1 && record[0].is_empty() {
        record.clear();
    } else {
        records.push(take(record));
    }
}

/// Read a CSV file with a header row into header-keyed rows.
///
/// Blank lines are skipped and short rows are tolerated. At most `max_rows`
/// rows are returned when a cap is given.
///
/// # Errors
///
/// Returns [`ListingsError::Read`] if the file cannot be read.
pub fn read_csv_rows(path: &Path, max_rows: Option<usize>) -> Result<Vec<CsvRow>, ListingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| ListingsError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_csv_rows(&content, max_rows))
}

fn parse_csv_rows(content: &str, max_rows: Option<usize>) -> Vec<CsvRow> {
    let mut records = parse_records(content).into_iter();
    let Some(header) = records.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    records
        .filter(|record| record.iter().any(|field| !field.trim().is_empty()))
        .take(max_rows.unwrap_or(usize::MAX))
        .map(|record| header.iter().cloned().zip(record).collect())
        .collect()
}

/// Write `header` and `lines` to `path`, creating parent directories.
///
/// `lines` must already be escaped (see [`csv_line`]).
///
/// # Errors
///
/// Returns [`ListingsError::Write`] on any I/O failure.
pub fn write_csv(path: &Path, header: &[&str], lines: &[String]) -> Result<(), ListingsError> {
    let write_err = |e| ListingsError::Write {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut output = csv_line(header);
    output.push('\n');
    for line in lines {
        output.push_str(line);
        output.push('\n');
    }
    std::fs::write(path, output).map_err(write_err)
}

/// Append escaped `lines` to an existing CSV file.
///
/// A newline is inserted first when the file does not end with one.
/// Nothing is written when `lines` is empty.
///
/// # Errors
///
/// Returns [`ListingsError::Read`] if the file cannot be read and
/// [`ListingsError::Write`] if it cannot be rewritten.
pub fn append_csv_lines(path: &Path, lines: &[String]) -> Result<(), ListingsError> {
    if lines.is_empty() {
        return Ok(());
    }
    let mut content = std::fs::read_to_string(path).map_err(|e| ListingsError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|e| ListingsError::Write {
        path: path.display().to_string(),
        source: e,
    })
}
