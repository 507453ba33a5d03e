//! Normalise raw registry data into [`PeopleGroupRecord`] values.
//!
//! Two local delimited files and the remote registry's JSON use different
//! field names for the same data. [`parse`] maps each source's spelling onto
//! the canonical record, applying lenient defaults to malformed values.
//!
//! Only structurally unreadable input fails with [`ParseError`]. A row that
//! cannot become a record is reported as a [`SkippedRow`] and the batch
//! continues.

mod delimited;
mod headers;
mod numeric;
mod remote;

use std::collections::HashMap;
use std::fmt;

use frontier_core::{Coordinates, GroupType, PeopleGroupRecord};
use thiserror::Error;

use delimited::{UnterminatedQuote, split_fields};
use headers::{Field, canonical_field};

pub use remote::parse_remote_value;

/// Field delimiter of the local files.
pub const DELIMITER: char = ',';

/// Placeholder for a language or religion the remote registry omitted.
pub const UNKNOWN: &str = "Unknown";

/// Origin of a raw payload, selecting its header table and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Delimited file of existing people groups, used as search origins.
    ExistingUpgs,
    /// Delimited file of unengaged people groups, searched by radius.
    UupgDataset,
    /// JSON array returned by the remote registry.
    RemoteRegistry,
}

impl SourceKind {
    const fn is_remote(self) -> bool {
        matches!(self, Self::RemoteRegistry)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExistingUpgs => "existing UPG file",
            Self::UupgDataset => "UUPG dataset",
            Self::RemoteRegistry => "remote registry response",
        })
    }
}

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The name column was missing or blank.
    MissingName,
    /// A quoted field was never closed.
    UnterminatedQuote,
    /// A remote array entry was not a JSON object.
    NotAnObject,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingName => "missing name",
            Self::UnterminatedQuote => "unterminated quoted field",
            Self::NotAnObject => "entry is not an object",
        })
    }
}

/// A row dropped during parsing.
///
/// `line` is the 1-based line number for delimited input and the 1-based
/// array position for remote JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    /// Position of the row in the input.
    pub line: usize,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Records parsed from one payload, plus the rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Normalised records in input order.
    pub records: Vec<PeopleGroupRecord>,
    /// Dropped rows in input order.
    pub skipped: Vec<SkippedRow>,
}

/// Structural failures that abort parsing a payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained no lines.
    #[error("input is empty")]
    Empty,
    /// The header row could not be split into columns.
    #[error("header row has an unterminated quoted field")]
    MalformedHeader,
    /// No header column maps to the record name.
    #[error("header row of the {kind} has no name column")]
    MissingNameColumn {
        /// Source being parsed.
        kind: SourceKind,
    },
    /// The remote payload was valid JSON but not an array.
    #[error("expected a JSON array of people groups")]
    NotAnArray,
    /// The remote payload was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a raw payload of the given kind.
///
/// Delimited input must start with a header row; blank lines are ignored.
/// Remote input must be a JSON array of objects.
///
/// # Examples
/// ```
/// use frontier_data::normalize::{SourceKind, parse};
///
/// let csv = "name,country,latitude,longitude\nName,\"Country, Region\",1.0,2.0\n";
/// let report = parse(csv, SourceKind::UupgDataset)?;
/// let record = &report.records[0];
/// assert_eq!(record.name, "Name");
/// assert_eq!(record.country, "Country, Region");
/// assert_eq!(record.location.map(|c| (c.latitude(), c.longitude())), Some((1.0, 2.0)));
/// # Ok::<(), frontier_data::normalize::ParseError>(())
/// ```
pub fn parse(input: &str, kind: SourceKind) -> Result<ParseReport, ParseError> {
    match kind {
        SourceKind::RemoteRegistry => {
            if input.trim().is_empty() {
                return Err(ParseError::Empty);
            }
            let value: serde_json::Value = serde_json::from_str(input)?;
            parse_remote_value(&value)
        }
        SourceKind::ExistingUpgs | SourceKind::UupgDataset => parse_delimited(input, kind),
    }
}

fn parse_delimited(input: &str, kind: SourceKind) -> Result<ParseReport, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| (index + 1, line));

    let (_, header) = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or(ParseError::Empty)?;
    let columns: Vec<Option<Field>> = split_fields(header, DELIMITER)
        .map_err(|UnterminatedQuote| ParseError::MalformedHeader)?
        .iter()
        .map(|name| canonical_field(kind, name))
        .collect();
    if !columns.contains(&Some(Field::Name)) {
        return Err(ParseError::MissingNameColumn { kind });
    }

    let mut report = ParseReport::default();
    for (line, text) in lines {
        if text.trim().is_empty() {
            continue;
        }
        let outcome = split_fields(text, DELIMITER)
            .map_err(|UnterminatedQuote| SkipReason::UnterminatedQuote)
            .and_then(|values| {
                let fields = columns
                    .iter()
                    .zip(values)
                    .filter_map(|(column, value)| column.map(|field| (field, value)))
                    .collect();
                build_record(&fields, kind)
            });
        match outcome {
            Ok(record) => report.records.push(record),
            Err(reason) => report.skipped.push(SkippedRow { line, reason }),
        }
    }
    Ok(report)
}

/// Raw values keyed by canonical field. Later duplicates overwrite earlier
/// ones.
pub(crate) type RawFields = HashMap<Field, String>;

pub(crate) fn build_record(
    fields: &RawFields,
    kind: SourceKind,
) -> Result<PeopleGroupRecord, SkipReason> {
    let text = |field: Field| fields.get(&field).map_or("", |value| value.trim());
    let mut record = PeopleGroupRecord::new(text(Field::Name), text(Field::Country))
        .map_err(|_| SkipReason::MissingName)?;

    record.pronunciation = text(Field::Pronunciation).to_owned();
    record.location = match (
        numeric::decimal(text(Field::Latitude)),
        numeric::decimal(text(Field::Longitude)),
    ) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
        _ => None,
    };
    record.population = numeric::population(text(Field::Population));
    record.language = descriptive(text(Field::Language), kind);
    record.religion = descriptive(text(Field::Religion), kind);
    record.evangelical = if let Some(percent) = fields.get(&Field::EvangelicalPercent) {
        numeric::evangelical(percent, true)
    } else {
        numeric::evangelical(text(Field::EvangelicalFraction), false)
    };
    if kind.is_remote() {
        record.group_type = Some(GroupType::Fpg);
    }
    Ok(record)
}

fn descriptive(value: &str, kind: SourceKind) -> String {
    if value.is_empty() && kind.is_remote() {
        UNKNOWN.to_owned()
    } else {
        value.to_owned()
    }
}
