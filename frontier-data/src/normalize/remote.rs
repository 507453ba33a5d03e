//! Normalise the remote registry's JSON payload.

use serde_json::Value;

use super::{ParseError, ParseReport, RawFields, SkipReason, SkippedRow, SourceKind, build_record};
use super::headers::canonical_field;

/// Parse an already decoded remote payload.
///
/// The payload must be an array. Each object's keys are matched
/// case-insensitively; strings and numbers are both accepted as values.
/// Records are tagged as frontier groups and percentages are converted to
/// fractions.
///
/// # Examples
/// ```
/// use frontier_core::GroupType;
/// use frontier_data::normalize::parse_remote_value;
///
/// let payload = serde_json::json!([{
///     "PeopNameInCountry": "Kanuri, Yerwa",
///     "Ctry": "Chad",
///     "Latitude": "13.1",
///     "Longitude": 14.2,
///     "Population": "250000",
///     "PercentEvangelical": "0.1",
/// }]);
/// let report = parse_remote_value(&payload)?;
/// let record = &report.records[0];
/// assert_eq!(record.group_type, Some(GroupType::Fpg));
/// assert_eq!(record.language, "Unknown");
/// assert!((record.evangelical - 0.001).abs() < 1e-12);
/// # Ok::<(), frontier_data::normalize::ParseError>(())
/// ```
pub fn parse_remote_value(payload: &Value) -> Result<ParseReport, ParseError> {
    let entries = payload.as_array().ok_or(ParseError::NotAnArray)?;
    let mut report = ParseReport::default();
    for (index, entry) in entries.iter().enumerate() {
        let outcome = entry
            .as_object()
            .ok_or(SkipReason::NotAnObject)
            .and_then(|object| {
                let fields: RawFields = object
                    .iter()
                    .filter_map(|(key, value)| {
                        let field = canonical_field(SourceKind::RemoteRegistry, key)?;
                        Some((field, scalar_text(value)?))
                    })
                    .collect();
                build_record(&fields, SourceKind::RemoteRegistry)
            });
        match outcome {
            Ok(record) => report.records.push(record),
            Err(reason) => report.skipped.push(SkippedRow {
                line: index + 1,
                reason,
            }),
        }
    }
    Ok(report)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn parses_string_and_numeric_values() {
        let payload = json!([{
            "PeopNameInCountry": "Tubu",
            "Ctry": "Niger",
            "Latitude": 17.5,
            "Longitude": "11.0",
            "Population": 85000,
            "PrimaryLanguageName": "Tedaga",
            "PrimaryReligion": "",
            "Pronunciation": "TOO-boo",
        }]);
        let report = parse_remote_value(&payload).expect("array payload");
        let record = &report.records[0];
        assert_eq!(record.id, "tubu-niger");
        assert_eq!(record.population, 85_000);
        assert_eq!(record.language, "Tedaga");
        assert_eq!(record.religion, "Unknown");
        assert_eq!(record.display_name(), "Tubu (TOO-boo)");
        assert!(record.location.is_some());
    }

    #[rstest]
    fn skips_non_objects_and_nameless_entries() {
        let payload = json!([
            "stray",
            {"Ctry": "Chad"},
            {"PeopNameInCountry": "Kanembu", "Ctry": "Chad", "Latitude": null}
        ]);
        let report = parse_remote_value(&payload).expect("array payload");
        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].location.is_none());
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow { line: 1, reason: SkipReason::NotAnObject },
                SkippedRow { line: 2, reason: SkipReason::MissingName },
            ]
        );
    }

    #[rstest]
    fn rejects_non_array_payloads() {
        let err = parse_remote_value(&json!({"status": "error"})).expect_err("object payload");
        assert!(matches!(err, ParseError::NotAnArray));
    }

    #[rstest]
    fn rejects_invalid_json_text() {
        let err = parse("[{", SourceKind::RemoteRegistry).expect_err("truncated JSON");
        assert!(matches!(err, ParseError::Json(_)));
    }
}
