use crate::error::{DiagramError, Result};

use super::model::Metadata;

// ---------------------------------------------------------------------------
// Marker line parser
// ---------------------------------------------------------------------------

/// Parse a marker line into its metadata.
///
/// The line is a comma separated list of `key: value` fields, optionally
/// prefixed by a single `#`:
///
/// ```text
/// # title: "Antenna A", color: red, bold: 2.0
/// ```
///
/// * `title` and `color` are kept as strings, `bold` must be numeric.
/// * Values wrapped in `"` lose one layer of quotes.
/// * Unknown keys are ignored, repeated keys overwrite earlier ones.
///
/// `line_no` is only used to locate errors.
pub fn parse_metadata(line: &str, line_no: usize) -> Result<Metadata> {
    let body = line.strip_prefix('#').unwrap_or(line);
    let mut meta = Metadata::default();

    if body.trim().is_empty() {
        return Ok(meta);
    }

    for field in body.split(',') {
        let (key, value) = split_field(field, line_no)?;

        match key {
            "title" => meta.title = value.to_string(),
            "color" => meta.color = value.to_string(),
            "bold" => {
                let weight = value.parse::<f64>().map_err(|_| DiagramError::MalformedMetadata {
                    line: line_no,
                    field: field.trim().to_string(),
                    reason: format!("has non-numeric bold value '{value}'"),
                })?;
                meta.bold = Some(weight);
            }
            other => log::debug!("line {line_no}: ignoring unknown metadata key '{other}'"),
        }
    }

    Ok(meta)
}

/// Split one `key: value` field on its first colon, trimming both sides
/// and unquoting the value.
fn split_field(field: &str, line_no: usize) -> Result<(&str, &str)> {
    let malformed = |reason: &str| DiagramError::MalformedMetadata {
        line: line_no,
        field: field.trim().to_string(),
        reason: reason.to_string(),
    };

    let (key, value) = field
        .split_once(':')
        .ok_or_else(|| malformed("is missing a ':' separator"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(malformed("has an empty key"));
    }

    Ok((key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_known_keys() {
        let meta = parse_metadata(r#"# title: "Antenna A", color: "red", bold: 2.0"#, 1).unwrap();
        assert_eq!(meta.title, "Antenna A");
        assert_eq!(meta.color, "red");
        assert_eq!(meta.bold, Some(2.0));
    }

    #[test]
    fn marker_round_trip() {
        for (title, color, bold) in [("X", "green", 0.5), ("Main lobe", "#ff8800", 3.0)] {
            let line = format!("#title: \"{title}\", color: {color}, bold: {bold}");
            let meta = parse_metadata(&line, 7).unwrap();
            assert_eq!(
                meta,
                Metadata {
                    title: title.to_string(),
                    color: color.to_string(),
                    bold: Some(bold),
                }
            );
        }
    }

    #[test]
    fn missing_keys_use_defaults() {
        let meta = parse_metadata("#color: blue", 1).unwrap();
        assert_eq!(meta.title, "");
        assert_eq!(meta.color, "blue");
        assert_eq!(meta.bold, None);
    }

    #[test]
    fn leading_hash_is_optional() {
        let with = parse_metadata("#title: A", 1).unwrap();
        let without = parse_metadata("title: A", 1).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn blank_marker_yields_defaults() {
        assert_eq!(parse_metadata("#", 1).unwrap(), Metadata::default());
        assert_eq!(parse_metadata("#   ", 1).unwrap(), Metadata::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let meta = parse_metadata(r#"#foo: bar, title: "A", color: red"#, 1).unwrap();
        assert_eq!(meta.title, "A");
        assert_eq!(meta.color, "red");
        assert_eq!(meta.bold, None);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let meta = parse_metadata("#color: red, title: A, color: blue, bold: 1, bold: 4", 1).unwrap();
        assert_eq!(meta.color, "blue");
        assert_eq!(meta.bold, Some(4.0));
    }

    #[test]
    fn strips_only_one_quote_layer() {
        let meta = parse_metadata(r#"#title: ""quoted"""#, 1).unwrap();
        assert_eq!(meta.title, r#""quoted""#);
    }

    #[test]
    fn lone_quote_is_kept() {
        let meta = parse_metadata(r#"#title: ""#, 1).unwrap();
        assert_eq!(meta.title, "\"");
    }

    #[test]
    fn keys_are_case_sensitive() {
        let meta = parse_metadata("#Title: A, COLOR: red", 1).unwrap();
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn missing_colon_names_field_and_line() {
        let err = parse_metadata("#title X, color: red", 12).unwrap_err();
        match err {
            DiagramError::MalformedMetadata { line, field, .. } => {
                assert_eq!(line, 12);
                assert_eq!(field, "title X");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_key_is_malformed() {
        let err = parse_metadata("#: red", 3).unwrap_err();
        assert!(matches!(err, DiagramError::MalformedMetadata { line: 3, .. }));
    }

    #[test]
    fn non_numeric_bold_is_malformed() {
        let err = parse_metadata("#title: A, bold: heavy", 5).unwrap_err();
        match err {
            DiagramError::MalformedMetadata { line, field, reason } => {
                assert_eq!(line, 5);
                assert_eq!(field, "bold: heavy");
                assert!(reason.contains("heavy"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn value_may_contain_colons() {
        let meta = parse_metadata(r#"#title: "Run 12:30""#, 1).unwrap();
        assert_eq!(meta.title, "Run 12:30");
    }
}
