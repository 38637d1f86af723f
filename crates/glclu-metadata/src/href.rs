//! Href templates with named placeholders.
//!
//! A template like `s3://bucket/{version}/{year}/{loc}.tif` is compiled to
//! an anchored regex with one named, non-greedy capture group per
//! placeholder. Matching a concrete href recovers the field values, and the
//! captured `year` field is interpreted a second time to distinguish annual
//! assets from change (year-range) assets occupying the same path segment.

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

use crate::collections::CollectionId;
use crate::error::{MetadataError, MetadataResult};

/// Placeholders every template must declare, alphabetical.
pub const REQUIRED_FIELDS: [&str; 2] = ["version", "year"];

/// A validated href template.
#[derive(Debug, Clone)]
pub struct HrefTemplate {
    template: String,
    pattern: Regex,
    fields: Vec<String>,
}

impl HrefTemplate {
    /// Compile and validate a template string.
    ///
    /// Fails when a placeholder is malformed or when any of
    /// [`REQUIRED_FIELDS`] is absent; the error names the missing fields in
    /// sorted order.
    pub fn new(template: &str) -> MetadataResult<Self> {
        let (pattern, fields) = compile(template)?;

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|required| !fields.iter().any(|f| f == *required))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MetadataError::MissingPlaceholders { missing });
        }

        Ok(Self {
            template: template.to_string(),
            pattern,
            fields,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in template-declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Match an href against the template.
    ///
    /// Returns captured `(name, value)` pairs in template order, or `None`
    /// when the href does not match. A non-match is expected when several
    /// templates are tried against one href, so it is not an error.
    pub fn parse(&self, href: &str) -> Option<Vec<(String, String)>> {
        let captures = self.pattern.captures(href)?;
        Some(
            self.fields
                .iter()
                .map(|name| (name.clone(), captures[name.as_str()].to_string()))
                .collect(),
        )
    }
}

/// Translate `{name}` placeholders into named non-greedy capture groups,
/// regex-escaping the literal text between them.
fn compile(template: &str) -> MetadataResult<(Regex, Vec<String>)> {
    let invalid = |reason: String| MetadataError::InvalidTemplate {
        template: template.to_string(),
        reason,
    };

    let mut pattern = String::from("^");
    let mut fields: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let literal = &rest[..open];
        if literal.contains('}') {
            return Err(invalid("unbalanced '}'".to_string()));
        }
        pattern.push_str(&regex::escape(literal));

        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| invalid("unbalanced '{'".to_string()))?;
        let name = &after[..close];

        let valid_name = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !name.starts_with(|c: char| c.is_ascii_digit());
        if !valid_name {
            return Err(invalid(format!("invalid placeholder name '{}'", name)));
        }
        if fields.iter().any(|f| f == name) {
            return Err(invalid(format!("duplicate placeholder '{}'", name)));
        }

        pattern.push_str(&format!("(?P<{}>.+?)", name));
        fields.push(name.to_string());
        rest = &after[close + 1..];
    }

    if rest.contains('}') {
        return Err(invalid("unbalanced '}'".to_string()));
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;
    Ok((regex, fields))
}

/// Interpreted `year` field of a parsed href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearField {
    /// A single-year asset, e.g. `2000`
    Annual(i32),
    /// A year-range change asset, e.g. `2000-2020change`
    Change { start: i32, end: i32 },
}

fn change_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{4})change$").expect("static pattern"))
}

fn annual_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})$").expect("static pattern"))
}

impl YearField {
    /// Interpret a captured year field value.
    ///
    /// The change sub-format is tried before the plain year so that a range
    /// is never truncated to its first component.
    pub fn parse(value: &str) -> MetadataResult<Self> {
        if let Some(captures) = change_pattern().captures(value) {
            let start = captures[1].parse().unwrap_or(0);
            let end = captures[2].parse().unwrap_or(0);
            return Ok(YearField::Change { start, end });
        }
        if let Some(captures) = annual_pattern().captures(value) {
            let year = captures[1].parse().unwrap_or(0);
            return Ok(YearField::Annual(year));
        }
        Err(MetadataError::YearFormat(value.to_string()))
    }

    /// Collection the year field shape routes to.
    pub fn collection_id(&self) -> CollectionId {
        match self {
            YearField::Annual(_) => CollectionId::Annual,
            YearField::Change { .. } => CollectionId::Change,
        }
    }

    /// Nominal item datetime: Jan 1 of the year, or of the end year for a
    /// change range.
    pub fn datetime(&self) -> DateTime<Utc> {
        match self {
            YearField::Annual(year) => year_start(*year),
            YearField::Change { end, .. } => year_start(*end),
        }
    }

    /// Start/end pair for a change range; `None` for annual instants.
    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            YearField::Annual(_) => None,
            YearField::Change { start, end } => Some((year_start(*start), year_end(*end))),
        }
    }
}

pub(crate) fn year_start(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn year_end(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or_default()
}

/// Fields recovered from matching one href against one template.
#[derive(Debug, Clone)]
pub struct ParsedHref {
    /// Captured field values joined by `_` in template order
    pub id: String,
    /// The captured `version` field
    pub version: String,
    /// Interpreted `year` field
    pub year: YearField,
    /// All captured fields in template order
    pub fields: Vec<(String, String)>,
}

impl ParsedHref {
    /// Interpret raw template captures.
    ///
    /// Fails with [`MetadataError::YearFormat`] when the year field matches
    /// neither accepted sub-format.
    pub fn from_captures(fields: Vec<(String, String)>) -> MetadataResult<Self> {
        let lookup = |name: &str| {
            fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };

        let year = YearField::parse(&lookup("year"))?;
        let id = fields
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join("_");

        Ok(Self {
            id,
            version: lookup("version"),
            year,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_template() {
        let template = HrefTemplate::new("test/{version}/{year}/{loc}.tif").unwrap();
        assert_eq!(template.fields(), &["version", "year", "loc"]);
    }

    #[test]
    fn test_missing_version() {
        let err = HrefTemplate::new("test/{ver}/{year}/{loc}.tif").unwrap_err();
        match err {
            MetadataError::MissingPlaceholders { missing } => {
                assert_eq!(missing, vec!["version".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = HrefTemplate::new("test/{ver}/{year}/{loc}.tif")
            .unwrap_err()
            .to_string();
        assert!(message.contains("missing required parameters: version"));
    }

    #[test]
    fn test_missing_both_sorted() {
        let err = HrefTemplate::new("test/{loc}.tif").unwrap_err();
        match err {
            MetadataError::MissingPlaceholders { missing } => {
                assert_eq!(missing, vec!["version".to_string(), "year".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_templates() {
        assert!(HrefTemplate::new("test/{version}/{year/{loc}.tif").is_err());
        assert!(HrefTemplate::new("test/{version}/{year}/{}.tif").is_err());
        assert!(HrefTemplate::new("test/{version}/{year}/{year}.tif").is_err());
        assert!(HrefTemplate::new("test/{version}}/{year}/x.tif").is_err());
    }

    #[test]
    fn test_parse_round_trip() {
        let template = HrefTemplate::new("s3://bucket/{version}/{year}/{loc}.tif").unwrap();
        let parsed = template
            .parse("s3://bucket/v2/2000/40N_080W.tif")
            .expect("href should match");
        assert_eq!(
            parsed,
            vec![
                ("version".to_string(), "v2".to_string()),
                ("year".to_string(), "2000".to_string()),
                ("loc".to_string(), "40N_080W".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_no_match() {
        let template = HrefTemplate::new("test/{version}/{year}/{loc}.tif").unwrap();
        assert!(template.parse("40N_080W.tif").is_none());
        assert!(template.parse("other/v2/2000/40N_080W.tif").is_none());
    }

    #[test]
    fn test_year_field_annual() {
        let year = YearField::parse("2000").unwrap();
        assert_eq!(year, YearField::Annual(2000));
        assert_eq!(year.collection_id(), CollectionId::Annual);
        assert_eq!(year.datetime(), year_start(2000));
        assert!(year.range().is_none());
    }

    #[test]
    fn test_year_field_change() {
        let year = YearField::parse("2000-2020change").unwrap();
        assert_eq!(
            year,
            YearField::Change {
                start: 2000,
                end: 2020
            }
        );
        assert_eq!(year.collection_id(), CollectionId::Change);
        assert_eq!(year.datetime(), year_start(2020));
        let (start, end) = year.range().unwrap();
        assert_eq!(start.to_rfc3339(), "2000-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2020-12-31T23:59:59+00:00");
    }

    #[test]
    fn test_year_field_rejects_bad_shapes() {
        for value in ["20000", "2000-20200change", "200", "change", "2000-2020"] {
            let err = YearField::parse(value).unwrap_err();
            assert!(matches!(err, MetadataError::YearFormat(_)), "{value}");
            assert!(err.to_string().contains(value));
        }
    }

    #[test]
    fn test_parsed_href_id_joins_in_template_order() {
        let template = HrefTemplate::new("test/{version}/{year}/{loc}.tif").unwrap();
        let captures = template.parse("test/v2/2000/40N_080W.tif").unwrap();
        let parsed = ParsedHref::from_captures(captures).unwrap();
        assert_eq!(parsed.id, "v2_2000_40N_080W");
        assert_eq!(parsed.version, "v2");
    }
}
