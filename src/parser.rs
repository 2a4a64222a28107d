use log::debug;

use crate::{entry::ContentEntry, error::ParseError, fence, fields, metadata};

/// Parses one front-matter-delimited post.
///
/// The blob must open with a `+++` (TOML) or `---` (YAML) fence line and close
/// the metadata block with the same marker. Everything after the closing fence
/// line is the body, kept as raw Markdown.
pub fn parse(blob: &str) -> Result<ContentEntry, ParseError> {
    let split = fence::split(blob)?;
    debug!(
        "{:?} metadata block: {} bytes, body: {} bytes",
        split.format,
        split.metadata.len(),
        split.body.len()
    );

    let metadata = metadata::decode(split.format, split.metadata)?;
    fields::decode(&metadata, split.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rstest::rstest;

    #[test]
    fn parses_toml_post() {
        let blob = "+++\ntitle = \"X\"\ndate = \"2022-06-21T22:42:09+02:00\"\ntags = [\"swift\",\"gotcha\"]\n+++\nHello";
        let entry = parse(blob).unwrap();
        assert_eq!(entry.title(), "X");
        assert_eq!(
            entry.date(),
            DateTime::parse_from_rfc3339("2022-06-21T22:42:09+02:00").unwrap()
        );
        assert_eq!(entry.date().offset().local_minus_utc(), 2 * 3600);
        assert_eq!(entry.tags(), ["swift", "gotcha"]);
        assert!(!entry.is_draft());
        assert!(!entry.show_full_content());
        assert_eq!(entry.body(), "Hello");
    }

    #[test]
    fn parses_yaml_post() {
        let blob = "---\ntitle: \"CoreData gotcha\"\ndate: 2022-06-21T22:42:09+02:00\nauthor: me\ndraft: true\nshowFullContent: false\nlayout: post\n---\n\n# Heading\n";
        let entry = parse(blob).unwrap();
        assert_eq!(entry.title(), "CoreData gotcha");
        assert_eq!(entry.author(), Some("me"));
        assert!(entry.is_draft());
        assert_eq!(entry.body(), "\n# Heading\n");
    }

    #[test]
    fn metadata_errors_surface_before_field_errors() {
        let err = parse("+++\ntitle = [\n+++\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedStructure(_)));
    }

    #[rstest]
    #[case("title = nan\ndate = 2022-06-21T22:42:09Z\n", "title", "expected a string")]
    #[case("title = \"X\"\ndate = inf\n", "date", "invalid timestamp")]
    #[case("title = \"X\"\ndate = 2022-06-21T22:42:09Z\ndraft = nan\n", "draft", "expected a boolean")]
    #[case("title = \"X\"\ndate = 2022-06-21T22:42:09Z\nshowFullContent = -inf\n", "showFullContent", "expected a boolean")]
    fn non_finite_floats_are_wrong_types(
        #[case] metadata: &str,
        #[case] key: &'static str,
        #[case] reason: &str,
    ) {
        let err = parse(&format!("+++\n{metadata}+++\n")).unwrap_err();
        assert_eq!(err, ParseError::field(key, reason));
    }
}
