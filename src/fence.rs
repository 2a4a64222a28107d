use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

static FENCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\+\+\+|---)[ \t]*\r?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetadataFormat {
    /// `+++`
    Toml,
    /// `---`
    Yaml,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Split<'a> {
    pub format: MetadataFormat,
    pub metadata: &'a str,
    pub body: &'a str,
}

fn fence_of(line: &str) -> Option<MetadataFormat> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let caps = FENCE_LINE.captures(line)?;
    match &caps[1] {
        "+++" => Some(MetadataFormat::Toml),
        _ => Some(MetadataFormat::Yaml),
    }
}

/// Splits a blob into its metadata block and its body.
pub(crate) fn split(blob: &str) -> Result<Split<'_>, ParseError> {
    let blob = blob.strip_prefix('\u{feff}').unwrap_or(blob);

    let mut lines = blob.split_inclusive('\n');
    let opening = lines.next().unwrap_or_default();
    let format =
        fence_of(opening).ok_or_else(|| ParseError::malformed("missing opening fence"))?;

    let metadata_start = opening.len();
    let mut offset = metadata_start;
    for line in lines {
        if fence_of(line) == Some(format) {
            return Ok(Split {
                format,
                metadata: &blob[metadata_start..offset],
                body: &blob[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    Err(ParseError::malformed("missing closing fence"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+++\ntitle = \"X\"\n+++\nHello", MetadataFormat::Toml, "title = \"X\"\n", "Hello")]
    #[case("---\ntitle: X\n---\nHello\n", MetadataFormat::Yaml, "title: X\n", "Hello\n")]
    #[case("---\r\ntitle: X\r\n---\r\nHello", MetadataFormat::Yaml, "title: X\r\n", "Hello")]
    #[case("+++  \n+++", MetadataFormat::Toml, "", "")]
    #[case("\u{feff}+++\na = 1\n+++\n\nbody", MetadataFormat::Toml, "a = 1\n", "\nbody")]
    fn splits_fenced_blobs(
        #[case] blob: &str,
        #[case] format: MetadataFormat,
        #[case] metadata: &str,
        #[case] body: &str,
    ) {
        let split = split(blob).unwrap();
        assert_eq!(split.format, format);
        assert_eq!(split.metadata, metadata);
        assert_eq!(split.body, body);
    }

    #[test]
    fn closing_fence_must_match_opening_marker() {
        let split = split("+++\na = 1\n---\nb = 2\n+++\nbody").unwrap();
        assert_eq!(split.metadata, "a = 1\n---\nb = 2\n");
        assert_eq!(split.body, "body");
    }

    #[test]
    fn body_keeps_later_fence_lines() {
        let split = split("---\na: 1\n---\none\n---\ntwo").unwrap();
        assert_eq!(split.body, "one\n---\ntwo");
    }

    #[rstest]
    #[case("", "missing opening fence")]
    #[case("title = \"X\"\n+++\nbody", "missing opening fence")]
    #[case("\n+++\na = 1\n+++\n", "missing opening fence")]
    #[case("++++\na = 1\n++++\n", "missing opening fence")]
    #[case("+++\ntitle = \"X\"\nHello", "missing closing fence")]
    #[case("+++\na = 1\n---\n", "missing closing fence")]
    fn rejects_bad_structure(#[case] blob: &str, #[case] reason: &str) {
        assert_eq!(split(blob), Err(ParseError::malformed(reason)));
    }
}
