use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::{entry::ContentEntry, error::ParseError};

#[derive(Debug, Default)]
struct Pending {
    title: Option<String>,
    date: Option<DateTime<FixedOffset>>,
    author: Option<String>,
    author_twitter: Option<String>,
    cover: Option<String>,
    tags: Vec<String>,
    keywords: Vec<String>,
    draft: bool,
    show_full_content: bool,
}

type Decoder = fn(&Value, &mut Pending) -> Result<(), String>;

struct FieldSpec {
    key: &'static str,
    required: bool,
    decode: Decoder,
}

const fn required(key: &'static str, decode: Decoder) -> FieldSpec {
    FieldSpec {
        key,
        required: true,
        decode,
    }
}

const fn optional(key: &'static str, decode: Decoder) -> FieldSpec {
    FieldSpec {
        key,
        required: false,
        decode,
    }
}

// visited in this order; the first failing row is reported
static FIELDS: &[FieldSpec] = &[
    required("title", |v, d| {
        d.title = Some(string(v)?);
        Ok(())
    }),
    required("date", |v, d| {
        d.date = Some(timestamp(v)?);
        Ok(())
    }),
    optional("author", |v, d| {
        d.author = Some(string(v)?);
        Ok(())
    }),
    optional("authorTwitter", |v, d| {
        d.author_twitter = Some(string(v)?);
        Ok(())
    }),
    optional("cover", |v, d| {
        d.cover = Some(string(v)?);
        Ok(())
    }),
    optional("tags", |v, d| {
        d.tags = strings(v)?;
        Ok(())
    }),
    optional("keywords", |v, d| {
        d.keywords = strings(v)?;
        Ok(())
    }),
    optional("draft", |v, d| {
        d.draft = boolean(v)?;
        Ok(())
    }),
    optional("showFullContent", |v, d| {
        d.show_full_content = boolean(v)?;
        Ok(())
    }),
];

fn string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err("expected a string".to_string()),
    }
}

fn strings(value: &Value) -> Result<Vec<String>, String> {
    let err = || "expected a list of strings".to_string();
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(err))
            .collect(),
        _ => Err(err()),
    }
}

fn boolean(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err("expected a boolean".to_string()),
    }
}

fn timestamp(value: &Value) -> Result<DateTime<FixedOffset>, String> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .ok_or_else(|| "invalid timestamp".to_string())
}

/// Runs every recognized key through its decoder. Keys not in the table are ignored.
pub(crate) fn decode(
    metadata: &Map<String, Value>,
    body: &str,
) -> Result<ContentEntry, ParseError> {
    let mut pending = Pending::default();

    for field in FIELDS {
        match metadata.get(field.key) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(ParseError::field(field.key, "missing"));
                }
            }
            Some(value) => {
                (field.decode)(value, &mut pending)
                    .map_err(|reason| ParseError::field(field.key, reason))?;
            }
        }
    }

    Ok(ContentEntry {
        title: pending
            .title
            .ok_or_else(|| ParseError::field("title", "missing"))?,
        date: pending
            .date
            .ok_or_else(|| ParseError::field("date", "missing"))?,
        author: pending.author,
        author_twitter: pending.author_twitter,
        cover: pending.cover,
        tags: pending.tags,
        keywords: pending.keywords,
        draft: pending.draft,
        show_full_content: pending.show_full_content,
        body: body.to_string(),
    })
}
