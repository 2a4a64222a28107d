use serde_json::{json, Map, Number, Value};

use crate::{error::ParseError, fence::MetadataFormat};

/// Decodes the text between the fences into a generic key/value mapping.
pub(crate) fn decode(
    format: MetadataFormat,
    text: &str,
) -> Result<Map<String, Value>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }

    match format {
        MetadataFormat::Toml => {
            let table: toml::Table = toml::from_str(text)
                .map_err(|e| ParseError::malformed(format!("invalid TOML metadata: {e}")))?;
            Ok(table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect())
        }
        MetadataFormat::Yaml => {
            let value: Value = serde_yaml::from_str(text)
                .map_err(|e| ParseError::malformed(format!("invalid YAML metadata: {e}")))?;
            match value {
                Value::Object(map) => Ok(map),
                Value::Null => Ok(Map::new()),
                _ => Err(ParseError::malformed("metadata is not a key/value mapping")),
            }
        }
    }
}

// datetimes become their RFC 3339 text, so quoted and bare dates decode alike
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        // no nan/inf in JSON; an object keeps the key present and fails every decoder
        toml::Value::Float(f) => Number::from_f64(f)
            .map_or_else(|| json!({ "float": f.to_string() }), Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn toml_datetime_is_normalized_to_text() {
        let map = decode(
            MetadataFormat::Toml,
            "date = 2022-06-21T22:42:09+02:00\ntags = [\"a\"]\n",
        )
        .unwrap();
        assert_eq!(map["date"], json!("2022-06-21T22:42:09+02:00"));
        assert_eq!(map["tags"], json!(["a"]));
    }

    #[test]
    fn yaml_mapping_is_decoded() {
        let map = decode(MetadataFormat::Yaml, "title: X\ndraft: true\ntags: [a, b]\n").unwrap();
        assert_eq!(map["title"], json!("X"));
        assert_eq!(map["draft"], json!(true));
        assert_eq!(map["tags"], json!(["a", "b"]));
    }

    #[rstest]
    #[case("x = nan\n")]
    #[case("x = inf\n")]
    #[case("x = -inf\n")]
    fn non_finite_floats_stay_present(#[case] text: &str) {
        let map = decode(MetadataFormat::Toml, text).unwrap();
        assert!(map["x"].is_object());
    }

    #[test]
    fn blank_block_is_empty_mapping() {
        assert!(decode(MetadataFormat::Toml, "\n  \n").unwrap().is_empty());
        assert!(decode(MetadataFormat::Yaml, "").unwrap().is_empty());
    }

    #[test]
    fn syntax_errors_are_malformed_structure() {
        let err = decode(MetadataFormat::Toml, "title = \n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedStructure(_)));

        let err = decode(MetadataFormat::Yaml, "- just\n- a list\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::malformed("metadata is not a key/value mapping")
        );
    }
}
