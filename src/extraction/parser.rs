use thiserror::Error;

use crate::models::CharacteristicsDelta;

/// The extraction reply could not be decoded.
///
/// A failed parse drops the whole reply; nothing is partially applied.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("extraction reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("extraction reply is not a JSON object")]
    NotAnObject,
}

/// Decode a raw extraction reply into a characteristics delta.
///
/// Tolerates a Markdown code fence (with or without a language tag) around
/// the object. An empty object is a valid reply and yields an empty delta;
/// the filter downstream rejects it.
pub fn parse(raw_reply: &str) -> Result<CharacteristicsDelta, ParseError> {
    let cleaned = strip_code_fence(raw_reply);
    let value: serde_json::Value = serde_json::from_str(cleaned)?;
    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

fn strip_code_fence(reply: &str) -> &str {
    reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_object() {
        let delta = parse(r#"{"nb_room":3,"bedrooms_to_rent":2}"#).unwrap();
        assert_eq!(delta.nb_room, Some(3));
        assert_eq!(delta.bedrooms_to_rent, Some(2));
        assert_eq!(delta.apart_loc, None);
    }

    #[test]
    fn parses_a_fenced_object() {
        let delta = parse("```json\n{\"nb_room\":3,\"bedrooms_to_rent\":2}\n```").unwrap();
        assert_eq!(delta.nb_room, Some(3));
        assert_eq!(delta.bedrooms_to_rent, Some(2));
    }

    #[test]
    fn parses_a_fence_without_language_tag() {
        let delta = parse("```\n{\"bedrooms_to_rent\":2}\n```").unwrap();
        assert_eq!(delta.bedrooms_to_rent, Some(2));
    }

    #[test]
    fn free_text_is_a_parse_error() {
        assert!(matches!(parse("not json"), Err(ParseError::Json(_))));
    }

    #[test]
    fn non_object_json_is_a_parse_error() {
        assert!(matches!(parse("[1, 2, 3]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse("42"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn empty_object_is_an_empty_delta() {
        let delta = parse("{}").unwrap();
        assert_eq!(delta, CharacteristicsDelta::default());
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let delta = parse(r#"{"bedrooms_to_rent":2,"swimming_pool":true}"#).unwrap();
        assert_eq!(delta.bedrooms_to_rent, Some(2));
    }

    #[test]
    fn wrong_field_type_drops_the_whole_reply() {
        assert!(parse(r#"{"bedrooms_to_rent":"two"}"#).is_err());
    }
}
