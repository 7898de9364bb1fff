/// Claim extraction from raw id token payloads
///
/// Only the display-relevant claims are kept. Values that are not JSON
/// strings are treated as absent, and a blank payload is an empty claim set.
use serde_json::{error::Category, Deserializer, Map, Value};
use std::fmt;

/// Display-relevant OIDC standard claims.
///
/// See OpenID Connect Core 1.0, section 5.1 (Standard Claims).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedClaims {
    pub sub: Option<String>,
    /// End-User's full name in displayable form
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    /// Casual name, may differ from given_name (Mike vs Michael)
    pub nickname: Option<String>,
    /// Shorthand name (janedoe, j.doe), not guaranteed unique
    pub preferred_username: Option<String>,
}

/// Why a payload could not be parsed as claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Malformed JSON
    Syntax,
    /// Input ended in the middle of a JSON value
    Eof,
    /// Well-formed JSON of an unexpected shape
    Data,
    Io,
}

impl ParseFailure {
    /// Stable classification code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            ParseFailure::Syntax => "JsonParseException",
            ParseFailure::Eof => "JsonEOFException",
            ParseFailure::Data => "MismatchedInputException",
            ParseFailure::Io => "JsonProcessingException",
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&serde_json::Error> for ParseFailure {
    fn from(err: &serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax => ParseFailure::Syntax,
            Category::Eof => ParseFailure::Eof,
            Category::Data => ParseFailure::Data,
            Category::Io => ParseFailure::Io,
        }
    }
}

/// Parse a raw id token payload into claims.
///
/// Only the first JSON value is read, anything after it is ignored.
pub fn parse_claims(raw: &str) -> Result<ParsedClaims, ParseFailure> {
    let value = match Deserializer::from_str(raw).into_iter::<Value>().next() {
        Some(value) => value.map_err(|e| ParseFailure::from(&e))?,
        None => return Ok(ParsedClaims::default()),
    };

    let obj = match value {
        Value::Object(obj) => obj,
        _ => return Ok(ParsedClaims::default()),
    };

    Ok(ParsedClaims {
        sub: text_claim(&obj, "sub"),
        name: text_claim(&obj, "name"),
        given_name: text_claim(&obj, "given_name"),
        family_name: text_claim(&obj, "family_name"),
        middle_name: text_claim(&obj, "middle_name"),
        nickname: text_claim(&obj, "nickname"),
        preferred_username: text_claim(&obj, "preferred_username"),
    })
}

fn text_claim(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
