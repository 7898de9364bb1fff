/// Identity replication from OIDC id tokens
///
/// Raw id tokens are stored per subject; display identities are resolved
/// from their claims on every read and never stored.

pub mod batch;
pub mod claims;
pub mod resolver;
pub mod service;
pub mod store;

pub use batch::LookupOutcome;
pub use claims::{parse_claims, ParseFailure, ParsedClaims};
pub use service::IdentityService;
pub use store::{ClaimStore, SqliteClaimStore};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error code for subjects without a stored token
pub const INVALID_USER_ID: &str = "INVALID_USER_ID";

/// Display identity of a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIdentity {
    pub sub: String,
    pub first_name: String,
    pub last_name: String,
}

impl ResolvedIdentity {
    /// Parse a raw token and resolve its display names for `sub`
    pub fn from_idtoken(sub: &str, idtoken: &str) -> Result<Self, ParseFailure> {
        let claims = parse_claims(idtoken)?;
        let (first_name, last_name) = resolver::resolve(sub, &claims);

        Ok(Self {
            sub: sub.to_string(),
            first_name,
            last_name,
        })
    }
}

/// Per-subject error of a batch lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityErrorEntry {
    pub sub: String,
    pub code: String,
}

impl IdentityErrorEntry {
    pub fn new(sub: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            code: code.into(),
        }
    }
}

/// Batch lookup result, every requested subject is a key of exactly one map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitiesResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, ResolvedIdentity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, IdentityErrorEntry>>,
}

impl IdentitiesResult {
    /// Build a result, leaving out empty maps
    pub fn new(
        data: HashMap<String, ResolvedIdentity>,
        errors: HashMap<String, IdentityErrorEntry>,
    ) -> Self {
        Self {
            data: (!data.is_empty()).then_some(data),
            errors: (!errors.is_empty()).then_some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_idtoken() {
        let identity =
            ResolvedIdentity::from_idtoken("foo1", r#"{"sub":"foo1","given_name":"bar1","family_name":"baz1"}"#)
                .unwrap();
        assert_eq!(
            identity,
            ResolvedIdentity {
                sub: "foo1".to_string(),
                first_name: "bar1".to_string(),
                last_name: "baz1".to_string(),
            }
        );
    }

    #[test]
    fn test_from_idtoken_keeps_stored_sub() {
        let identity =
            ResolvedIdentity::from_idtoken("foo1", r#"{"sub":"foo2","given_name":"bar2","family_name":"baz2"}"#)
                .unwrap();
        assert_eq!(identity.sub, "foo1");
        assert_eq!(identity.first_name, "bar2");
    }

    #[test]
    fn test_identity_json_is_camel_case() {
        let identity = ResolvedIdentity {
            sub: "sub1".to_string(),
            first_name: "foo".to_string(),
            last_name: "bar".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&identity).unwrap(),
            serde_json::json!({"sub": "sub1", "firstName": "foo", "lastName": "bar"})
        );
    }

    #[test]
    fn test_empty_maps_are_omitted() {
        let result = IdentitiesResult::new(HashMap::new(), HashMap::new());
        assert_eq!(serde_json::to_value(&result).unwrap(), serde_json::json!({}));

        let mut errors = HashMap::new();
        errors.insert("x".to_string(), IdentityErrorEntry::new("x", INVALID_USER_ID));
        let result = IdentitiesResult::new(HashMap::new(), errors);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"errors": {"x": {"sub": "x", "code": "INVALID_USER_ID"}}})
        );
    }
}
