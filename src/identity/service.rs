/// Identity service - reads and writes of replicated identities
use crate::{
    db::identity::UpsertOutcome,
    error::{IdentityError, IdentityResult},
    identity::{ClaimStore, ResolvedIdentity},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default bound on stored token length, in characters
pub const DEFAULT_MAX_CLAIMS_LEN: usize = 4096;

/// Identity service
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn ClaimStore>,
    max_claims_len: usize,
}

impl IdentityService {
    /// Create a new identity service
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            store,
            max_claims_len: DEFAULT_MAX_CLAIMS_LEN,
        }
    }

    /// Set a custom bound on stored token size
    pub fn with_max_claims_len(mut self, max_claims_len: usize) -> Self {
        self.max_claims_len = max_claims_len;
        self
    }

    /// Get the display identity of a subject, `None` if no token is stored
    pub async fn get_identity(&self, sub: &str) -> IdentityResult<Option<ResolvedIdentity>> {
        let record = match self.store.get(sub).await? {
            Some(record) => record,
            None => {
                debug!("No identity stored for {}", sub);
                return Ok(None);
            }
        };

        ResolvedIdentity::from_idtoken(&record.sub, &record.idtoken)
            .map(Some)
            .map_err(|failure| {
                warn!("Stored idtoken for {} is unparsable: {}", sub, failure);
                IdentityError::MalformedClaims {
                    sub: sub.to_string(),
                    failure,
                }
            })
    }

    /// Store the id token of a subject, replacing any previous one.
    ///
    /// The token is parsed and resolved before anything is written, so an
    /// unparsable token leaves the stored one untouched.
    pub async fn save(&self, sub: &str, idtoken: &str) -> IdentityResult<ResolvedIdentity> {
        if sub.is_empty() {
            return Err(IdentityError::Validation("sub cannot be empty".to_string()));
        }

        let len = idtoken.chars().count();
        if len > self.max_claims_len {
            return Err(IdentityError::ClaimsTooLarge {
                len,
                max: self.max_claims_len,
            });
        }

        let identity =
            ResolvedIdentity::from_idtoken(sub, idtoken).map_err(IdentityError::InvalidToken)?;

        match self.store.upsert(sub, idtoken).await? {
            UpsertOutcome::Written => info!("Stored idtoken for {}", sub),
            UpsertOutcome::Unchanged => debug!("Idtoken for {} unchanged", sub),
        }

        Ok(identity)
    }
}
