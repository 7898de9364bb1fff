/// Batch lookup of identities with per-subject error reporting
use crate::{
    error::{IdentityError, IdentityResult},
    identity::{
        IdentitiesResult, IdentityErrorEntry, IdentityService, ParseFailure, ResolvedIdentity,
        INVALID_USER_ID,
    },
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of looking up one subject of a batch
#[derive(Debug)]
pub enum LookupOutcome {
    Found(ResolvedIdentity),
    /// No token stored for the subject (unknown user, or one that never logged in)
    NotFound,
    /// Stored token unparsable, only this subject is affected
    Malformed(ParseFailure),
    /// Failure expected to recur for every remaining subject
    Systemic(IdentityError),
}

impl From<IdentityResult<Option<ResolvedIdentity>>> for LookupOutcome {
    fn from(result: IdentityResult<Option<ResolvedIdentity>>) -> Self {
        match result {
            Ok(Some(identity)) => LookupOutcome::Found(identity),
            Ok(None) => LookupOutcome::NotFound,
            Err(IdentityError::MalformedClaims { failure, .. }) => LookupOutcome::Malformed(failure),
            Err(err) => LookupOutcome::Systemic(err),
        }
    }
}

impl IdentityService {
    /// Look up one subject and classify the result
    pub async fn lookup(&self, sub: &str) -> LookupOutcome {
        self.get_identity(sub).await.into()
    }

    /// Look up subjects in order.
    ///
    /// Unknown subjects and unparsable stored tokens are reported per subject
    /// in `errors`. Any other failure aborts the whole batch.
    pub async fn get_identities<S: AsRef<str>>(&self, subs: &[S]) -> IdentityResult<IdentitiesResult> {
        let mut data = HashMap::new();
        let mut errors = HashMap::new();

        for sub in subs {
            let sub = sub.as_ref();
            match self.lookup(sub).await {
                LookupOutcome::Found(identity) => {
                    data.insert(sub.to_string(), identity);
                }
                LookupOutcome::NotFound => {
                    errors.insert(sub.to_string(), IdentityErrorEntry::new(sub, INVALID_USER_ID));
                }
                LookupOutcome::Malformed(failure) => {
                    errors.insert(sub.to_string(), IdentityErrorEntry::new(sub, failure.code()));
                }
                LookupOutcome::Systemic(err) => {
                    warn!("Aborting identity batch at {}: {}", sub, err);
                    return Err(err);
                }
            }
        }

        debug!(
            "Resolved identity batch: {} found, {} errors",
            data.len(),
            errors.len()
        );

        Ok(IdentitiesResult::new(data, errors))
    }
}
