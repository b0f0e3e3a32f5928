//! Claim and role collection for the policy subject.

use crate::constants::{SEND_CLAIMS, SEND_ROLES};
use crate::context::AuthenticatedUser;
use crate::error::Error;
use async_trait::async_trait;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

mod metadata;

pub use metadata::StaticClaimMetadata;

/// Claim definition registered for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalClaim {
    #[serde(rename = "claimURI")]
    pub claim_uri: String,
}

impl LocalClaim {
    pub fn new(claim_uri: impl Into<String>) -> Self {
        Self {
            claim_uri: claim_uri.into(),
        }
    }
}

/// Lookup of the claim definitions configured for a tenant.
#[async_trait]
pub trait ClaimMetadataService: Send + Sync {
    async fn get_local_claims(&self, tenant_domain: &str) -> Result<Vec<LocalClaim>, Error>;
}

/// Flags controlling which user attributes are sent to the policy engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    pub send_claims: bool,
    pub send_roles: bool,
}

impl InvokeOptions {
    /// Reads the `sendClaims` / `sendRoles` flags. Only a case-insensitive
    /// `"true"` enables a flag.
    pub fn from_map(options: &HashMap<String, String>) -> Self {
        Self {
            send_claims: parse_flag(options.get(SEND_CLAIMS)),
            send_roles: parse_flag(options.get(SEND_ROLES)),
        }
    }
}

fn parse_flag(value: Option<&String>) -> bool {
    value.is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Claims and roles gathered for one invocation. At most one of the two
/// is ever populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    pub claims: BTreeMap<String, String>,
    pub roles: Vec<String>,
}

/// Gathers either the user's local claims or roles, claims first.
///
/// A failed claim metadata lookup is logged and yields no claims; it never
/// fails the invocation.
pub async fn collect(
    user: Option<&AuthenticatedUser>,
    options: InvokeOptions,
    claim_metadata: &dyn ClaimMetadataService,
) -> UserAttributes {
    let Some(user) = user else {
        return UserAttributes::default();
    };
    if options.send_claims {
        UserAttributes {
            claims: collect_claims(user, claim_metadata).await,
            roles: Vec::new(),
        }
    } else if options.send_roles {
        UserAttributes {
            claims: BTreeMap::new(),
            roles: user.roles(),
        }
    } else {
        UserAttributes::default()
    }
}

async fn collect_claims(
    user: &AuthenticatedUser,
    claim_metadata: &dyn ClaimMetadataService,
) -> BTreeMap<String, String> {
    let mut claims = BTreeMap::new();
    let Some(tenant_domain) = user.tenant_domain() else {
        warn!("authenticated user has no tenant domain; skipping local claims");
        return claims;
    };
    let local_claims = match claim_metadata.get_local_claims(tenant_domain).await {
        Ok(local_claims) => local_claims,
        Err(e) => {
            error!(
                "error while getting local claims in tenant domain {}: {}",
                tenant_domain, e
            );
            return claims;
        }
    };
    for local_claim in local_claims {
        if let Some(value) = user.local_claim(&local_claim.claim_uri) {
            if !value.trim().is_empty() {
                claims.insert(local_claim.claim_uri, value.to_string());
            }
        }
    }
    claims
}
