use super::{ClaimMetadataService, LocalClaim};
use crate::error::Error;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory claim definitions keyed by tenant domain.
///
/// Tenants that were never registered fail the lookup, the same way a
/// metadata store reports an unknown tenant.
#[derive(Debug, Clone, Default)]
pub struct StaticClaimMetadata {
    tenants: HashMap<String, Vec<LocalClaim>>,
}

impl StaticClaimMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant<I, S>(mut self, tenant_domain: impl Into<String>, claim_uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tenants.insert(
            tenant_domain.into(),
            claim_uris.into_iter().map(LocalClaim::new).collect(),
        );
        self
    }
}

#[async_trait]
impl ClaimMetadataService for StaticClaimMetadata {
    async fn get_local_claims(&self, tenant_domain: &str) -> Result<Vec<LocalClaim>, Error> {
        self.tenants
            .get(tenant_domain)
            .cloned()
            .ok_or_else(|| Error::claim_metadata(tenant_domain, "unknown tenant domain"))
    }
}
