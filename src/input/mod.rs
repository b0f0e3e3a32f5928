//! Policy input document sent to the decision endpoint.
//!
//! Wire shape:
//!
//! ```text
//! { "input": { <payload fields>..., "user": { "claims", "roles",
//!   "userStoreDomain", "userContext": { "authenticatedSubjectIdentifier",
//!   "username", "tenantDomain" } } } }
//! ```

use crate::claims::UserAttributes;
use crate::constants::USER;
use crate::context::{is_context_entry, AuthenticatedUser, Payload, PayloadValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub authenticated_subject_identifier: Option<String>,
    pub username: Option<String>,
    pub tenant_domain: Option<String>,
}

impl UserContext {
    /// Each field is read on its own; a missing attribute becomes `null`.
    pub fn from_user(user: Option<&AuthenticatedUser>) -> Self {
        let Some(user) = user else {
            return Self::default();
        };
        Self {
            authenticated_subject_identifier: user
                .authenticated_subject_identifier()
                .map(str::to_string),
            username: user.username().map(str::to_string),
            tenant_domain: user.tenant_domain().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub claims: BTreeMap<String, String>,
    pub roles: Vec<String>,
    pub user_store_domain: Option<String>,
    pub user_context: UserContext,
}

/// Body of the `input` member: pass-through payload fields followed by
/// the `user` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDocument {
    pub fields: Map<String, Value>,
    pub user: UserDetails,
}

impl Serialize for InputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = usize::from(self.fields.contains_key(USER));
        let mut map = serializer.serialize_map(Some(self.fields.len() - shadowed + 1))?;
        for (key, value) in &self.fields {
            if key != USER {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry(USER, &self.user)?;
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicyInput {
    pub input: InputDocument,
}

impl PolicyInput {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Assembles the policy input. Pure; the session context entry is never
/// copied, and a payload field named `user` is replaced by the user object.
pub fn build_input(
    payload: Option<&Payload>,
    attributes: &UserAttributes,
    user_store_domain: Option<&str>,
    user: Option<&AuthenticatedUser>,
) -> PolicyInput {
    let mut fields = Map::new();
    if let Some(payload) = payload {
        for (key, value) in payload.iter() {
            if is_context_entry(key, value) {
                continue;
            }
            if let PayloadValue::Json(value) = value {
                fields.insert(key.to_string(), value.clone());
            }
        }
    }
    PolicyInput {
        input: InputDocument {
            fields,
            user: UserDetails {
                claims: attributes.claims.clone(),
                roles: attributes.roles.clone(),
                user_store_domain: user_store_domain.map(str::to_string),
                user_context: UserContext::from_user(user),
            },
        },
    }
}
