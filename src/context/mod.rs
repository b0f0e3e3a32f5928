//! Authentication session model and subject extraction.
//!
//! The flow engine owns the session; this module only reads it. Every
//! lookup that misses yields `None` instead of an error so the policy call
//! can still proceed with an empty subject.

use crate::constants::{CONTEXT, SUBJECT_STEP};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

mod payload;

pub use payload::{Payload, PayloadValue};

/// Role attribute as stored by the flow engine.
///
/// Some authenticators hand roles over as a fixed array and others as a
/// growable collection; [`RoleValues::to_vec`] flattens both to one
/// ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValues {
    Array(Box<[String]>),
    Collection(VecDeque<String>),
}

impl RoleValues {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            RoleValues::Array(values) => values.to_vec(),
            RoleValues::Collection(values) => values.iter().cloned().collect(),
        }
    }
}

impl From<Vec<String>> for RoleValues {
    fn from(values: Vec<String>) -> Self {
        RoleValues::Array(values.into_boxed_slice())
    }
}

impl From<VecDeque<String>> for RoleValues {
    fn from(values: VecDeque<String>) -> Self {
        RoleValues::Collection(values)
    }
}

/// Named attributes exposed by an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserAttribute {
    TenantDomain,
    UserStoreDomain,
    Username,
    AuthenticatedSubjectIdentifier,
    LocalClaims,
    Roles,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Claims(BTreeMap<String, Value>),
    Roles(RoleValues),
}

/// Subject that completed an authentication step.
///
/// Attributes are kept in a tagged bag so that a value of the wrong shape
/// reads back as absent rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticatedUser {
    attributes: BTreeMap<UserAttribute, AttributeValue>,
}

impl AuthenticatedUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, attribute: UserAttribute, value: AttributeValue) {
        self.attributes.insert(attribute, value);
    }

    pub fn get(&self, attribute: UserAttribute) -> Option<&AttributeValue> {
        self.attributes.get(&attribute)
    }

    /// Sets the tenant domain.
    pub fn with_tenant_domain(self, value: impl Into<String>) -> Self {
        self.with_text(UserAttribute::TenantDomain, value)
    }

    /// Sets the user store domain.
    pub fn with_user_store_domain(self, value: impl Into<String>) -> Self {
        self.with_text(UserAttribute::UserStoreDomain, value)
    }

    /// Sets the username.
    pub fn with_username(self, value: impl Into<String>) -> Self {
        self.with_text(UserAttribute::Username, value)
    }

    /// Sets the authenticated subject identifier.
    pub fn with_authenticated_subject_identifier(self, value: impl Into<String>) -> Self {
        self.with_text(UserAttribute::AuthenticatedSubjectIdentifier, value)
    }

    /// Adds one entry to the local claims bag.
    pub fn with_local_claim(
        mut self,
        claim_uri: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        if !matches!(
            self.attributes.get(&UserAttribute::LocalClaims),
            Some(AttributeValue::Claims(_))
        ) {
            self.set(UserAttribute::LocalClaims, AttributeValue::Claims(BTreeMap::new()));
        }
        if let Some(AttributeValue::Claims(claims)) =
            self.attributes.get_mut(&UserAttribute::LocalClaims)
        {
            claims.insert(claim_uri.into(), value.into());
        }
        self
    }

    /// Replaces the role attribute.
    pub fn with_roles(mut self, roles: impl Into<RoleValues>) -> Self {
        self.set(UserAttribute::Roles, AttributeValue::Roles(roles.into()));
        self
    }

    fn with_text(mut self, attribute: UserAttribute, value: impl Into<String>) -> Self {
        self.set(attribute, AttributeValue::Text(value.into()));
        self
    }

    fn text(&self, attribute: UserAttribute) -> Option<&str> {
        match self.attributes.get(&attribute) {
            Some(AttributeValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Tenant the user belongs to.
    pub fn tenant_domain(&self) -> Option<&str> {
        self.text(UserAttribute::TenantDomain)
    }

    /// User store the user was authenticated against.
    pub fn user_store_domain(&self) -> Option<&str> {
        self.text(UserAttribute::UserStoreDomain)
    }

    /// Username without tenant or user store qualifiers.
    pub fn username(&self) -> Option<&str> {
        self.text(UserAttribute::Username)
    }

    /// Subject identifier asserted by the authenticator.
    pub fn authenticated_subject_identifier(&self) -> Option<&str> {
        self.text(UserAttribute::AuthenticatedSubjectIdentifier)
    }

    /// Returns the string value of a local claim, if the user carries one.
    pub fn local_claim(&self, claim_uri: &str) -> Option<&str> {
        match self.attributes.get(&UserAttribute::LocalClaims) {
            Some(AttributeValue::Claims(claims)) => {
                claims.get(claim_uri).and_then(Value::as_str)
            }
            _ => None,
        }
    }

    /// Roles in their stored order; empty when the attribute is missing.
    pub fn roles(&self) -> Vec<String> {
        match self.attributes.get(&UserAttribute::Roles) {
            Some(AttributeValue::Roles(roles)) => roles.to_vec(),
            _ => Vec::new(),
        }
    }
}

/// One completed authentication step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    subject: Option<AuthenticatedUser>,
}

impl Step {
    pub fn new(subject: AuthenticatedUser) -> Self {
        Self {
            subject: Some(subject),
        }
    }

    /// A step whose subject attribute was never populated.
    pub fn without_subject() -> Self {
        Self::default()
    }

    pub fn authenticated_subject(&self) -> Option<&AuthenticatedUser> {
        self.subject.as_ref()
    }
}

/// Completed steps keyed by their 1-based step number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Steps {
    slots: BTreeMap<usize, Step>,
}

impl Steps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, number: usize, step: Step) {
        self.slots.insert(number, step);
    }

    pub fn slot(&self, number: usize) -> Option<&Step> {
        self.slots.get(&number)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Read-only view of one authentication session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticationContext {
    context_identifier: String,
    steps: Option<Steps>,
}

impl AuthenticationContext {
    pub fn new(context_identifier: impl Into<String>) -> Self {
        Self {
            context_identifier: context_identifier.into(),
            steps: None,
        }
    }

    pub fn with_step(mut self, number: usize, step: Step) -> Self {
        self.steps.get_or_insert_with(Steps::new).insert(number, step);
        self
    }

    pub fn context_identifier(&self) -> &str {
        &self.context_identifier
    }

    pub fn steps(&self) -> Option<&Steps> {
        self.steps.as_ref()
    }
}

/// Owned snapshot of the subject sent to the policy engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSubject {
    pub user: Option<AuthenticatedUser>,
    pub user_store_domain: Option<String>,
}

/// Pulls the subject of the first completed step out of the payload's
/// session context.
pub fn extract_user(payload: Option<&Payload>) -> ExtractedSubject {
    let Some(payload) = payload else {
        return ExtractedSubject::default();
    };
    let Some(context) = payload.context() else {
        return ExtractedSubject::default();
    };
    let user = context
        .steps()
        .and_then(|steps| steps.slot(SUBJECT_STEP))
        .and_then(Step::authenticated_subject)
        .cloned();
    let user_store_domain = user
        .as_ref()
        .and_then(|user| user.user_store_domain().map(str::to_string));
    ExtractedSubject {
        user,
        user_store_domain,
    }
}

/// True for the payload entry that carries the session itself.
///
/// Matches on the context key and on any value holding a session, so a
/// session stored under another key never leaks into the policy input.
pub(crate) fn is_context_entry(key: &str, value: &PayloadValue) -> bool {
    key == CONTEXT || matches!(value, PayloadValue::Context(_))
}
