use super::AuthenticationContext;
use crate::constants::CONTEXT;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A payload entry: either the session handle or plain JSON data.
#[derive(Debug, Clone)]
pub enum PayloadValue {
    Context(Arc<AuthenticationContext>),
    Json(Value),
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        PayloadValue::Json(value)
    }
}

impl From<Arc<AuthenticationContext>> for PayloadValue {
    fn from(value: Arc<AuthenticationContext>) -> Self {
        PayloadValue::Context(value)
    }
}

/// Caller-supplied data for one policy invocation.
///
/// Entries iterate in key order, which keeps the generated policy input
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    entries: BTreeMap<String, PayloadValue>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a payload holding `context` under the standard context key.
    pub fn with_context(context: Arc<AuthenticationContext>) -> Self {
        let mut payload = Self::new();
        payload.insert_context(context);
        payload
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(key.into(), PayloadValue::Json(value.into()));
    }

    pub fn insert_context(&mut self, context: Arc<AuthenticationContext>) {
        self.entries
            .insert(CONTEXT.to_string(), PayloadValue::Context(context));
    }

    pub fn insert_value(&mut self, key: impl Into<String>, value: PayloadValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries.get(key)
    }

    /// Session stored under the context key, if it holds one.
    pub fn context(&self) -> Option<&Arc<AuthenticationContext>> {
        match self.entries.get(CONTEXT) {
            Some(PayloadValue::Context(context)) => Some(context),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
