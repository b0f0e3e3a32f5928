//! Suspend/resume plumbing between the flow engine and deferred work.
//!
//! The flow engine parks a session, hands an [`AsyncProcess`] to a
//! [`LongWaitScheduler`], and resumes the session once the process calls
//! its [`AsyncReturn`]. The process may complete on any worker thread.

use crate::client::{DecisionResult, Outcome};
use crate::context::AuthenticationContext;
use futures::future::{BoxFuture, FutureExt};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

mod scheduler;

pub use scheduler::{Resumption, TokioScheduler};

/// Session handle passed to deferred work and back to the engine.
pub type FlowContext = Arc<AuthenticationContext>;

/// Engine-defined event handlers registered alongside a process, keyed by
/// event name (`onSuccess`, `onFail`, `onTimeout`).
pub type FlowEvents = HashMap<String, Value>;

type ResumeFn = Box<dyn FnOnce(FlowContext, DecisionResult, Outcome) + Send>;
type Work = Box<dyn FnOnce(FlowContext, AsyncReturn) -> BoxFuture<'static, ()> + Send>;

/// Event name the engine dispatches for an outcome.
pub fn event_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "onSuccess",
        Outcome::Fail => "onFail",
        Outcome::Timeout => "onTimeout",
    }
}

/// Resume callback for one parked session.
///
/// `accept` consumes the handle, so a session resumes at most once. A
/// handle dropped without `accept` (the work panicked or bailed out)
/// resumes the session with [`Outcome::Fail`] and an empty result.
pub struct AsyncReturn {
    context: FlowContext,
    callback: Option<ResumeFn>,
}

impl AsyncReturn {
    pub fn new<F>(context: FlowContext, callback: F) -> Self
    where
        F: FnOnce(FlowContext, DecisionResult, Outcome) + Send + 'static,
    {
        Self {
            context,
            callback: Some(Box::new(callback)),
        }
    }

    pub fn accept(mut self, context: FlowContext, result: DecisionResult, outcome: Outcome) {
        if let Some(callback) = self.callback.take() {
            callback(context, result, outcome);
        }
    }
}

impl Drop for AsyncReturn {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            warn!(
                "deferred work for session {} ended without a result; resuming with {}",
                self.context.context_identifier(),
                Outcome::Fail
            );
            callback(self.context.clone(), DecisionResult::new(), Outcome::Fail);
        }
    }
}

/// Unit of work run while a session is parked.
pub struct AsyncProcess {
    work: Work,
}

impl AsyncProcess {
    pub fn new<F, Fut>(work: F) -> Self
    where
        F: FnOnce(FlowContext, AsyncReturn) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            work: Box::new(move |context, async_return| work(context, async_return).boxed()),
        }
    }

    /// Starts the work; the returned future must be polled to completion or
    /// dropped, either of which resumes the session.
    pub fn run(self, context: FlowContext, async_return: AsyncReturn) -> BoxFuture<'static, ()> {
        (self.work)(context, async_return)
    }
}

/// Flow-suspension capability provided by the engine.
///
/// Implementations park the current session, run the process off the
/// session's thread, and resume the session from the process's
/// [`AsyncReturn`].
pub trait LongWaitScheduler: Send + Sync {
    fn add_long_wait_process(&self, process: AsyncProcess, events: FlowEvents);
}
