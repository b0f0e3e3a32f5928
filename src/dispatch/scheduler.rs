use super::{event_name, AsyncProcess, AsyncReturn, FlowContext, FlowEvents, LongWaitScheduler};
use crate::client::{DecisionResult, Outcome};
use log::{debug, warn};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

/// Message delivered to the engine's resumption loop.
#[derive(Debug, Clone)]
pub struct Resumption {
    pub context: FlowContext,
    pub result: DecisionResult,
    pub outcome: Outcome,
    pub events: FlowEvents,
}

impl Resumption {
    /// Handler registered for this outcome, if any.
    pub fn handler(&self) -> Option<&Value> {
        self.events.get(event_name(self.outcome))
    }
}

/// Scheduler for one session backed by a tokio runtime.
///
/// Work is spawned on `handle`; completions are pushed onto the
/// engine's resumption channel in the order they finish.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
    context: FlowContext,
    resumptions: UnboundedSender<Resumption>,
}

impl TokioScheduler {
    pub fn new(
        handle: Handle,
        context: FlowContext,
        resumptions: UnboundedSender<Resumption>,
    ) -> Self {
        Self {
            handle,
            context,
            resumptions,
        }
    }
}

impl LongWaitScheduler for TokioScheduler {
    fn add_long_wait_process(&self, process: AsyncProcess, events: FlowEvents) {
        let resumptions = self.resumptions.clone();
        let async_return = AsyncReturn::new(self.context.clone(), move |context, result, outcome| {
            let session = context.context_identifier().to_string();
            let resumption = Resumption {
                context,
                result,
                outcome,
                events,
            };
            if resumptions.send(resumption).is_err() {
                warn!(
                    "resumption loop closed; dropping {} result for session {}",
                    outcome, session
                );
            }
        });
        debug!(
            "parking session {} for long wait process",
            self.context.context_identifier()
        );
        self.handle
            .spawn(process.run(self.context.clone(), async_return));
    }
}
