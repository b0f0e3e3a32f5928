//! `invokeOPA`-style entry point exposed to authentication flows.

use crate::claims::{collect, ClaimMetadataService, InvokeOptions};
use crate::client::{PolicyClient, PolicyResponse};
use crate::context::{extract_user, ExtractedSubject, Payload};
use crate::dispatch::{AsyncProcess, FlowEvents, LongWaitScheduler};
use crate::input::build_input;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Sends authentication context to a policy endpoint on behalf of a
/// parked flow.
///
/// Create one per process; the client and claim metadata service are
/// shared by every invocation.
#[derive(Clone)]
pub struct InvokeOpaFunction {
    client: PolicyClient,
    claim_metadata: Arc<dyn ClaimMetadataService>,
}

impl InvokeOpaFunction {
    pub fn new(client: PolicyClient, claim_metadata: Arc<dyn ClaimMetadataService>) -> Self {
        Self {
            client,
            claim_metadata,
        }
    }

    /// Registers the policy call with `scheduler` and returns immediately.
    ///
    /// The subject is read from the session now; claim lookup and the HTTP
    /// call run later inside the deferred process, which always resumes the
    /// flow with `(context, result, outcome)`.
    pub fn invoke_opa(
        &self,
        scheduler: &dyn LongWaitScheduler,
        endpoint_url: &str,
        payload: Option<Payload>,
        options: &HashMap<String, String>,
        events: FlowEvents,
    ) {
        let subject = extract_user(payload.as_ref());
        let options = InvokeOptions::from_map(options);
        let endpoint_url = endpoint_url.to_string();
        let this = self.clone();
        debug!("registering policy call to {}", endpoint_url);

        let process = AsyncProcess::new(move |context, async_return| async move {
            let response = this
                .evaluate(&endpoint_url, payload.as_ref(), &subject, options)
                .await;
            async_return.accept(context, response.result, response.outcome);
        });
        scheduler.add_long_wait_process(process, events);
    }

    /// Collects attributes, builds the input and calls the endpoint.
    pub async fn evaluate(
        &self,
        endpoint_url: &str,
        payload: Option<&Payload>,
        subject: &ExtractedSubject,
        options: InvokeOptions,
    ) -> PolicyResponse {
        let attributes = collect(
            subject.user.as_ref(),
            options,
            self.claim_metadata.as_ref(),
        )
        .await;
        let input = build_input(
            payload,
            &attributes,
            subject.user_store_domain.as_deref(),
            subject.user.as_ref(),
        );
        self.client.invoke(endpoint_url, &input).await
    }
}
