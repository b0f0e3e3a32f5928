#![forbid(unsafe_code)]

mod claims;
mod client;
mod constants;
mod context;
mod dispatch;
mod error;
mod function;
mod input;

pub use error::Error;

pub use constants::{CONTEXT, SEND_CLAIMS, SEND_ROLES};

pub use context::{
    extract_user, AttributeValue, AuthenticatedUser, AuthenticationContext, ExtractedSubject,
    Payload, PayloadValue, RoleValues, Step, Steps, UserAttribute,
};

pub use claims::{
    collect, ClaimMetadataService, InvokeOptions, LocalClaim, StaticClaimMetadata,
    UserAttributes,
};

pub use input::{build_input, InputDocument, PolicyInput, UserContext, UserDetails};

pub use client::{
    DecisionResult, Outcome, PolicyClient, PolicyClientBuilder, PolicyClientConfig,
    PolicyResponse,
};

pub use dispatch::{
    event_name, AsyncProcess, AsyncReturn, FlowContext, FlowEvents, LongWaitScheduler,
    Resumption, TokioScheduler,
};

pub use function::InvokeOpaFunction;
