//! Calls domain module.
//!
//! Everything between an inbound request body and the response envelope:
//!
//! - `normalizer.rs` - recovers a canonical `{tool, parameters}` call from
//!   JSON, form-encoded, or mislabelled bodies
//! - `dispatcher.rs` - resolves the call against the tool registry and runs it
//! - `diagnostics.rs` - direct invocation with a strict JSON body
//! - `envelope.rs` - the uniform success/error response
//! - `error.rs` - call-level error taxonomy

mod diagnostics;
mod dispatcher;
mod envelope;
mod error;
mod normalizer;

pub use diagnostics::parse_direct_body;
pub use dispatcher::Dispatcher;
pub use envelope::ResultEnvelope;
pub use error::{CallError, MalformedEncoding};
pub use normalizer::{
    BodyEncoding, CanonicalCall, DEFAULT_PREVIEW_LIMIT, Normalizer, RawRequest, preview,
};
