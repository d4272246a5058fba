//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the registry of callable tools and the handler contract
//! - **calls**: request normalization, dispatch, and response envelopes

pub mod calls;
pub mod tools;
