//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` is the single egress point. It runs every call through the
//! `pipeline` stages (credential attachment, unauthorized handling) whose
//! exemptions come from `policy`, and hands the prepared request to a
//! `transport`. `api` names the endpoints, `types` the auth wire schema,
//! and `error` the normalized failure every caller sees.

pub mod api;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod transport;
pub mod types;
