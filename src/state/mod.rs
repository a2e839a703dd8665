//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `dashboard`, `leagues`, etc.) so
//! views depend on small focused models. Each module pairs a plain state
//! struct, mutated by pure `apply_*` helpers, with a store that issues the
//! REST calls and writes results into an `RwSignal`.

pub mod dashboard;
pub mod leagues;
pub mod pilots;
pub mod prediction;
pub mod session;
