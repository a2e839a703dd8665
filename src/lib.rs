//! # paddock
//!
//! Leptos + WASM client layer for the paddock race-prediction game.
//!
//! This crate holds the REST client and its request pipeline, the
//! browser-session container, the route table with its navigation guard,
//! and the data stores behind the dashboard and league views. Rendering
//! lives elsewhere; everything here is state and plumbing.

pub mod app;
pub mod config;
pub mod net;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
