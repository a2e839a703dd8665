//! Browser-facing helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, page
//! navigation, router guards) from state logic so the latter runs natively
//! under test.

pub mod auth;
pub mod navigation;
pub mod storage;
