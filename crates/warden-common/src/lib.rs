//! Shared utilities for warden crates
//!
//! Provides the JSON persistence helpers used by the policy-override store
//! and the audit store, so the two persisted surfaces share one
//! load-or-default / atomic-save implementation.

pub mod json_store;

pub use json_store::{load_json, load_json_or_default, save_json, JsonStoreError, JsonStoreResult};
