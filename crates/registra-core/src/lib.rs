//! registra-core
//!
//! Address-hierarchy cascade engine for patient registration: level
//! configuration, strictness resolution, the cascade store, read-only
//! policy and field validation. Synchronous and runtime-free; remote
//! lookups live in `registra-suggest`.

pub mod cascade;
pub mod config;
pub mod error;
pub mod levels;
pub mod models;
pub mod read_only;
pub mod strictness;
pub mod validation;
