//! registra-suggest
//!
//! Debounced, cancellable hierarchy suggestions per address field, plus the
//! lookup boundary the suggestions are fetched through.

pub mod coordinator;
pub mod error;
pub mod lookup;
pub mod memory;
pub mod session;
