//! registra-session
//!
//! Wires the cascade store, strictness, read-only policy and suggestion
//! coordinator into one address form session, the surface the rendering
//! layer talks to.

pub mod error;
pub mod levels;
pub mod session;
