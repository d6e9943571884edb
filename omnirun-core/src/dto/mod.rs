//! Data Transfer Objects for the runtime control-plane protocol
//!
//! These are the exact JSON bodies exchanged with the control plane; their
//! field names are part of the wire contract and must not drift.

pub mod invocation;
