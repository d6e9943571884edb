//! Core domain types
//!
//! This module contains the domain structures shared between the runtime
//! client and the runner: the job execution seam and the host environment
//! classification computed once at process startup.

pub mod environment;
pub mod job;
