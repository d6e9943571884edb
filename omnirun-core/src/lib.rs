//! Omnirun Core
//!
//! Core types shared by the runtime client and the runner binary.
//!
//! This crate contains:
//! - Domain types: the job seam (`Job`, `WorkLimit`, `JobError`) and the
//!   host environment classification (`EnvironmentMode`)
//! - DTOs: wire bodies for the runtime control-plane API

pub mod domain;
pub mod dto;
