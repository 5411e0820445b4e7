//! Core domain types
//!
//! These types describe what the client resolves, submits and reads back.
//! They carry no I/O; the client crate owns every external call.

pub mod artifact;
pub mod infra;
pub mod run;
pub mod submission;
