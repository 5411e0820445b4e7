//! Data Transfer Objects for the external service contracts
//!
//! Lightweight responses handed back by backend implementations before the
//! client turns them into domain values.

pub mod identity;
pub mod run;
