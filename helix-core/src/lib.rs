//! Helix Core
//!
//! Core types shared by the Helix workflow client and CLI.
//!
//! This crate contains:
//! - Domain types: infrastructure config, submission parameters, runs, artifacts
//! - DTOs: acknowledgements returned by the identity and execution services

pub mod domain;
pub mod dto;
