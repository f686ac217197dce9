//! Gantry Core
//!
//! Core types and abstractions for the Gantry job-submission system.
//!
//! This crate contains:
//! - Domain types: Core business entities (run status, application reports, execution config)
//! - DTOs: Data transfer objects exchanged with the cluster scheduler

pub mod domain;
pub mod dto;
