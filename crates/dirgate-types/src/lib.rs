//! # dirgate-types
//!
//! Core type definitions for the dirgate filesystem access gateway.
//!
//! This crate is the foundation of the dependency graph -- all other
//! dirgate crates depend on it. It contains:
//!
//! - **[`error`]** -- [`GatewayError`] and the [`Result`] alias
//! - **[`config`]** -- [`AccessMode`] and the directory configuration schema

pub mod config;
pub mod error;

pub use config::{AccessMode, DirectoryConfig, GatewayConfig};
pub use error::{ConstructionFailure, GatewayError, Result};
