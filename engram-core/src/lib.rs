//! # engram-core
//!
//! Core types for the Engram graph memory: node/edge models, query and
//! timeline request types, errors, configuration, and the traits
//! implemented by the storage and query crates.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{EngramError, EngramResult};
