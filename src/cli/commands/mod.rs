//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod batch;
pub mod init;
pub mod redact;
pub mod validate;
