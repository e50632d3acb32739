//! CLI command implementations.

pub mod interactive;
pub mod patterns;
pub mod runner;
pub mod scan;
pub mod signals;
pub mod validate;
pub mod variants;
