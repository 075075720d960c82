//! # verdict-base
//!
//! Core types and utilities for the Verdict SAT solver.
//!
//! This crate provides the foundational building blocks used across all other
//! Verdict crates, including:
//!
//! - **Literal Encoding**: dense variable and literal indices
//! - **Error Types**: unified error handling across the solver
//! - **Utilities**: a deterministic PRNG for tests and tie-breaking

pub mod error;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use types::{Lit, Value, Var};
