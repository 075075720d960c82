//! # verdict-format
//!
//! File format parsing and serialization for Verdict.
//!
//! Supports the DIMACS CNF format used by SAT competitions and the SATLIB
//! benchmark collections.

pub mod dimacs;

pub use dimacs::Instance;
