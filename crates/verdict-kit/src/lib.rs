//! # verdict-kit
//!
//! The high-level solving API for Verdict.
//!
//! This crate wires the parser and the solver core together behind two
//! entry points:
//!
//! - [`parse`] / [`solve`] for a single configuration
//! - [`race`] for running several configurations concurrently on disjoint
//!   copies of the instance, first verdict wins
//!
//! # Example
//!
//! ```ignore
//! use verdict_kit::{parse, solve, SolverKind};
//!
//! let instance = parse("problem.cnf")?;
//! match solve(&instance, SolverKind::CdclVsidsLuby) {
//!     verdict_kit::SatResult::Sat(model) => println!("SAT: {model:?}"),
//!     verdict_kit::SatResult::Unsat => println!("UNSAT"),
//!     verdict_kit::SatResult::Interrupted => println!("cancelled"),
//! }
//! ```

pub mod race;
pub mod solver;

pub use race::{race, RaceOutcome};
pub use solver::{parse, solve, solve_with_stop, SolverKind};
pub use verdict_base::{Error, Result};
pub use verdict_cdcl::{SatResult, SolverStats};
pub use verdict_format::Instance;
