//! Literal and value types shared by every solver component.
//!
//! Variables are dense 0-based indices; the DIMACS 1-based signed form is
//! translated at the format boundary. Each variable owns two adjacent literal
//! slots, so per-literal tables (watch lists in particular) can be plain
//! vectors indexed by [`Lit::index`].

mod lit;
mod value;

pub use lit::{Lit, Var};
pub use value::Value;
