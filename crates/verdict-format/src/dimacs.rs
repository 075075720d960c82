//! DIMACS CNF format parser and printer.
//!
//! Standard format used in SAT competitions. Comment lines start with `c`,
//! one `p cnf <vars> <clauses>` problem line precedes the clauses, each
//! clause is a `0`-terminated sequence of signed integers (and may span
//! several lines), and a line starting with `%` ends the file early, as in
//! the SATLIB benchmark distributions.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use verdict_base::{Error, Lit, Result};

/// A CNF problem instance.
///
/// Clauses are stored deduplicated; tautological clauses are dropped during
/// parsing. An empty clause is kept as-is and makes the instance trivially
/// unsatisfiable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    num_vars: usize,
    clauses: Vec<Vec<Lit>>,
}

impl Instance {
    /// Creates an empty instance over `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    /// Returns the number of variables declared by the problem line.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the clauses of this instance.
    #[must_use]
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Appends a clause. No normalization is applied; the solver ingestion
    /// path deduplicates and drops tautologies on its own.
    pub fn push_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    /// Parses DIMACS CNF from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Parses DIMACS CNF from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parses DIMACS CNF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut header: Option<usize> = None;
        let mut clauses = Vec::new();
        let mut current = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            // SATLIB end-of-file marker.
            if line.starts_with('%') {
                break;
            }

            if line.starts_with('p') {
                if header.is_some() {
                    return Err(Error::parse(line_no, "duplicate problem line"));
                }
                header = Some(parse_problem_line(line_no, line)?);
                continue;
            }

            let Some(num_vars) = header else {
                return Err(Error::parse(line_no, "clause before 'p cnf' problem line"));
            };

            for token in line.split_whitespace() {
                let raw: i64 = token.parse().map_err(|_| {
                    Error::parse(line_no, format!("invalid literal '{token}'"))
                })?;
                if raw == 0 {
                    if let Some(clause) = normalize_clause(&current) {
                        clauses.push(clause);
                    }
                    current.clear();
                } else {
                    if raw.unsigned_abs() as usize > num_vars {
                        return Err(Error::parse(
                            line_no,
                            format!("variable {} out of range (header declares {num_vars})", raw.abs()),
                        ));
                    }
                    current.push(Lit::from_dimacs(raw));
                }
            }
        }

        let Some(num_vars) = header else {
            return Err(Error::parse(0, "missing 'p cnf' problem line"));
        };

        // Tolerate a final clause without its 0 terminator.
        if !current.is_empty() {
            if let Some(clause) = normalize_clause(&current) {
                clauses.push(clause);
            }
        }

        Ok(Self { num_vars, clauses })
    }

    /// Prints this instance in DIMACS form.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("p cnf {} {}\n", self.num_vars, self.clauses.len()));
        for clause in &self.clauses {
            for lit in clause {
                out.push_str(&format!("{} ", lit.to_dimacs()));
            }
            out.push_str("0\n");
        }
        out
    }
}

fn parse_problem_line(line_no: usize, line: &str) -> Result<usize> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 || parts[0] != "p" || parts[1] != "cnf" {
        return Err(Error::parse(line_no, "malformed problem line, expected 'p cnf <vars> <clauses>'"));
    }
    let num_vars = parts[2]
        .parse()
        .map_err(|_| Error::parse(line_no, format!("invalid variable count '{}'", parts[2])))?;
    // The clause count is informational only, but it must still be a number.
    let _: usize = parts[3]
        .parse()
        .map_err(|_| Error::parse(line_no, format!("invalid clause count '{}'", parts[3])))?;
    Ok(num_vars)
}

/// Sorts and deduplicates a raw clause. Returns `None` for tautologies
/// (a clause containing both a literal and its negation is always true).
fn normalize_clause(raw: &[Lit]) -> Option<Vec<Lit>> {
    let mut clause = raw.to_vec();
    clause.sort();
    clause.dedup();
    for pair in clause.windows(2) {
        if pair[0] == !pair[1] {
            return None;
        }
    }
    Some(clause)
}
