//! locus: query slicing, fuzzy category matching and versioned search sessions.
//!
//! The `locus` binary exposes the library crates for inspection: it slices queries the way the
//! session manager does, shows which dictionary categories a query resolves to, and runs a
//! search session against an in-memory set of places, printing every update it delivers.

#![warn(missing_docs)]

pub mod cli;
