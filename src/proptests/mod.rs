//! Property-based tests for the parser's universal invariants.

mod generators;
mod invariants;
