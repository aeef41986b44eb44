//! Readers for the two solver-independent inputs: terminal positions and the
//! candidate-tree dump.

pub mod dump;
pub mod terminals;

pub use dump::load_candidate_trees;
pub use terminals::load_terminals;
