use std::path::Path;

use crate::error::{Result, read_input};
use crate::model::{CandidateTree, TreeCost};

/// Lines containing any of these are diagnostics, not trees.
const DIAGNOSTIC_MARKERS: &[&str] = &["DEBUG"];

/// Terminal indices at or above this are treated as noise.
pub const MAX_TERMINAL_INDEX: usize = 4096;

/// A candidate tree never has more members than this.
pub const MAX_TREE_TERMINALS: usize = 10;

/// Load every candidate tree from a dump file.
pub fn load_candidate_trees(path: &Path) -> Result<Vec<CandidateTree>> {
    let content = read_input(path)?;
    let trees = parse_dump(&content);
    log::debug!(
        "Loaded {} candidate tree(s) from {}",
        trees.len(),
        path.display()
    );
    for tree in trees.iter().take(5) {
        log::debug!("  FST {}: terminals {:?}", tree.id, tree.terminals);
    }
    Ok(trees)
}

/// Parse dump text: one tree per line, terminal indices separated by
/// whitespace. Trees are numbered sequentially from 0 in file order,
/// counting only lines that yield at least two valid indices.
pub fn parse_dump(content: &str) -> Vec<CandidateTree> {
    let mut trees = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || DIAGNOSTIC_MARKERS.iter().any(|m| trimmed.contains(m)) {
            continue;
        }

        let terminals: Vec<usize> = trimmed
            .split_whitespace()
            .filter_map(|token| token.parse::<usize>().ok())
            .filter(|&id| id < MAX_TERMINAL_INDEX)
            .take(MAX_TREE_TERMINALS)
            .collect();

        if terminals.len() < 2 {
            continue;
        }

        let id = trees.len();
        trees.push(CandidateTree {
            id,
            steiner_count: usize::from(terminals.len() > 2),
            terminals,
            steiner_point: None,
            selected: false,
            cost: TreeCost::placeholder_for(id),
        });
    }

    trees
}
