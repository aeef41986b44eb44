use crate::model::{CoverageMap, Terminal};

/// Indicator values below this mean the terminal is covered.
pub const COVERAGE_THRESHOLD: f64 = 0.5;

/// Whether a terminal counts as covered. Terminals the transcript never
/// mentions are covered.
pub fn is_covered(coverage: &CoverageMap, terminal_id: usize) -> bool {
    coverage
        .get(&terminal_id)
        .is_none_or(|&value| value < COVERAGE_THRESHOLD)
}

/// Set each terminal's `covered` flag from the coverage map.
pub fn resolve_coverage(terminals: &mut [Terminal], coverage: &CoverageMap) {
    for terminal in terminals.iter_mut() {
        terminal.covered = is_covered(coverage, terminal.id);
    }
    let uncovered: Vec<usize> = terminals
        .iter()
        .filter(|t| !t.covered)
        .map(|t| t.id)
        .collect();
    log::debug!(
        "Coverage resolved: {} of {} terminal(s) covered, uncovered {:?}",
        terminals.len() - uncovered.len(),
        terminals.len(),
        uncovered
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn terminals(n: usize) -> Vec<Terminal> {
        (0..n)
            .map(|id| Terminal {
                id,
                position: Point::new(0.0, 0.0),
                battery: 50.0,
                covered: true,
            })
            .collect()
    }

    #[test]
    fn test_threshold() {
        let coverage = CoverageMap::from([(0, 0.49), (1, 0.5), (2, 1.0)]);
        assert!(is_covered(&coverage, 0));
        assert!(!is_covered(&coverage, 1));
        assert!(!is_covered(&coverage, 2));
        assert!(is_covered(&coverage, 3), "missing indicator means covered");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let coverage = CoverageMap::from([(1, 0.8), (2, 0.1)]);
        let mut ts = terminals(4);
        resolve_coverage(&mut ts, &coverage);
        let first: Vec<bool> = ts.iter().map(|t| t.covered).collect();
        resolve_coverage(&mut ts, &coverage);
        let second: Vec<bool> = ts.iter().map(|t| t.covered).collect();
        assert_eq!(first, vec![true, false, true, true]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_overwrites_previous_verdict() {
        let mut ts = terminals(1);
        ts[0].covered = false;
        resolve_coverage(&mut ts, &CoverageMap::new());
        assert!(ts[0].covered);
    }
}
