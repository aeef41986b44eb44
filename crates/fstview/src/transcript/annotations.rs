//! Single-line facts the solver prints as debug output: coverage variables,
//! per-tree costs, the budget in force, and terminal battery echoes.

use std::sync::OnceLock;

use regex::Regex;

use super::NUMBER;

/// Costs printed for one candidate tree by the objective setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeCostReport {
    pub tree_id: usize,
    pub tree_cost: f64,
    pub battery_cost: f64,
    pub combined: f64,
}

/// Parse `not_covered[<id>] = <value>`.
pub fn parse_not_covered(line: &str) -> Option<(usize, f64)> {
    if !line.contains("not_covered[") {
        return None;
    }
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"not_covered\[(\d+)\]\s*=\s*({NUMBER})")).unwrap()
    });
    let caps = re.captures(line)?;
    let id = caps.get(1)?.as_str().parse().ok()?;
    let value = caps.get(2)?.as_str().parse().ok()?;
    Some((id, value))
}

/// Parse `DEBUG OBJ: FST <id>: tree_cost=<t>, battery_cost=<b>, combined=<c>`.
pub fn parse_tree_cost(line: &str) -> Option<TreeCostReport> {
    if !line.contains("DEBUG OBJ: FST") {
        return None;
    }
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(
            r"DEBUG OBJ: FST (\d+): tree_cost=({NUMBER}), battery_cost=({NUMBER}), combined=({NUMBER})"
        ))
        .unwrap()
    });
    let caps = re.captures(line)?;
    Some(TreeCostReport {
        tree_id: caps.get(1)?.as_str().parse().ok()?,
        tree_cost: caps.get(2)?.as_str().parse().ok()?,
        battery_cost: caps.get(3)?.as_str().parse().ok()?,
        combined: caps.get(4)?.as_str().parse().ok()?,
    })
}

/// Parse `DEBUG BUDGET: Using environment budget=<value>`.
pub fn parse_budget(line: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"DEBUG BUDGET: Using environment budget=({NUMBER})")).unwrap()
    });
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Parse `DEBUG P1READ: Terminal <id> battery=<value>`.
pub fn parse_battery_echo(line: &str) -> Option<(usize, f64)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"DEBUG P1READ: Terminal (\d+) battery=({NUMBER})")).unwrap()
    });
    let caps = re.captures(line)?;
    Some((
        caps.get(1)?.as_str().parse().ok()?,
        caps.get(2)?.as_str().parse().ok()?,
    ))
}
