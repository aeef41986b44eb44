//! Solver transcript scanning.
//!
//! A transcript is free-form log output with an embedded PostScript plot of
//! the accepted solution. Each selected tree appears in the plot as a
//! `% fs<id>: <terminals>` comment followed by its drawing commands; a Steiner
//! point shows up as `<x> <y> <terminal> T S` (draw from the point to a
//! terminal). Every other fact is a single-line pattern.

pub mod annotations;
pub mod cursor;
pub mod gap;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, read_input};
use crate::geometry::Point;
use crate::model::{CoverageMap, OptimalityGap};

use annotations::TreeCostReport;
use cursor::LineCursor;
use gap::GapEstimator;

/// Decimal number as printed by C's `%f`/`%g`.
pub(crate) const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

const TREE_MARKER: &str = "% fs";
const END_OF_PLOT: &str = "EndPlot";
const MAX_TREE_TERMINALS: usize = 10;

/// A selected tree as drawn in the transcript's plot.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTree {
    pub id: usize,
    /// 0-based terminal ids listed after the colon.
    pub terminals: Vec<usize>,
    /// First Steiner-to-terminal drawing command's origin, if any.
    pub steiner_point: Option<Point>,
}

/// Everything recovered from one transcript.
#[derive(Debug, Clone, Default)]
pub struct TranscriptFacts {
    /// Tree ids from every tree-definition line, in file order.
    pub selected_ids: Vec<usize>,
    /// Trees whose definition listed at least one terminal.
    pub trees: Vec<TranscriptTree>,
    pub coverage: CoverageMap,
    pub gap: OptimalityGap,
    pub tree_costs: BTreeMap<usize, TreeCostReport>,
    pub budget: Option<f64>,
    pub battery_echoes: Vec<(usize, f64)>,
}

/// Parse `% fs<id>: <t0> <t1> ...` into the id and the leading run of
/// integer terminal ids.
fn parse_tree_definition(trimmed: &str) -> Option<(usize, Vec<usize>)> {
    if !trimmed.contains(TREE_MARKER) || !trimmed.contains(':') {
        return None;
    }
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^%\s*fs(\d+)\s*:(.*)$").unwrap());
    let caps = re.captures(trimmed)?;
    let id = caps.get(1)?.as_str().parse().ok()?;
    let terminals = caps
        .get(2)
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .map_while(|t| t.parse::<usize>().ok())
                .take(MAX_TREE_TERMINALS)
                .collect()
        })
        .unwrap_or_default();
    Some((id, terminals))
}

/// Parse a `<x> <y> <terminal> T ...` drawing command into its origin.
fn parse_steiner_command(trimmed: &str) -> Option<Point> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"^({NUMBER})\s+({NUMBER})\s+[-+]?\d+\s*T")).unwrap()
    });
    let caps = re.captures(trimmed)?;
    let x = caps.get(1)?.as_str().parse().ok()?;
    let y = caps.get(2)?.as_str().parse().ok()?;
    Some(Point::new(x, y))
}

fn is_plot_boundary(trimmed: &str) -> bool {
    trimmed.contains(TREE_MARKER) || trimmed.contains(END_OF_PLOT)
}

/// Collects the single-line facts. Every transcript line passes through
/// `observe` exactly once.
#[derive(Default)]
struct LineFacts {
    coverage: CoverageMap,
    gap: GapEstimator,
    tree_costs: BTreeMap<usize, TreeCostReport>,
    budget: Option<f64>,
    battery_echoes: Vec<(usize, f64)>,
}

impl LineFacts {
    fn observe(&mut self, line: &str) {
        if let Some((id, value)) = annotations::parse_not_covered(line) {
            self.coverage.insert(id, value);
        }
        if let Some(report) = annotations::parse_tree_cost(line) {
            self.tree_costs.insert(report.tree_id, report);
        }
        if let Some(budget) = annotations::parse_budget(line) {
            self.budget = Some(budget);
        }
        if let Some(echo) = annotations::parse_battery_echo(line) {
            self.battery_echoes.push(echo);
        }
        self.gap.observe_line(line);
    }
}

/// Scan a transcript in one pass.
///
/// After a tree definition, the following lines are searched for the tree's
/// Steiner point. The search ends at the next tree definition or the end of
/// the plot, and the cursor is rewound so that line is handled by the outer
/// scan.
pub fn parse_transcript(text: &str) -> TranscriptFacts {
    let mut cursor = LineCursor::new(text);
    let mut facts = LineFacts::default();
    let mut selected_ids = Vec::new();
    let mut trees = Vec::new();

    while let Some(line) = cursor.next() {
        facts.observe(line);

        let Some((id, terminals)) = parse_tree_definition(line.trim()) else {
            continue;
        };
        selected_ids.push(id);

        let mut steiner_point = None;
        loop {
            let mark = cursor.position();
            let Some(next) = cursor.next() else {
                break;
            };
            let trimmed = next.trim();
            if is_plot_boundary(trimmed) {
                cursor.seek(mark);
                break;
            }
            if let Some(point) = parse_steiner_command(trimmed) {
                steiner_point.get_or_insert(point);
            }
            facts.observe(next);
        }

        if terminals.is_empty() {
            log::debug!("Tree definition fs{id} lists no terminals, geometry skipped");
            continue;
        }
        trees.push(TranscriptTree {
            id,
            terminals,
            steiner_point,
        });
    }

    TranscriptFacts {
        selected_ids,
        trees,
        coverage: facts.coverage,
        gap: facts.gap.finish(),
        tree_costs: facts.tree_costs,
        budget: facts.budget,
        battery_echoes: facts.battery_echoes,
    }
}

/// Read and scan a transcript file.
pub fn load_transcript(path: &Path) -> Result<TranscriptFacts> {
    let text = read_input(path)?;
    let facts = parse_transcript(&text);
    log::debug!(
        "Transcript {}: {} selected id(s) {:?}, {} tree(s) with geometry, {} coverage value(s)",
        path.display(),
        facts.selected_ids.len(),
        facts.selected_ids,
        facts.trees.len(),
        facts.coverage.len()
    );
    for tree in &facts.trees {
        match tree.steiner_point {
            Some(p) => log::debug!(
                "  FST {}: terminals {:?} with Steiner point at {p}",
                tree.id,
                tree.terminals
            ),
            None => log::debug!("  FST {}: terminals {:?}", tree.id, tree.terminals),
        }
    }
    Ok(facts)
}
