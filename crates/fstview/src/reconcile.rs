use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use petgraph::unionfind::UnionFind;

use crate::geometry::Point;
use crate::model::{CandidateTree, DrawMode, Realization, TreeCost};
use crate::transcript::{TranscriptFacts, TranscriptTree};

/// Inconsistencies between the inputs. None of them stop a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The transcript selected a tree id the dump never produced.
    UnknownSelectedTree { tree_id: usize },
    /// A selected tree references a terminal index outside the terminals file.
    UnknownTerminal { tree_id: usize, terminal_id: usize },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSelectedTree { tree_id } => {
                write!(f, "selected FST {tree_id} has no entry in the dump")
            }
            Self::UnknownTerminal {
                tree_id,
                terminal_id,
            } => write!(f, "FST {tree_id} references unknown terminal {terminal_id}"),
        }
    }
}

/// The reconciled view of which trees were chosen and how to draw them.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// Every candidate tree from the dump, with its authoritative selection
    /// flag, geometry and cost.
    pub trees: Vec<CandidateTree>,
    /// One drawable realization per selected tree id, in selection order.
    pub realizations: Vec<Realization>,
    pub anomalies: Vec<Anomaly>,
}

impl Topology {
    pub fn selected_count(&self) -> usize {
        self.trees.iter().filter(|t| t.selected).count()
    }

    /// Sum of reported costs over selected trees, if any were reported.
    pub fn total_selected_cost(&self) -> Option<f64> {
        let costs: Vec<f64> = self
            .trees
            .iter()
            .filter(|t| t.selected)
            .filter_map(|t| t.cost.reported())
            .collect();
        if costs.is_empty() {
            None
        } else {
            Some(costs.iter().sum())
        }
    }

    /// Number of connected components the selected trees form over the
    /// terminals they touch. Terminals outside `0..terminal_count` are
    /// ignored.
    pub fn component_count(&self, terminal_count: usize) -> usize {
        let mut uf = UnionFind::<usize>::new(terminal_count);
        let mut touched = HashSet::new();
        for r in &self.realizations {
            let members: Vec<usize> = r
                .terminals
                .iter()
                .copied()
                .filter(|&t| t < terminal_count)
                .collect();
            touched.extend(members.iter().copied());
            for pair in members.windows(2) {
                uf.union(pair[0], pair[1]);
            }
        }

        let roots: HashSet<usize> = touched.iter().map(|&t| uf.find_mut(t)).collect();
        roots.len()
    }
}

fn realize(tree_id: usize, terminals: &[usize], steiner: Option<Point>) -> Realization {
    Realization {
        tree_id,
        terminals: terminals.to_vec(),
        mode: match steiner {
            Some(p) => DrawMode::Junction(p),
            None => DrawMode::Chain,
        },
    }
}

/// Merge the dump's tree universe with the transcript's selection, geometry
/// and costs.
///
/// Transcript geometry is authoritative for the ids it covers. A selected id
/// missing from the dump is recorded as an anomaly but still drawn from the
/// transcript's own terminal list.
pub fn reconcile(
    mut trees: Vec<CandidateTree>,
    facts: &TranscriptFacts,
    terminal_count: usize,
) -> Topology {
    let mut anomalies = Vec::new();

    let mut selection_order = Vec::new();
    let mut seen = BTreeSet::new();
    for &id in &facts.selected_ids {
        if seen.insert(id) {
            selection_order.push(id);
        }
    }

    // Later plots of the same tree replace earlier ones.
    let geometry: BTreeMap<usize, &TranscriptTree> =
        facts.trees.iter().map(|t| (t.id, t)).collect();

    let known_ids: BTreeSet<usize> = trees.iter().map(|t| t.id).collect();
    for &id in &selection_order {
        if !known_ids.contains(&id) {
            log::warn!("Selected FST {id} has no entry in the candidate dump");
            anomalies.push(Anomaly::UnknownSelectedTree { tree_id: id });
        }
    }

    for tree in trees.iter_mut() {
        tree.selected = seen.contains(&tree.id);
        if tree.selected {
            log::debug!("Marking FST {} as selected", tree.id);
        }

        if let Some(report) = facts.tree_costs.get(&tree.id) {
            tree.cost = TreeCost::Reported(report.tree_cost);
        }

        if let Some(drawn) = geometry.get(&tree.id) {
            if drawn.terminals != tree.terminals {
                log::debug!(
                    "FST {}: transcript terminals {:?} replace dump terminals {:?}",
                    tree.id,
                    drawn.terminals,
                    tree.terminals
                );
                tree.terminals = drawn.terminals.clone();
            }
            tree.steiner_point = drawn.steiner_point;
            tree.steiner_count = if drawn.steiner_point.is_some() {
                1
            } else {
                usize::from(tree.terminals.len() > 2)
            };
        }
    }

    let mut realizations = Vec::with_capacity(selection_order.len());
    for &id in &selection_order {
        let realization = if let Some(drawn) = geometry.get(&id) {
            realize(id, &drawn.terminals, drawn.steiner_point)
        } else if let Some(tree) = trees.iter().find(|t| t.id == id) {
            realize(id, &tree.terminals, tree.steiner_point)
        } else {
            continue;
        };

        if matches!(realization.mode, DrawMode::Chain) && realization.terminals.len() > 2 {
            log::debug!("FST {id}: no Steiner point available, drawing as a chain");
        }
        for &terminal_id in &realization.terminals {
            if terminal_id >= terminal_count {
                log::warn!("FST {id} references unknown terminal {terminal_id}");
                anomalies.push(Anomaly::UnknownTerminal {
                    tree_id: id,
                    terminal_id,
                });
            }
        }
        realizations.push(realization);
    }

    Topology {
        trees,
        realizations,
        anomalies,
    }
}
