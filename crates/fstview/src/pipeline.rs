use log::debug;

use crate::coverage::resolve_coverage;
use crate::error::{ReportError, Result};
use crate::loader::{load_candidate_trees, load_terminals};
use crate::model::Realization;
use crate::reconcile::reconcile;
use crate::report::{InputFiles, ReportModel};
use crate::transcript::load_transcript;

/// Where a run's budget may come from, highest priority first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetSources {
    pub command_line: Option<f64>,
    pub configured: Option<f64>,
}

/// Build the report model: load terminals, load candidate trees, scan the
/// transcript, reconcile, then resolve coverage. Each file is read in full
/// before the next stage starts.
pub fn build_model(inputs: InputFiles, budget: BudgetSources) -> Result<ReportModel> {
    if !inputs.fsts.exists() {
        return Err(ReportError::MissingInput {
            path: inputs.fsts.clone(),
        });
    }

    let mut terminals = load_terminals(&inputs.terminals)?;
    let trees = load_candidate_trees(&inputs.dump)?;
    let facts = load_transcript(&inputs.solution)?;

    let topology = reconcile(trees, &facts, terminals.len());
    resolve_coverage(&mut terminals, &facts.coverage);

    let budget = budget
        .command_line
        .or(facts.budget)
        .or(budget.configured);
    debug!(
        "Model: {} terminal(s), {} of {} FST(s) selected, {} edge(s), budget {:?}",
        terminals.len(),
        topology.selected_count(),
        topology.trees.len(),
        topology
            .realizations
            .iter()
            .map(Realization::segment_count)
            .sum::<usize>(),
        budget
    );

    Ok(ReportModel {
        terminals,
        topology,
        gap: facts.gap,
        budget,
        inputs,
    })
}
