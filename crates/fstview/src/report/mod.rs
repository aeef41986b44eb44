//! Report generation: the combined model and the document it renders to.

pub mod generator;
pub mod html;
pub mod svg;

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{ReportError, Result};
use crate::model::{OptimalityGap, Terminal};
use crate::reconcile::Topology;
use crate::theme::Theme;

pub use generator::ExternalGenerator;

/// The four files a report is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFiles {
    pub terminals: PathBuf,
    pub fsts: PathBuf,
    pub dump: PathBuf,
    pub solution: PathBuf,
}

impl InputFiles {
    /// Dump path used when none is given: `fsts_dump.txt` next to the FST file.
    pub fn default_dump_for(fsts: &Path) -> PathBuf {
        fsts.parent()
            .unwrap_or_else(|| Path::new(""))
            .join("fsts_dump.txt")
    }
}

/// Everything the renderer needs. Built once per run, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReportModel {
    pub terminals: Vec<Terminal>,
    pub topology: Topology,
    pub gap: OptimalityGap,
    pub budget: Option<f64>,
    pub inputs: InputFiles,
}

impl ReportModel {
    pub fn covered_count(&self) -> usize {
        self.terminals.iter().filter(|t| t.covered).count()
    }

    pub fn uncovered_ids(&self) -> Vec<usize> {
        self.terminals
            .iter()
            .filter(|t| !t.covered)
            .map(|t| t.id)
            .collect()
    }

    /// Covered share in percent; 0 when there are no terminals.
    pub fn coverage_rate(&self) -> f64 {
        if self.terminals.is_empty() {
            0.0
        } else {
            self.covered_count() as f64 * 100.0 / self.terminals.len() as f64
        }
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.topology.total_selected_cost()
    }

    /// Total cost as a percentage of the budget.
    pub fn budget_utilization(&self) -> Option<f64> {
        match (self.total_cost(), self.budget) {
            (Some(total), Some(budget)) if budget > 0.0 => Some(total * 100.0 / budget),
            _ => None,
        }
    }

    pub fn within_budget(&self) -> Option<bool> {
        match (self.total_cost(), self.budget) {
            (Some(total), Some(budget)) => Some(total <= budget),
            _ => None,
        }
    }

    /// Left-hand side of the spanning constraint: `Σ(|FST| - 1)` over the
    /// selected trees plus the number of uncovered terminals.
    pub fn spanning_sum(&self) -> usize {
        let edges: usize = self
            .topology
            .realizations
            .iter()
            .map(|r| r.terminals.len().saturating_sub(1))
            .sum();
        edges + self.uncovered_ids().len()
    }

    /// Right-hand side of the spanning constraint.
    pub fn spanning_target(&self) -> usize {
        self.terminals.len().saturating_sub(1)
    }

    pub fn component_count(&self) -> usize {
        self.topology.component_count(self.terminals.len())
    }
}

/// Which path produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Delegated,
    BuiltIn,
}

pub struct ReportRenderer {
    theme: Theme,
    generator: Option<ExternalGenerator>,
}

impl ReportRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: ExternalGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Write the report to `output`.
    ///
    /// A configured generator is tried first. Its failure is logged and the
    /// built-in document is written instead; only an unwritable output path
    /// is an error.
    pub fn render(&self, model: &ReportModel, output: &Path) -> Result<RenderOutcome> {
        if let Some(generator) = &self.generator {
            if generator.is_available() {
                match generator.generate(&model.inputs, output) {
                    Ok(()) => {
                        debug!("External generator wrote {}", output.display());
                        return Ok(RenderOutcome::Delegated);
                    }
                    Err(e) => info!("{e}; using built-in renderer"),
                }
            } else {
                debug!(
                    "Generator {} not found; using built-in renderer",
                    generator.script().display()
                );
            }
        }

        debug!("Rendering built-in report with {} theme", self.theme.name);
        let document = html::HtmlReport::new(model, &self.theme).to_string();
        std::fs::write(output, document).map_err(|source| ReportError::Create {
            path: output.to_path_buf(),
            source,
        })?;
        Ok(RenderOutcome::BuiltIn)
    }
}
