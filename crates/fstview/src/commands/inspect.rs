use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::coverage::is_covered;
use crate::model::OptimalityGap;
use crate::report::html::format_cost;
use crate::transcript::annotations::TreeCostReport;
use crate::transcript::{TranscriptFacts, load_transcript};

const LOW_BATTERY: f64 = 50.0;
const HIGH_BATTERY: f64 = 80.0;

/// Three-way battery classification used in transcript summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatteryStatus {
    Low,
    Medium,
    High,
}

impl BatteryStatus {
    fn from_level(level: f64) -> Self {
        if level < LOW_BATTERY {
            Self::Low
        } else if level < HIGH_BATTERY {
            Self::Medium
        } else {
            Self::High
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    fn colored(self) -> ColoredString {
        match self {
            Self::Low => self.label().red(),
            Self::Medium => self.label().yellow(),
            Self::High => self.label().green(),
        }
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What a transcript says about one solver run, without any re-optimization.
#[derive(Debug, Clone, PartialEq)]
struct Summary {
    /// Last echoed battery level per terminal.
    batteries: BTreeMap<usize, f64>,
    budget: Option<f64>,
    tree_costs: Vec<TreeCostReport>,
    selected: Vec<usize>,
    covered: usize,
    uncovered: usize,
    gap: OptimalityGap,
}

impl Summary {
    fn from_facts(facts: &TranscriptFacts, budget_override: Option<f64>) -> Self {
        let batteries: BTreeMap<usize, f64> = facts.battery_echoes.iter().copied().collect();
        let mut selected = Vec::new();
        for &id in &facts.selected_ids {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        let covered = facts
            .coverage
            .keys()
            .filter(|&&id| is_covered(&facts.coverage, id))
            .count();
        Self {
            batteries,
            budget: budget_override.or(facts.budget),
            tree_costs: facts.tree_costs.values().cloned().collect(),
            selected,
            covered,
            uncovered: facts.coverage.len() - covered,
            gap: facts.gap,
        }
    }

    fn average_battery(&self) -> Option<f64> {
        if self.batteries.is_empty() {
            None
        } else {
            Some(self.batteries.values().sum::<f64>() / self.batteries.len() as f64)
        }
    }

    fn low_battery_count(&self) -> usize {
        self.batteries
            .values()
            .filter(|&&b| BatteryStatus::from_level(b) == BatteryStatus::Low)
            .count()
    }

    fn within_budget(&self, report: &TreeCostReport) -> Option<bool> {
        self.budget.map(|b| report.tree_cost <= b)
    }

    fn print(&self) {
        println!("{}", "Terminal batteries".bold());
        if self.batteries.is_empty() {
            println!("  {}", "no battery lines found".dimmed());
        } else {
            for (&id, &level) in &self.batteries {
                let status = BatteryStatus::from_level(level).colored();
                println!("  T{id:<4} {level:>6.1}%  {status}");
            }
            if let Some(avg) = self.average_battery() {
                println!("  Average battery: {avg:.1}%");
            }
            println!(
                "  Low-battery terminals (< {LOW_BATTERY:.0}%): {}",
                self.low_battery_count()
            );
        }
        println!();

        match self.budget {
            Some(b) => println!("{} {}", "Budget:".bold(), format_cost(b)),
            None => println!("{} Not available", "Budget:".bold()),
        }
        println!();

        println!("{}", "FST costs".bold());
        if self.tree_costs.is_empty() {
            println!("  {}", "no cost lines found".dimmed());
        } else {
            println!(
                "  {:<6} {:>14} {:>14} {:>14}  Budget",
                "FST", "Tree cost", "Battery cost", "Combined"
            );
            for report in &self.tree_costs {
                let flag = match self.within_budget(report) {
                    Some(true) => "FEASIBLE".green(),
                    Some(false) => "EXCEEDS".red(),
                    None => "-".normal(),
                };
                println!(
                    "  {:<6} {:>14.2} {:>14.2} {:>14.2}  {flag}",
                    report.tree_id, report.tree_cost, report.battery_cost, report.combined
                );
            }
        }
        println!();

        let selected = if self.selected.is_empty() {
            "none".to_string()
        } else {
            self.selected
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{} {selected}", "Selected FSTs:".bold());
        println!(
            "{} {} covered, {} uncovered (of {} reported)",
            "Coverage:".bold(),
            self.covered,
            self.uncovered,
            self.covered + self.uncovered
        );
        println!("{} {}", "MIP gap:".bold(), self.gap);
    }
}

pub fn run(solution: &Path, budget: Option<f64>) -> anyhow::Result<()> {
    let facts = load_transcript(solution)?;
    println!(
        "{} {}\n",
        "Transcript analysis:".bold(),
        solution.display()
    );
    Summary::from_facts(&facts, budget).print();
    Ok(())
}
