use std::path::Path;

use colored::Colorize;

use crate::error::read_input;
use crate::model::OptimalityGap;
use crate::transcript::gap::estimate_gap;

pub fn run(solution: &Path) -> anyhow::Result<()> {
    let text = read_input(solution)?;
    match estimate_gap(&text) {
        gap @ OptimalityGap::Available(_) => println!("Final MIP Gap: {gap}"),
        OptimalityGap::Unavailable => println!(
            "{} Could not parse MIP gap from {}",
            "Warning:".yellow(),
            solution.display()
        ),
    }
    Ok(())
}
