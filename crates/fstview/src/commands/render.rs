use anyhow::Context;
use colored::Colorize;

use crate::cli::RenderArgs;
use crate::config::Config;
use crate::pipeline::{BudgetSources, build_model};
use crate::report::{ExternalGenerator, InputFiles, RenderOutcome, ReportRenderer};
use crate::theme::Theme;

pub fn run(args: RenderArgs, verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default();

    let dump = args
        .dump
        .unwrap_or_else(|| InputFiles::default_dump_for(&args.fsts));
    let inputs = InputFiles {
        terminals: args.terminals,
        fsts: args.fsts,
        dump,
        solution: args.solution,
    };

    if !quiet {
        println!("{}", "GeoSteiner Visualization Generator".bold());
        println!("  Terminals: {}", inputs.terminals.display());
        println!("  FSTs:      {}", inputs.fsts.display());
        println!("  Dump:      {}", inputs.dump.display());
        println!("  Solution:  {}", inputs.solution.display());
        println!("  Output:    {}", args.output.display());
    }

    let budget = BudgetSources {
        command_line: args.budget,
        configured: config.default_budget(),
    };
    let model = build_model(inputs, budget)?;

    let theme = match args.theme {
        Some(name) => Theme::from_name(name.as_str()),
        None => Theme::from_name(config.theme_name()),
    };
    let mut renderer = ReportRenderer::new(theme);
    if config.use_generator() && !args.no_generator {
        let generator = ExternalGenerator::new(
            config.generator_interpreter(),
            config.generator(),
            config.generator_timeout(),
        )
        .verbose(verbose);
        renderer = renderer.with_generator(generator);
    }

    let outcome = renderer
        .render(&model, &args.output)
        .with_context(|| format!("Failed to render report to {}", args.output.display()))?;

    if !quiet {
        let via = match outcome {
            RenderOutcome::Delegated => "external generator",
            RenderOutcome::BuiltIn => "built-in renderer",
        };
        println!(
            "  {} of {} FSTs selected, {} of {} terminals covered, MIP gap {}",
            model.topology.selected_count(),
            model.topology.trees.len(),
            model.covered_count(),
            model.terminals.len(),
            model.gap
        );
        if !model.topology.anomalies.is_empty() {
            println!(
                "  {} {} input inconsistencies (run with -v for details)",
                "!".yellow(),
                model.topology.anomalies.len()
            );
        }
        println!(
            "{} Report written to {} ({via})",
            "✓".green(),
            args.output.display()
        );
    }
    Ok(())
}
