use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!("{} Set {key} = {value}", "✓".green());
            println!("  Saved to {}", path.display());
            Ok(())
        }
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let budget = config
        .default_budget()
        .map_or_else(|| "(none)".to_string(), |b| b.to_string());
    let rows = [
        ("render.theme", config.theme_name().to_string()),
        ("render.generator", config.generator().display().to_string()),
        (
            "render.generator_interpreter",
            config.generator_interpreter().to_string(),
        ),
        (
            "render.generator_timeout_secs",
            config.generator_timeout().as_secs().to_string(),
        ),
        ("render.use_generator", config.use_generator().to_string()),
        ("defaults.budget", budget),
    ];
    for (key, value) in rows {
        println!("  {:<30} {}", key.cyan(), value);
    }
    Ok(())
}
