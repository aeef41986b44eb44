use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fstview")]
#[command(author, version, about)]
#[command(long_about = "Turn GeoSteiner budget-constrained solver output into an HTML report.\n\n\
    Reads the terminals file, the candidate FST dump and the solver transcript,\n\
    works out which trees were selected and which terminals they cover, and\n\
    writes a single self-contained page with a network diagram and metrics.\n\n\
    Examples:\n  \
    fstview render --terminals terms.txt --fsts fsts.txt --solution solution.txt --output report.html\n  \
    fstview gap solution.txt          Print the final MIP gap\n  \
    fstview inspect solution.txt      Summarise batteries, costs and coverage")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the HTML report for one solver run
    Render(RenderArgs),

    /// Print the final MIP gap found in a solver transcript
    Gap {
        /// Solver transcript
        solution: PathBuf,
    },

    /// Summarise batteries, tree costs, selection and coverage in a transcript
    Inspect {
        /// Solver transcript
        solution: PathBuf,

        /// Budget to check tree costs against (overrides the transcript)
        #[arg(long)]
        budget: Option<f64>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Terminals file (`x y battery` per line)
    #[arg(long)]
    pub terminals: PathBuf,

    /// FST file produced by the enumeration stage
    #[arg(long)]
    pub fsts: PathBuf,

    /// Solver transcript
    #[arg(long)]
    pub solution: PathBuf,

    /// Where to write the HTML report
    #[arg(short, long)]
    pub output: PathBuf,

    /// Candidate tree dump [default: fsts_dump.txt next to --fsts]
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Budget for the utilization figures (overrides transcript and config)
    #[arg(long)]
    pub budget: Option<f64>,

    /// Page theme (overrides render.theme)
    #[arg(long, value_enum)]
    pub theme: Option<ThemeName>,

    /// Always use the built-in renderer
    #[arg(long)]
    pub no_generator: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. render.theme, render.generator, defaults.budget)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Render(args)) => {
                crate::commands::render::run(args, self.verbose > 0, self.quiet)
            }
            Some(Commands::Gap { solution }) => crate::commands::gap::run(&solution),
            Some(Commands::Inspect { solution, budget }) => {
                crate::commands::inspect::run(&solution, budget)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("fstview {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                use clap::CommandFactory;
                let mut cmd = Self::command();
                cmd.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::parse_from([
            "fstview",
            "-vv",
            "render",
            "--terminals",
            "t.txt",
            "--fsts",
            "f.txt",
            "--solution",
            "s.txt",
            "-o",
            "out.html",
            "--theme",
            "dark",
            "--budget",
            "1500",
        ]);
        assert_eq!(cli.verbose, 2);
        let Some(Commands::Render(args)) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.terminals, PathBuf::from("t.txt"));
        assert_eq!(args.dump, None);
        assert_eq!(args.theme, Some(ThemeName::Dark));
        assert_eq!(args.budget, Some(1500.0));
        assert!(!args.no_generator);
    }

    #[test]
    fn test_render_requires_all_inputs() {
        let result = Cli::try_parse_from(["fstview", "render", "--terminals", "t.txt"]);
        assert!(result.is_err());
    }
}
