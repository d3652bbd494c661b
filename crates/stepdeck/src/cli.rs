use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stepdeck")]
#[command(author, version, about)]
#[command(long_about = "Step through an HTML slide deck from the terminal.\n\n\
    Loads a built deck (a #deck element holding .slide sections with\n\
    data-fragment-order fragments) and drives it with key, click and\n\
    location events, reporting the visible slide after each one.\n\n\
    Examples:\n  \
    stepdeck deck.html                       Read events from stdin\n  \
    stepdeck deck.html --at '#/3/1'          Start on slide 3, fragment 1\n  \
    stepdeck deck.html -e next -e next       Replay events and exit\n  \
    stepdeck inspect deck.html               List slides and fragment orders")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// HTML deck to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Start location, e.g. '#/2/0' (overrides defaults.start)
    #[arg(long, global = false)]
    pub at: Option<String>,

    /// Event to replay instead of reading stdin (repeatable):
    /// next, prev, click, key <Name>, goto <location>
    #[arg(short, long = "event", global = false)]
    pub events: Vec<String>,

    /// Print one JSON object per event (overrides defaults.output)
    #[arg(long, global = false)]
    pub json: bool,

    /// Do not print the slide marker strip
    #[arg(long, global = false)]
    pub no_markers: bool,

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
    /// List the slides of a deck with their fragment orders
    Inspect {
        /// HTML deck to inspect
        file: PathBuf,
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

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (defaults.output, defaults.start, defaults.markers)
        key: String,

        /// Value to set
        value: String,
    },
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
            Some(Commands::Inspect { file }) => {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::commands::inspect::run(&file)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("stepdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::commands::present::run(crate::commands::present::Options {
                        file,
                        at: self.at,
                        events: self.events,
                        json: self.json,
                        no_markers: self.no_markers,
                        quiet: self.quiet,
                    })
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
