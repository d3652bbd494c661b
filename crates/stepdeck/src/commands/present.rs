use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;

use stepdeck::config::{Config, OutputFormat};
use stepdeck::report::Report;
use stepdeck::{Document, InputEvent, Key, Location, Session};

pub struct Options {
    pub file: PathBuf,
    pub at: Option<String>,
    pub events: Vec<String>,
    pub json: bool,
    pub no_markers: bool,
    pub quiet: bool,
}

/// One line of an event script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Input(InputEvent),
    /// An external change of the location string.
    Visit(String),
}

impl FromStr for ScriptEvent {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.starts_with('#') {
            return Ok(Self::Visit(line.to_string()));
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let event = match (word, rest) {
            ("next" | "n", "") => Self::Input(InputEvent::KeyDown(Key::ArrowRight)),
            ("prev" | "p", "") => Self::Input(InputEvent::KeyDown(Key::ArrowLeft)),
            ("click", "") => Self::Input(InputEvent::Click),
            ("key", "") => anyhow::bail!("`key` needs a key name, e.g. `key ArrowRight`"),
            ("key", name) => Self::Input(InputEvent::KeyDown(script_key(name))),
            ("goto", "") => anyhow::bail!("`goto` needs a location, e.g. `goto #/2/0`"),
            ("goto", location) => Self::Visit(location.to_string()),
            _ => anyhow::bail!(
                "Unknown event: {line:?}. Use next, prev, click, key <Name> or goto <location>."
            ),
        };
        Ok(event)
    }
}

/// Key named in a script. Spelled-out names are accepted for keys whose DOM
/// value is awkward to type; everything else must be the exact DOM value.
fn script_key(name: &str) -> Key {
    match name {
        "Space" | "Spacebar" => Key::Space,
        "Right" => Key::ArrowRight,
        "Left" => Key::ArrowLeft,
        other => Key::from_name(other),
    }
}

impl ScriptEvent {
    fn label(&self) -> String {
        match self {
            Self::Input(event) => event.to_string(),
            Self::Visit(location) => format!("goto {location}"),
        }
    }

    fn apply(&self, session: &mut Session) {
        match self {
            Self::Input(event) => {
                let dispatched = session.dispatch(event.clone());
                log::trace!("default prevented: {}", dispatched.default_prevented);
            }
            Self::Visit(location) => {
                session.visit(location);
            }
        }
    }
}

struct Printer {
    format: OutputFormat,
    markers: bool,
}

impl Printer {
    fn emit(&self, out: &mut impl Write, report: &Report) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(out, "{}", report.to_text(self.markers))?,
            OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
        }
        out.flush()?;
        Ok(())
    }
}

pub fn run(options: Options) -> Result<()> {
    let config = Config::load_or_default();
    let document = Document::load(&options.file)?;

    let start = options.at.as_deref().or(config.start()).unwrap_or_default();
    let Some(mut session) = Session::start(document, Location::new(start)) else {
        anyhow::bail!(
            "No slides found in {} (expected a #deck element containing .slide elements)",
            options.file.display()
        );
    };

    let printer = Printer {
        format: if options.json {
            OutputFormat::Json
        } else {
            config.output()
        },
        markers: !options.no_markers && config.markers(),
    };
    let mut out = std::io::stdout().lock();
    printer.emit(&mut out, &Report::capture(&session, "start"))?;

    if !options.events.is_empty() {
        for raw in &options.events {
            let event: ScriptEvent = raw.parse()?;
            event.apply(&mut session);
            printer.emit(&mut out, &Report::capture(&session, event.label()))?;
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() && !options.quiet {
        eprintln!(
            "{}",
            "Enter events (next, prev, click, key <Name>, goto <location>); `quit` to exit."
                .dimmed()
        );
    }
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event on line {}", number + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if matches!(trimmed, "quit" | "q" | "exit") {
            break;
        }
        match trimmed.parse::<ScriptEvent>() {
            Ok(event) => {
                event.apply(&mut session);
                printer.emit(&mut out, &Report::capture(&session, event.label()))?;
            }
            Err(e) => eprintln!("{} {e}", "skipped:".yellow()),
        }
    }
    Ok(())
}
