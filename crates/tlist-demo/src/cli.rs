//! Command-line options for the demo driver.
//!
//! Every widget parameter can also come from the environment:
//! `TLIST_DEMO_TYPE`, `TLIST_DEMO_OPTIONS`, `TLIST_DEMO_INITIAL`.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use tlist_core::InstanceParameters;

use crate::error::{DemoError, Result};
use crate::script::parse_script;
use crate::session::{OutputFormat, Session};

/// Seed value of the standalone demo field.
pub const DEFAULT_INITIAL: &str = r#"["foo","bar"]"#;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tlist-demo",
    about = "Drive a typed list widget over an in-memory field",
    version,
    after_help = "Script commands (one per line, # starts a comment):\n  \
        input TEXT | submit | enter | add TEXT | remove POS | edit POS TEXT\n  \
        drag FROM TO | drag-start POS | drag-enter POS | drag-end | drag-cancel\n  \
        external JSON | show"
)]
pub struct Opts {
    /// Item type: `string` or `number`. Anything else falls back to `string`.
    #[arg(long = "type", env = "TLIST_DEMO_TYPE")]
    pub item_type: Option<String>,

    /// Comma separated allowed values (string lists only).
    #[arg(long, env = "TLIST_DEMO_OPTIONS")]
    pub options: Option<String>,

    /// Initial field value (a JSON array).
    #[arg(long, env = "TLIST_DEMO_INITIAL", default_value = DEFAULT_INITIAL)]
    pub initial: String,

    /// Script file; standard input when omitted.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Print one JSON snapshot per command instead of text.
    #[arg(long)]
    pub json: bool,
}

impl Opts {
    /// Widget parameters as the host would supply them.
    #[must_use]
    pub fn parameters(&self) -> InstanceParameters {
        let mut params = match &self.item_type {
            Some(item_type) => InstanceParameters::with_type(item_type.as_str()),
            None => InstanceParameters::default(),
        };
        if let Some(options) = &self.options {
            params = params.options(options.as_str());
        }
        params
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    fn read_script(&self) -> Result<String> {
        match &self.script {
            Some(path) => std::fs::read_to_string(path).map_err(|source| DemoError::ScriptFile {
                path: path.clone(),
                source,
            }),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let opts = Opts::parse();
    let stdout = std::io::stdout();
    run(&opts, &mut stdout.lock())
}

/// Run the script named by `opts`, writing rendered state to `out`.
///
/// # Errors
///
/// Fails on an unreadable or unparsable script, an invalid initial value,
/// or an output error.
pub fn run(opts: &Opts, out: &mut impl Write) -> Result<()> {
    let script = opts.read_script()?;
    let lines = parse_script(&script)?;
    let mut session = Session::start(
        Some(opts.initial.as_str()),
        &opts.parameters(),
        opts.format(),
    )?;
    session.run(&lines, out)?;
    out.flush()?;
    Ok(())
}
