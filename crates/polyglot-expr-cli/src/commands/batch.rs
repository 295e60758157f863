//! Transpile a file of expressions as one compilation unit.

use anyhow::{Context, bail};
use clap::Args;
use polyglot_expr::{Target, parse};
use std::path::PathBuf;

use super::transpile::Unit;
use crate::config::PgxConfig;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one expression per line (`#` starts a comment line)
    pub file: PathBuf,

    /// Output target: lua, js, c or hare (default from config, else lua)
    #[arg(short, long)]
    pub target: Option<Target>,

    /// Name hint for generated C functions
    #[arg(long)]
    pub hint: Option<String>,
}

pub fn cmd_batch(args: &BatchArgs, config: &PgxConfig) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    transpile_lines(&text, args.target, args.hint.clone(), config)
}

/// Every line is attempted; any failures are reported together.
fn transpile_lines(
    text: &str,
    target: Option<Target>,
    hint: Option<String>,
    config: &PgxConfig,
) -> anyhow::Result<String> {
    let mut unit = Unit::new(target, hint, config);
    let mut lines = Vec::new();
    let mut failures = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let source = line.trim();
        if source.is_empty() || source.starts_with('#') {
            continue;
        }
        match parse(source) {
            Ok(expr) => lines.push(unit.emit(&expr)),
            Err(err) => failures.push(format!("line {}: {err}", i + 1)),
        }
    }

    if !failures.is_empty() {
        bail!("{}", failures.join("\n"));
    }

    let mut out = lines.join("\n");
    if let Some(stubs) = unit.finish() {
        out.push_str("\n\n");
        out.push_str(&stubs);
    }
    tracing::debug!(expressions = lines.len(), "batch complete");
    Ok(out)
}
