//! Transpile a single expression.

use anyhow::Context;
use clap::Args;
use polyglot_expr::{ArrowRegistry, Expr, Target, TranspileOptions, parse, transpile_with};

use crate::config::PgxConfig;

#[derive(Args, Debug)]
pub struct TranspileArgs {
    /// Expression source
    pub expr: String,

    /// Output target: lua, js, c or hare (default from config, else lua)
    #[arg(short, long)]
    pub target: Option<Target>,

    /// Name hint for generated C functions
    #[arg(long)]
    pub hint: Option<String>,
}

/// One compilation unit: every expression shares the same arrow registry,
/// and the C stubs are emitted once after the last expression.
pub struct Unit {
    target: Target,
    registry: ArrowRegistry,
    hint: Option<String>,
}

impl Unit {
    pub fn new(target: Option<Target>, hint: Option<String>, config: &PgxConfig) -> Self {
        Self {
            target: target.unwrap_or_else(|| config.target()),
            registry: ArrowRegistry::with_prefix(config.prefix()),
            hint: hint.or_else(|| config.hint().map(str::to_string)),
        }
    }

    pub fn emit(&mut self, expr: &Expr) -> String {
        let mut options = TranspileOptions::new(self.target);
        if self.target == Target::C {
            options = options.with_registry(&mut self.registry);
        }
        if let Some(hint) = &self.hint {
            options = options.with_hint(hint);
        }
        transpile_with(expr, &mut options)
    }

    /// Stubs followed by one context initializer per arrow with captures.
    /// `None` when nothing was registered.
    pub fn finish(&self) -> Option<String> {
        if self.registry.is_empty() {
            return None;
        }
        let mut out = self.registry.generate_stubs();
        let inits: Vec<String> = self
            .registry
            .iter()
            .filter_map(|def| self.registry.generate_ctx_init(def.id))
            .collect();
        if !inits.is_empty() {
            out.push_str("/* context initializers */\n");
            for init in inits {
                out.push_str(&init);
                out.push_str(";\n");
            }
        }
        Some(out.trim_end().to_string())
    }
}

/// Transpile one expression, followed by its C stubs if any.
pub fn cmd_transpile(args: &TranspileArgs, config: &PgxConfig) -> anyhow::Result<String> {
    let expr = parse(&args.expr).with_context(|| format!("failed to parse `{}`", args.expr))?;
    let mut unit = Unit::new(args.target, args.hint.clone(), config);
    let code = unit.emit(&expr);
    Ok(match unit.finish() {
        Some(stubs) => format!("{code}\n\n{stubs}"),
        None => code,
    })
}
