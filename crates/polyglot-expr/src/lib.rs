//! Multi-target expression transpiler.
//!
//! `polyglot-expr` parses small JavaScript-like expressions (event handlers,
//! reactive bindings) and emits equivalent code for Lua, JavaScript, C and
//! Hare, so one expression written in markup can run on whichever runtime
//! backs a rendering target.
//!
//! # Architecture
//!
//! ```text
//! Source          AST             Target Languages
//! ──────    ─────────────    ─────────────────────────
//!                           ┌─> Lua
//! "x => x"  ─> Expr ────────┼─> JavaScript
//!          (parse.rs)       ├─> C ──> ArrowRegistry ──> stubs, ctx-init
//!                           └─> Hare
//! ```
//!
//! # Example
//!
//! ```
//! use polyglot_expr::{Target, parse, transpile};
//!
//! let expr = parse("x => x * 2").unwrap();
//! assert_eq!(transpile(&expr, Target::Lua), "function(x) return (x * 2); end");
//! assert_eq!(transpile(&expr, Target::JavaScript), "(x) => (x * 2)");
//! ```
//!
//! # C and closures
//!
//! C has no closures, so arrow functions are hoisted through an
//! [`ArrowRegistry`]. Transpile every expression of a compilation unit
//! against the same registry, then emit [`ArrowRegistry::generate_stubs`]
//! at file scope and [`ArrowRegistry::generate_ctx_init`] in the scope where
//! each callback is used:
//!
//! ```
//! use polyglot_expr::{ArrowRegistry, Target, TranspileOptions, parse, transpile_with};
//!
//! let expr = parse("() => deleteHabit(habit, index)").unwrap();
//! let mut registry = ArrowRegistry::new();
//! let mut options = TranspileOptions::new(Target::C)
//!     .with_registry(&mut registry)
//!     .with_hint("click");
//! let call_site = transpile_with(&expr, &mut options);
//! assert_eq!(call_site, "(ArrowCallback){.func = arrow_fn_0_click, .ctx = &_ctx_0}");
//! assert_eq!(
//!     registry.generate_ctx_init(0).unwrap(),
//!     "arrow_ctx_0 _ctx_0 = {.deleteHabit = deleteHabit, .habit = habit, .index = index}"
//! );
//! ```
//!
//! # Translation fidelity
//!
//! Translation is syntactic. Lua emulates the ternary with `and`/`or`,
//! which picks the alternate whenever the consequent is falsy. Strings are
//! escaped for C and Hare only; Lua and JavaScript output assumes the source
//! text is already escaped.

pub mod ast;
pub mod capture;
pub mod output;
pub mod parse;
pub mod registry;
pub mod target;
pub mod traits;
pub mod writers;

// Re-exports: AST types
pub use ast::{Arrow, ArrowBody, BinaryOp, Expr, Literal, Template, UnaryOp};

// Re-exports: analysis
pub use capture::{Analysis, Captures, arrow_captures, collect_identifiers};

// Re-exports: parsing and traits
pub use parse::parse;
pub use traits::{ParseError, Writer};

// Re-exports: targets and writers
pub use output::{CWriter, HareWriter, JavaScriptWriter, LuaWriter};
pub use registry::{ArrowDef, ArrowRegistry, ArrowSpec};
pub use target::{Target, UnknownTarget};
pub use writers::{writer_for, writer_for_extension, writer_for_language, writers};

/// Generation settings for [`transpile_with`].
#[derive(Debug)]
pub struct TranspileOptions<'a> {
    pub target: Target,
    /// Arrow registry for the C target; ignored by other targets.
    pub registry: Option<&'a mut ArrowRegistry>,
    /// Short name folded into generated C function names.
    pub context_hint: Option<&'a str>,
}

impl<'a> TranspileOptions<'a> {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            registry: None,
            context_hint: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a mut ArrowRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_hint(mut self, hint: &'a str) -> Self {
        self.context_hint = Some(hint);
        self
    }
}

/// Emit `expr` for `target`. The C target runs without a registry, so
/// arrow functions come out as `NULL` placeholders.
pub fn transpile(expr: &Expr, target: Target) -> String {
    writer_for(target).write(expr)
}

/// Emit `expr` with full options. Arrows written for the C target are
/// registered in `options.registry` when one is given.
pub fn transpile_with(expr: &Expr, options: &mut TranspileOptions<'_>) -> String {
    match (options.target, options.registry.as_deref_mut()) {
        (Target::C, Some(registry)) => {
            CWriter::emit_with_registry(expr, registry, options.context_hint)
        }
        (target, _) => transpile(expr, target),
    }
}

/// Parse `source` and emit it for `target`.
pub fn transpile_source(source: &str, target: Target) -> Result<String, ParseError> {
    let expr = parse(source)?;
    Ok(transpile(&expr, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpile_source() {
        assert_eq!(transpile_source("a && b", Target::Lua).unwrap(), "(a and b)");
        assert!(matches!(
            transpile_source("a +", Target::Lua),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_registry_ignored_for_other_targets() {
        let expr = parse("() => f(x)").unwrap();
        let mut registry = ArrowRegistry::new();
        let mut options = TranspileOptions::new(Target::Lua).with_registry(&mut registry);
        assert_eq!(transpile_with(&expr, &mut options), "function() return f(x); end");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_shared_across_expressions() {
        let mut registry = ArrowRegistry::new();
        for src in ["() => a()", "(e) => b(e, c)"] {
            let expr = parse(src).unwrap();
            let mut options = TranspileOptions::new(Target::C).with_registry(&mut registry);
            transpile_with(&expr, &mut options);
        }
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().captures, vec!["b", "c"]);
    }

    #[test]
    fn test_c_without_registry_is_preview() {
        let expr = parse("() => a()").unwrap();
        let mut options = TranspileOptions::new(Target::C);
        assert_eq!(
            transpile_with(&expr, &mut options),
            "/* arrow function: () => ... */ NULL"
        );
    }
}
