//! C writer.
//!
//! C has no closures. Without a registry, arrow functions become an inert
//! `NULL` with a comment describing them. With an [`ArrowRegistry`], each
//! arrow is hoisted: its body is emitted into a registry entry and the call
//! site receives either the bare function name or an `ArrowCallback`
//! literal that points at a per-arrow context value.

use super::{
    comment_safe, escape_c_string, format_number, is_valid_identifier, negation_needs_parens,
};
use crate::ast::*;
use crate::capture::{Analysis, captures_of};
use crate::registry::{ArrowRegistry, ArrowSpec};
use crate::traits::Writer;

/// Static instance of the C writer for registry.
pub static C_WRITER: CWriterImpl = CWriterImpl;

/// C writer implementing the Writer trait. Runs without an arrow registry.
pub struct CWriterImpl;

impl Writer for CWriterImpl {
    fn language(&self) -> &'static str {
        "c"
    }

    fn extension(&self) -> &'static str {
        "c"
    }

    fn write(&self, expr: &Expr) -> String {
        CWriter::emit(expr)
    }
}

/// Emits expressions as C source code.
pub struct CWriter<'r> {
    output: String,
    registry: Option<&'r mut ArrowRegistry>,
    hint: Option<&'r str>,
}

impl<'r> CWriter<'r> {
    /// Emit an expression to C source with arrows as inert placeholders.
    pub fn emit(expr: &Expr) -> String {
        let mut writer = CWriter {
            output: String::new(),
            registry: None,
            hint: None,
        };
        writer.write_expr(expr);
        writer.output
    }

    /// Emit an expression to C source, hoisting every arrow function into
    /// `registry`. `hint` is folded into the generated function names.
    pub fn emit_with_registry(
        expr: &Expr,
        registry: &'r mut ArrowRegistry,
        hint: Option<&'r str>,
    ) -> String {
        let mut writer = CWriter {
            output: String::new(),
            registry: Some(registry),
            hint,
        };
        writer.write_expr(expr);
        writer.output
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.write_literal(lit),

            Expr::Ident(name) => self.output.push_str(name),

            Expr::Binary { left, op, right } => {
                self.output.push('(');
                self.write_operand(left);
                self.output.push(' ');
                self.output.push_str(op.as_str());
                self.output.push(' ');
                self.write_operand(right);
                self.output.push(')');
            }

            Expr::Unary { op, expr } => match op {
                UnaryOp::Not => {
                    self.output.push('!');
                    self.write_operand(expr);
                }
                UnaryOp::Neg if negation_needs_parens(expr) => {
                    self.output.push('-');
                    self.write_grouped(expr);
                }
                UnaryOp::Neg => {
                    self.output.push('-');
                    self.write_operand(expr);
                }
                UnaryOp::Typeof => self.output.push_str("/* typeof unsupported */ 0"),
            },

            Expr::Property { object, property: name } | Expr::Member { object, member: name } => {
                self.write_receiver(object);
                self.output.push('.');
                self.output.push_str(name);
            }

            Expr::Index { object, index } => {
                self.write_receiver(object);
                self.output.push('[');
                self.write_expr(index);
                self.output.push(']');
            }

            Expr::Call { callee, args } => {
                self.write_receiver(callee);
                self.output.push('(');
                self.write_list(args);
                self.output.push(')');
            }

            Expr::Array(items) => {
                self.output.push('{');
                self.write_list(items);
                self.output.push('}');
            }

            // Designated initializer; keys that cannot be field names are
            // kept as a comment on a positional value.
            Expr::Object(entries) => {
                self.output.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    if is_valid_identifier(key) {
                        self.output.push('.');
                        self.output.push_str(key);
                        self.output.push_str(" = ");
                    } else {
                        self.output.push_str("/* \"");
                        self.output.push_str(&comment_safe(&escape_c_string(key)));
                        self.output.push_str("\" */ ");
                    }
                    self.write_expr(value);
                }
                self.output.push('}');
            }

            Expr::Arrow(arrow) => self.write_arrow(arrow),

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.output.push('(');
                self.write_operand(test);
                self.output.push_str(" ? ");
                self.write_operand(consequent);
                self.output.push_str(" : ");
                self.write_operand(alternate);
                self.output.push(')');
            }

            // `Hello ${name}!` -> strcat("Hello ", name, "!")
            Expr::Template(template) => {
                self.output.push_str("strcat(");
                for (part, expr) in template.segments() {
                    self.output.push('"');
                    self.output.push_str(&escape_c_string(part));
                    self.output.push('"');
                    if let Some(expr) = expr {
                        self.output.push_str(", ");
                        self.write_expr(expr);
                        self.output.push_str(", ");
                    }
                }
                self.output.push(')');
            }
        }
    }

    fn write_arrow(&mut self, arrow: &Arrow) {
        let Some(registry) = self.registry.as_deref_mut() else {
            self.output.push_str("/* arrow function: (");
            self.output.push_str(&arrow.params.join(", "));
            self.output.push_str(") => ... */ NULL");
            return;
        };

        let captures = captures_of(arrow);
        if captures.analysis == Analysis::OpaqueBlock {
            tracing::warn!(
                params = ?arrow.params,
                "block-bodied arrow registered; captured variables cannot be analyzed"
            );
        }

        // Nested arrows in the body are emitted inline, never registered.
        let body_code = match &arrow.body {
            ArrowBody::Expr(body) => CWriter::emit(body),
            ArrowBody::Block(text) => text.clone(),
        };

        let id = registry.register(ArrowSpec {
            params: &arrow.params,
            body_code,
            captures: captures.names,
            context_hint: self.hint,
            has_return_value: arrow.is_expression_body(),
        });

        match registry.get(id) {
            Some(def) => self.output.push_str(&def.reference()),
            None => self.output.push_str("/* unregistered arrow */ NULL"),
        }
    }

    fn write_operand(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Arrow(_)) {
            self.write_grouped(expr);
        } else {
            self.write_expr(expr);
        }
    }

    /// Callee, or object of `.name` / `[i]`.
    fn write_receiver(&mut self, expr: &Expr) {
        match expr {
            Expr::Arrow(_)
            | Expr::Unary { .. }
            | Expr::Literal(_)
            | Expr::Array(_)
            | Expr::Object(_) => self.write_grouped(expr),
            _ => self.write_expr(expr),
        }
    }

    fn write_grouped(&mut self, expr: &Expr) {
        self.output.push('(');
        self.write_expr(expr);
        self.output.push(')');
    }

    fn write_list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(item);
        }
    }

    fn write_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::String(s) => {
                self.output.push('"');
                self.output.push_str(&escape_c_string(s));
                self.output.push('"');
            }
            Literal::Number(n) => self.output.push_str(&format_number(*n)),
            Literal::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Literal::Null | Literal::Undefined => self.output.push_str("NULL"),
        }
    }
}
