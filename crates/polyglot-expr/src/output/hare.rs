//! Hare writer.
//!
//! Hare has no ternary, so conditionals become a `match` over the boolean.
//! Templates become a `fmt::fprintf` call: literal braces are doubled and
//! each interpolation is a `{}` placeholder with the expression appended to
//! the argument list.

use super::{
    comment_safe, escape_c_string, format_number, is_valid_identifier, negation_needs_parens,
};
use crate::ast::*;
use crate::traits::Writer;

/// Static instance of the Hare writer for registry.
pub static HARE_WRITER: HareWriterImpl = HareWriterImpl;

/// Hare writer implementing the Writer trait.
pub struct HareWriterImpl;

impl Writer for HareWriterImpl {
    fn language(&self) -> &'static str {
        "hare"
    }

    fn extension(&self) -> &'static str {
        "ha"
    }

    fn write(&self, expr: &Expr) -> String {
        HareWriter::emit(expr)
    }
}

/// Emits expressions as Hare source code.
#[derive(Default)]
pub struct HareWriter {
    output: String,
}

impl HareWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an expression to Hare source.
    pub fn emit(expr: &Expr) -> String {
        let mut writer = Self::new();
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
                UnaryOp::Typeof => self.output.push_str("/* typeof unsupported */ void"),
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
                self.output.push('[');
                self.write_list(items);
                self.output.push(']');
            }

            Expr::Object(entries) => {
                self.output.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    if is_valid_identifier(key) {
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

            Expr::Arrow(arrow) => {
                self.output.push_str("fn(");
                self.output.push_str(&arrow.params.join(", "));
                self.output.push_str(") ");
                match &arrow.body {
                    ArrowBody::Expr(body) => {
                        self.output.push_str("= ");
                        self.write_expr(body);
                    }
                    ArrowBody::Block(text) => {
                        self.output.push('{');
                        self.output.push_str(text);
                        self.output.push('}');
                    }
                }
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.output.push_str("match (");
                self.write_expr(test);
                self.output.push_str(") {case true => ");
                self.write_operand(consequent);
                self.output.push_str(", case => ");
                self.write_operand(alternate);
                self.output.push('}');
            }

            // `Hello ${name}!` -> fmt::fprintf(os::stdout, "Hello {}!", name)
            Expr::Template(template) => {
                self.output.push_str("fmt::fprintf(os::stdout, \"");
                for (part, expr) in template.segments() {
                    let escaped = escape_c_string(part)
                        .replace('{', "{{")
                        .replace('}', "}}");
                    self.output.push_str(&escaped);
                    if expr.is_some() {
                        self.output.push_str("{}");
                    }
                }
                self.output.push('"');
                for expr in template.expressions() {
                    self.output.push_str(", ");
                    self.write_expr(expr);
                }
                self.output.push(')');
            }
        }
    }

    /// Operand of an operator or a match arm; function literals and
    /// `match` expressions are grouped.
    fn write_operand(&mut self, expr: &Expr) {
        match expr {
            Expr::Arrow(_) | Expr::Conditional { .. } => self.write_grouped(expr),
            _ => self.write_expr(expr),
        }
    }

    /// Callee, or object of `.name` / `[i]`.
    fn write_receiver(&mut self, expr: &Expr) {
        match expr {
            Expr::Arrow(_)
            | Expr::Conditional { .. }
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
            Literal::Null | Literal::Undefined => self.output.push_str("void"),
        }
    }
}
