//! JavaScript writer.
//!
//! Closest to the input syntax; output differs from the source mainly in
//! normalized spacing and explicit parentheses around binary expressions.

use super::{format_number, is_valid_identifier, negation_needs_parens};
use crate::ast::*;
use crate::traits::Writer;

/// Static instance of the JavaScript writer for registry.
pub static JAVASCRIPT_WRITER: JavaScriptWriterImpl = JavaScriptWriterImpl;

/// JavaScript writer implementing the Writer trait.
pub struct JavaScriptWriterImpl;

impl Writer for JavaScriptWriterImpl {
    fn language(&self) -> &'static str {
        "javascript"
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn write(&self, expr: &Expr) -> String {
        JavaScriptWriter::emit(expr)
    }
}

/// Emits expressions as JavaScript source code.
#[derive(Default)]
pub struct JavaScriptWriter {
    output: String,
}

impl JavaScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an expression to JavaScript source.
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

            Expr::Unary { op, expr } => {
                self.output.push_str(match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Neg => "-",
                    UnaryOp::Typeof => "typeof ",
                });
                if *op == UnaryOp::Neg && negation_needs_parens(expr) {
                    self.write_grouped(expr);
                } else {
                    self.write_operand(expr);
                }
            }

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
                    } else {
                        self.output.push('"');
                        self.output.push_str(key);
                        self.output.push('"');
                    }
                    self.output.push_str(": ");
                    self.write_expr(value);
                }
                self.output.push('}');
            }

            Expr::Arrow(arrow) => {
                self.output.push('(');
                self.output.push_str(&arrow.params.join(", "));
                self.output.push_str(") => ");
                match &arrow.body {
                    // `() => {a: 1}` would read as a block.
                    ArrowBody::Expr(body) if matches!(**body, Expr::Object(_)) => {
                        self.write_grouped(body)
                    }
                    ArrowBody::Expr(body) => self.write_expr(body),
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
                self.output.push('(');
                self.write_operand(test);
                self.output.push_str(" ? ");
                self.write_operand(consequent);
                self.output.push_str(" : ");
                self.write_operand(alternate);
                self.output.push(')');
            }

            Expr::Template(template) => {
                self.output.push('`');
                for (part, expr) in template.segments() {
                    self.output.push_str(part);
                    if let Some(expr) = expr {
                        self.output.push_str("${");
                        self.write_expr(expr);
                        self.output.push('}');
                    }
                }
                self.output.push('`');
            }
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
            | Expr::Object(_)
            | Expr::Literal(Literal::Number(_)) => self.write_grouped(expr),
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
                self.output.push_str(s);
                self.output.push('"');
            }
            Literal::Number(n) => self.output.push_str(&format_number(*n)),
            Literal::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Literal::Null => self.output.push_str("null"),
            Literal::Undefined => self.output.push_str("undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn js(src: &str) -> String {
        JavaScriptWriter::emit(&parse(src).unwrap())
    }

    #[test]
    fn test_arrow_functions() {
        assert_eq!(js("x=>x*2"), "(x) => (x * 2)");
        assert_eq!(js("(a,b)=>a+b"), "(a, b) => (a + b)");
        assert_eq!(js("() => { run(); }"), "() => { run(); }");
    }

    #[test]
    fn test_operators_pass_through() {
        assert_eq!(js("a != b && !c"), "((a != b) && !c)");
        assert_eq!(js("-n"), "-n");
        assert_eq!(js("typeof x == 'string'"), "(typeof x == \"string\")");
    }

    #[test]
    fn test_index_is_unchanged() {
        assert_eq!(js("arr[0]"), "arr[0]");
    }

    #[test]
    fn test_conditional() {
        assert_eq!(js("a ? b : c"), "(a ? b : c)");
        assert_eq!(js("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(js("null"), "null");
        assert_eq!(js("undefined"), "undefined");
        assert_eq!(js("3.0"), "3");
        assert_eq!(js("'single'"), "\"single\"");
    }

    #[test]
    fn test_collections() {
        assert_eq!(js("[1, [2]]"), "[1, [2]]");
        assert_eq!(js("{a: 1, 'b-c': 2}"), "{a: 1, \"b-c\": 2}");
        assert_eq!(js("{}"), "{}");
    }

    #[test]
    fn test_template() {
        assert_eq!(js("`Hi ${user.name}!`"), "`Hi ${user.name}!`");
        assert_eq!(js("`${a + b}`"), "`${(a + b)}`");
    }

    #[test]
    fn test_arrow_callee_and_operand_are_grouped() {
        assert_eq!(js("(x => x * 2)(1)"), "((x) => (x * 2))(1)");
        assert_eq!(js("f || (x => x)"), "(f || ((x) => x))");
        assert_eq!(js("(() => 1).call"), "(() => 1).call");
        assert_eq!(js("ok ? (() => 1) : g"), "(ok ? (() => 1) : g)");
        // Arguments and elements stay bare.
        assert_eq!(js("f(x => x, [y => y])"), "f((x) => x, [(y) => y])");
        assert_eq!(js("x => y => x + y"), "(x) => (y) => (x + y)");
    }

    #[test]
    fn test_object_body_is_grouped() {
        assert_eq!(js("() => ({a: 1})"), "() => ({a: 1})");
        assert_eq!(js("x => ({})"), "(x) => ({})");
    }

    #[test]
    fn test_receiver_grouping() {
        assert_eq!(js("(-x).y"), "(-x).y");
        assert_eq!(js("(1).toFixed(2)"), "(1).toFixed(2)");
        assert_eq!(js("({a: 1}).a"), "({a: 1}).a");
        assert_eq!(js("'s'.length"), "\"s\".length");
    }

    #[test]
    fn test_nested_negation_is_not_decrement() {
        assert_eq!(js("- -x"), "-(-x)");
        assert_eq!(js("-(-1)"), "-(-1)");
        assert_eq!(js("!-x"), "!-x");
        assert_eq!(js("-!x"), "-!x");
    }

    #[test]
    fn test_method_chain() {
        assert_eq!(
            js("items.filter(x => x.done).length"),
            "items.filter((x) => x.done).length"
        );
    }
}
