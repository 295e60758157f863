//! Lua writer.
//!
//! Lua tables are 1-indexed, so element access shifts the index by one.
//! There is no ternary operator: `c ? a : b` becomes `((c) and (a) or (b))`,
//! which yields `b` whenever `a` is falsy (`nil` or `false`). That behavior
//! is kept as-is. String contents are emitted unescaped.

use super::{format_number, is_valid_identifier, negation_needs_parens};
use crate::ast::*;
use crate::traits::Writer;

/// Static instance of the Lua writer for registry.
pub static LUA_WRITER: LuaWriterImpl = LuaWriterImpl;

/// Lua writer implementing the Writer trait.
pub struct LuaWriterImpl;

impl Writer for LuaWriterImpl {
    fn language(&self) -> &'static str {
        "lua"
    }

    fn extension(&self) -> &'static str {
        "lua"
    }

    fn write(&self, expr: &Expr) -> String {
        LuaWriter::emit(expr)
    }
}

/// Emits expressions as Lua source code.
#[derive(Default)]
pub struct LuaWriter {
    output: String,
}

impl LuaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an expression to Lua source.
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
                self.output.push_str(binary_op(*op));
                self.output.push(' ');
                self.write_operand(right);
                self.output.push(')');
            }

            Expr::Unary { op, expr } => match op {
                UnaryOp::Not => {
                    self.output.push_str("not ");
                    self.write_operand(expr);
                }
                UnaryOp::Neg if negation_needs_parens(expr) => {
                    self.output.push_str("-(");
                    self.write_expr(expr);
                    self.output.push(')');
                }
                UnaryOp::Neg => {
                    self.output.push('-');
                    self.write_operand(expr);
                }
                UnaryOp::Typeof => {
                    self.output.push_str("type(");
                    self.write_expr(expr);
                    self.output.push(')');
                }
            },

            Expr::Property { object, property: name } | Expr::Member { object, member: name } => {
                self.write_receiver(object);
                self.output.push('.');
                self.output.push_str(name);
            }

            Expr::Index { object, index } => {
                self.write_receiver(object);
                self.output.push_str("[(");
                self.write_expr(index);
                self.output.push_str(" + 1)]");
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

            Expr::Object(entries) => {
                self.output.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    if is_valid_identifier(key) {
                        self.output.push_str(key);
                    } else {
                        self.output.push_str("[\"");
                        self.output.push_str(key);
                        self.output.push_str("\"]");
                    }
                    self.output.push_str(" = ");
                    self.write_expr(value);
                }
                self.output.push('}');
            }

            Expr::Arrow(arrow) => {
                self.output.push_str("function(");
                self.output.push_str(&arrow.params.join(", "));
                self.output.push_str(") ");
                match &arrow.body {
                    ArrowBody::Expr(body) => {
                        self.output.push_str("return ");
                        self.write_expr(body);
                        self.output.push_str("; end");
                    }
                    ArrowBody::Block(text) => {
                        self.output.push_str(text);
                        self.output.push_str(" end");
                    }
                }
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.output.push_str("((");
                self.write_expr(test);
                self.output.push_str(") and (");
                self.write_expr(consequent);
                self.output.push_str(") or (");
                self.write_expr(alternate);
                self.output.push_str("))");
            }

            // `Hello ${name}!` -> "Hello " .. name .. "!"
            Expr::Template(template) => {
                for (part, expr) in template.segments() {
                    self.output.push('"');
                    self.output.push_str(part);
                    self.output.push('"');
                    if let Some(expr) = expr {
                        self.output.push_str(" .. ");
                        self.write_expr(expr);
                        self.output.push_str(" .. ");
                    }
                }
            }
        }
    }

    /// Operand of an operator; a function literal is grouped.
    fn write_operand(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Arrow(_)) {
            self.write_grouped(expr);
        } else {
            self.write_expr(expr);
        }
    }

    /// Callee, or object of `.name` / `[i]`. Lua only allows a prefix
    /// expression here, so literals, constructors and unary forms are grouped.
    fn write_receiver(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(_)
            | Expr::Call { .. }
            | Expr::Property { .. }
            | Expr::Member { .. }
            | Expr::Index { .. }
            | Expr::Binary { .. }
            | Expr::Conditional { .. } => self.write_expr(expr),
            _ => self.write_grouped(expr),
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
            Literal::Null | Literal::Undefined => self.output.push_str("nil"),
        }
    }
}

fn binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Ne => "~=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        other => other.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn lua(src: &str) -> String {
        LuaWriter::emit(&parse(src).unwrap())
    }

    #[test]
    fn test_arrow_expression_body() {
        assert_eq!(lua("x => x * 2"), "function(x) return (x * 2); end");
        assert_eq!(lua("(a, b) => a + b"), "function(a, b) return (a + b); end");
        assert_eq!(lua("() => go()"), "function() return go(); end");
    }

    #[test]
    fn test_arrow_block_body() {
        assert_eq!(
            lua("() => { print('hi') }"),
            "function()  print('hi')  end"
        );
    }

    #[test]
    fn test_arrow_in_call() {
        assert_eq!(
            lua("items.map(x => x * 2)"),
            "items.map(function(x) return (x * 2); end)"
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(lua("a != b"), "(a ~= b)");
        assert_eq!(lua("a == b"), "(a == b)");
        assert_eq!(lua("a && b"), "(a and b)");
        assert_eq!(lua("a || b"), "(a or b)");
        assert_eq!(lua("!a"), "not a");
        assert_eq!(lua("!(a && b)"), "not (a and b)");
        assert_eq!(lua("-x"), "-x");
        assert_eq!(lua("a % b"), "(a % b)");
        assert_eq!(lua("count = count + 1"), "(count = (count + 1))");
    }

    #[test]
    fn test_typeof_uses_type_function() {
        assert_eq!(lua("typeof value"), "type(value)");
    }

    #[test]
    fn test_index_is_shifted() {
        assert_eq!(lua("arr[0]"), "arr[(0 + 1)]");
        assert_eq!(lua("arr[i + 1]"), "arr[((i + 1) + 1)]");
    }

    #[test]
    fn test_ternary_and_or_chain() {
        assert_eq!(lua("a ? b : c"), "((a) and (b) or (c))");
        // `false` as the consequent selects `c`; kept intentionally.
        assert_eq!(lua("a ? false : c"), "((a) and (false) or (c))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(lua("null"), "nil");
        assert_eq!(lua("undefined"), "nil");
        assert_eq!(lua("true"), "true");
        assert_eq!(lua("1.5"), "1.5");
        assert_eq!(lua("'it\\'s'"), "\"it\\'s\"");
    }

    #[test]
    fn test_array_and_object() {
        assert_eq!(lua("[1, 2, 3]"), "{1, 2, 3}");
        assert_eq!(lua("{a: 1, b: x}"), "{a = 1, b = x}");
        assert_eq!(lua("{'data-id': 1}"), "{[\"data-id\"] = 1}");
    }

    #[test]
    fn test_template_concatenation() {
        assert_eq!(lua("`Hello ${name}!`"), "\"Hello \" .. name .. \"!\"");
        assert_eq!(lua("`plain`"), "\"plain\"");
        assert_eq!(lua("`${a}${b}`"), "\"\" .. a .. \"\" .. b .. \"\"");
    }

    #[test]
    fn test_arrow_callee_and_operand_are_grouped() {
        assert_eq!(lua("(x => x * 2)(1)"), "(function(x) return (x * 2); end)(1)");
        assert_eq!(lua("f || (x => x)"), "(f or (function(x) return x; end))");
        assert_eq!(lua("!(() => 1)"), "not (function() return 1; end)");
    }

    #[test]
    fn test_receivers_are_prefix_expressions() {
        assert_eq!(lua("'abc'.len"), "(\"abc\").len");
        assert_eq!(lua("{a: 1}.a"), "({a = 1}).a");
        assert_eq!(lua("[1, 2][0]"), "({1, 2})[(0 + 1)]");
        assert_eq!(lua("(-x).y"), "(-x).y");
        assert_eq!(lua("-x.y"), "-x.y");
        assert_eq!(lua("(a ? f : g)(1)"), "((a) and (f) or (g))(1)");
        assert_eq!(lua("a.b(c)[d]"), "a.b(c)[(d + 1)]");
    }

    #[test]
    fn test_nested_negation_is_not_a_comment() {
        assert_eq!(lua("- -x"), "-(-x)");
        assert_eq!(lua("-(-1)"), "-(-1)");
        assert_eq!(LuaWriter::emit(&Expr::unary(UnaryOp::Neg, Expr::number(-2))), "-(-2)");
        assert_eq!(lua("-!x"), "-not x");
    }

    #[test]
    fn test_member_expr() {
        let expr = Expr::member(Expr::ident("obj"), "field");
        assert_eq!(LuaWriter::emit(&expr), "obj.field");
    }
}
