//! Output writers - emit expression trees as source code.
//!
//! Shared conventions across targets: numbers use the shortest decimal form
//! that round-trips, binary expressions are always parenthesized, and
//! anything a target cannot express becomes an inline `/* ... */` marker.

pub mod c;
pub mod hare;
pub mod javascript;
pub mod lua;

pub use c::{C_WRITER, CWriter, CWriterImpl};
pub use hare::{HARE_WRITER, HareWriter, HareWriterImpl};
pub use javascript::{JAVASCRIPT_WRITER, JavaScriptWriter, JavaScriptWriterImpl};
pub use lua::{LUA_WRITER, LuaWriter, LuaWriterImpl};

use crate::ast::{Expr, Literal, UnaryOp};

/// `-` before an operand whose own text starts with `-` would read as `--`.
pub(crate) fn negation_needs_parens(operand: &Expr) -> bool {
    match operand {
        Expr::Unary {
            op: UnaryOp::Neg, ..
        } => true,
        Expr::Literal(Literal::Number(n)) => n.is_sign_negative(),
        _ => false,
    }
}

/// Text safe to place inside a `/* ... */` comment.
pub(crate) fn comment_safe(s: &str) -> String {
    s.replace("*/", "* /")
}

/// Shortest decimal form that parses back to the same `f64`.
pub(crate) fn format_number(n: f64) -> String {
    format!("{n}")
}

/// Escape for a double-quoted C or Hare string literal.
pub(crate) fn escape_c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' && first != '$' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
