//! Free-identifier analysis for arrow functions.
//!
//! Used by the C writer to decide which outer variables a generated
//! function needs in its context struct.

use crate::ast::{Arrow, ArrowBody, Expr};
use std::collections::HashSet;

/// Whether a capture list is known to be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// Expression body: every referenced identifier was seen.
    Complete,
    /// Block body: the raw text is never parsed, so captures are unknown
    /// and the (empty) list must not be read as "captures nothing".
    OpaqueBlock,
}

/// Identifiers an arrow body uses that are not its own parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    pub names: Vec<String>,
    pub analysis: Analysis,
}

impl Captures {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Every identifier referenced in `expr`, deduplicated in first-appearance
/// order.
///
/// Property and member names are not identifiers. Nested arrow functions
/// are not entered: their free variables belong to their own scope.
pub fn collect_identifiers(expr: &Expr) -> Vec<String> {
    let mut collector = Collector::default();
    collector.visit(expr);
    collector.names
}

/// Capture set of an arrow function node, or `None` if `expr` is not one.
pub fn arrow_captures(expr: &Expr) -> Option<Captures> {
    match expr {
        Expr::Arrow(arrow) => Some(captures_of(arrow)),
        _ => None,
    }
}

/// Capture set of an arrow function.
pub fn captures_of(arrow: &Arrow) -> Captures {
    match &arrow.body {
        ArrowBody::Expr(body) => {
            let names = collect_identifiers(body)
                .into_iter()
                .filter(|name| !arrow.params.contains(name))
                .collect();
            Captures {
                names,
                analysis: Analysis::Complete,
            }
        }
        ArrowBody::Block(_) => Captures {
            names: Vec::new(),
            analysis: Analysis::OpaqueBlock,
        },
    }
}

#[derive(Default)]
struct Collector {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl Collector {
    fn add(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    fn visit(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Ident(name) => self.add(name),
            Expr::Binary { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            Expr::Unary { expr, .. } => self.visit(expr),
            Expr::Property { object, .. } | Expr::Member { object, .. } => self.visit(object),
            Expr::Index { object, index } => {
                self.visit(object);
                self.visit(index);
            }
            Expr::Call { callee, args } => {
                self.visit(callee);
                for arg in args {
                    self.visit(arg);
                }
            }
            Expr::Array(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Expr::Object(entries) => {
                for (_, value) in entries {
                    self.visit(value);
                }
            }
            Expr::Arrow(_) => {}
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.visit(test);
                self.visit(consequent);
                self.visit(alternate);
            }
            Expr::Template(template) => {
                for expr in template.expressions() {
                    self.visit(expr);
                }
            }
        }
    }
}
