//! Expression tree shared by the parser and every writer.
//!
//! The tree is strictly owned: each node owns its children through `Box` or
//! `Vec`, nothing is shared, and dropping the root releases the whole tree
//! children-first.

use serde::{Deserialize, Serialize};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// String contents as written between the quotes, escapes not decoded.
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

/// Binary operators, including assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Assign,
}

impl BinaryOp {
    /// Operator as spelled in the source grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Assign => "=",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Typeof,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    /// `x => x * 2`
    Expr(Box<Expr>),
    /// `x => { ... }`: raw text between the braces, never parsed.
    Block(String),
}

/// An arrow function `(params) => body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub params: Vec<String>,
    pub body: ArrowBody,
}

impl Arrow {
    pub fn is_expression_body(&self) -> bool {
        matches!(self.body, ArrowBody::Expr(_))
    }
}

/// A backtick template string.
///
/// Always holds exactly one more literal part than it holds expressions, so
/// `` `a${x}b` `` is parts `["a", "b"]` with expressions `[x]` and a template
/// without interpolation is a single part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateParts")]
pub struct Template {
    parts: Vec<String>,
    expressions: Vec<Expr>,
}

/// Unchecked serialized form of [`Template`].
#[derive(Deserialize)]
struct TemplateParts {
    parts: Vec<String>,
    expressions: Vec<Expr>,
}

impl TryFrom<TemplateParts> for Template {
    type Error = String;

    fn try_from(raw: TemplateParts) -> Result<Self, Self::Error> {
        Template::from_parts(raw.parts, raw.expressions).ok_or_else(|| {
            "template must have exactly one more literal part than expressions".to_string()
        })
    }
}

impl Template {
    /// Template with no interpolation.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            expressions: Vec::new(),
        }
    }

    /// Build from parts and expressions, or `None` if the counts don't line up.
    pub fn from_parts(parts: Vec<String>, expressions: Vec<Expr>) -> Option<Self> {
        (parts.len() == expressions.len() + 1).then_some(Self { parts, expressions })
    }

    /// Append an interpolation followed by the literal text after it.
    pub fn push(&mut self, expr: Expr, next_part: impl Into<String>) {
        self.expressions.push(expr);
        self.parts.push(next_part.into());
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn expressions(&self) -> &[Expr] {
        &self.expressions
    }

    /// Literal parts interleaved with the expression that follows each one.
    /// The final part is paired with `None`.
    pub fn segments(&self) -> impl Iterator<Item = (&str, Option<&Expr>)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| (part.as_str(), self.expressions.get(i)))
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),

    Ident(String),

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },

    /// `object.property`
    Property {
        object: Box<Expr>,
        property: String,
    },

    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    Array(Vec<Expr>),

    /// Key/value pairs in source order. Keys may repeat.
    Object(Vec<(String, Expr)>),

    Arrow(Arrow),

    /// `object.member` built by callers; the parser only produces
    /// [`Expr::Property`].
    Member {
        object: Box<Expr>,
        member: String,
    },

    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    Template(Template),
}

impl Expr {
    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    pub fn number(n: impl Into<f64>) -> Self {
        Expr::Literal(Literal::Number(n.into()))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn undefined() -> Self {
        Expr::Literal(Literal::Undefined)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn property(object: Expr, property: impl Into<String>) -> Self {
        Expr::Property {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn member(object: Expr, member: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            member: member.into(),
        }
    }

    pub fn index(object: Expr, index: Expr) -> Self {
        Expr::Index {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn array(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }

    pub fn object(entries: Vec<(String, Expr)>) -> Self {
        Expr::Object(entries)
    }

    pub fn arrow(params: Vec<String>, body: Expr) -> Self {
        Expr::Arrow(Arrow {
            params,
            body: ArrowBody::Expr(Box::new(body)),
        })
    }

    pub fn arrow_block(params: Vec<String>, block: impl Into<String>) -> Self {
        Expr::Arrow(Arrow {
            params,
            body: ArrowBody::Block(block.into()),
        })
    }

    pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Self {
        Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }

    pub fn template(template: Template) -> Self {
        Expr::Template(template)
    }
}
