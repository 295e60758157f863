//! Recursive-descent parser for the expression grammar.
//!
//! Precedence, lowest first:
//!
//! ```text
//! conditional   a ? b : c            (right-associative)
//! assignment    a = b                (right-associative)
//! logical or    ||
//! logical and   &&
//! equality      == !=
//! comparison    < > <= >=
//! additive      + -
//! multiplicative * / %
//! unary         ! - typeof
//! postfix       .name  [expr]  (args)  => body
//! primary
//! ```
//!
//! Whitespace between tokens is skipped; whitespace inside string and
//! template literals is kept. Arrow parameter lists are recognised by
//! speculative scanning from a saved cursor position, restored on failure.

use crate::ast::{Arrow, ArrowBody, BinaryOp, Expr, Template, UnaryOp};
use crate::traits::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parse an expression source string into an AST.
///
/// The whole input must form a single expression; anything left over is
/// reported as [`ParseError::TrailingInput`].
pub fn parse(source: &str) -> ParseResult<Expr> {
    tracing::trace!(len = source.len(), "parsing expression");
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser::new(source);
    let expr = parser.parse_expression()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(ParseError::TrailingInput { offset: parser.pos });
    }
    Ok(expr)
}

/// Saved cursor position for backtracking.
#[derive(Debug, Clone, Copy)]
struct Checkpoint(usize);

/// Recursion bound for nested sub-expressions (parens, brackets, unary
/// operators, arrow bodies, template slots).
const MAX_NESTING: usize = 32;

/// Bound on the depth of the tree being built, counting each link of a
/// binary or postfix chain as one level.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    nesting: usize,
    depth: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            nesting: 0,
            depth: 0,
        }
    }

    /// Run `f` one nesting level down. Errors abort the whole parse, so the
    /// counters are only restored on success.
    fn nested<T>(&mut self, f: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::TooDeep { offset: self.pos });
        }
        self.nesting += 1;
        self.deepen()?;
        let result = f(self)?;
        self.nesting -= 1;
        self.depth -= 1;
        Ok(result)
    }

    fn deepen(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { offset: self.pos });
        }
        self.depth += 1;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cursor primitives
    // ------------------------------------------------------------------

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    /// Next non-whitespace byte, leaving the cursor on it.
    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        self.skip_ws();
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume `=>` if it comes next.
    fn eat_arrow(&mut self) -> bool {
        self.eat_str("=>")
    }

    /// Consume a keyword only when it is not the prefix of a longer identifier.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = &self.bytes[self.pos..];
        if rest.starts_with(keyword.as_bytes())
            && !rest.get(keyword.len()).is_some_and(|&b| is_ident_char(b))
        {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: u8, what: &'static str, context: &'static str) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: what,
                context,
                offset: self.pos,
            })
        }
    }

    /// Read an identifier at the cursor (no whitespace skipping).
    fn ident_raw(&mut self) -> &'a str {
        let start = self.pos;
        if self.bytes.get(self.pos).is_some_and(|&b| is_ident_start(b)) {
            while self.bytes.get(self.pos).is_some_and(|&b| is_ident_char(b)) {
                self.pos += 1;
            }
        }
        &self.src[start..self.pos]
    }

    fn unexpected(&mut self) -> ParseError {
        self.skip_ws();
        match self.src[self.pos..].chars().next() {
            Some(found) => ParseError::UnexpectedChar {
                found,
                offset: self.pos,
            },
            None => ParseError::UnexpectedEnd { offset: self.pos },
        }
    }

    // ------------------------------------------------------------------
    // Precedence levels
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let test = self.parse_assignment()?;
        if !self.eat(b'?') {
            return Ok(test);
        }

        let consequent = self.parse_expression()?;
        self.expect(b':', "':'", "in ternary expression")?;
        let alternate = self.nested(Self::parse_conditional)?;
        Ok(Expr::conditional(test, consequent, alternate))
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let left = self.parse_logical_or()?;
        if self.peek() == Some(b'=') && !matches!(self.peek_at(1), Some(b'=' | b'>')) {
            self.pos += 1;
            let right = self.nested(Self::parse_assignment)?;
            return Ok(Expr::binary(left, BinaryOp::Assign, right));
        }
        Ok(left)
    }

    /// A left-associative run of `operand (op operand)*`.
    fn binary_chain(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expr>,
        operator: fn(&mut Self) -> Option<BinaryOp>,
    ) -> ParseResult<Expr> {
        let base = self.depth;
        let mut left = operand(self)?;
        while let Some(op) = operator(self) {
            self.deepen()?;
            let right = operand(self)?;
            left = Expr::binary(left, op, right);
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_logical_and, |p| {
            p.eat_str("||").then_some(BinaryOp::Or)
        })
    }

    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_equality, |p| {
            p.eat_str("&&").then_some(BinaryOp::And)
        })
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_comparison, |p| {
            if p.eat_str("==") {
                Some(BinaryOp::Eq)
            } else if p.eat_str("!=") {
                Some(BinaryOp::Ne)
            } else {
                None
            }
        })
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_additive, |p| {
            if p.eat_str("<=") {
                Some(BinaryOp::Le)
            } else if p.eat_str(">=") {
                Some(BinaryOp::Ge)
            } else if p.eat(b'<') {
                Some(BinaryOp::Lt)
            } else if p.eat(b'>') {
                Some(BinaryOp::Gt)
            } else {
                None
            }
        })
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_multiplicative, |p| {
            if p.eat(b'+') {
                Some(BinaryOp::Add)
            } else if p.eat(b'-') {
                Some(BinaryOp::Sub)
            } else {
                None
            }
        })
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        self.binary_chain(Self::parse_unary, |p| {
            if p.eat(b'*') {
                Some(BinaryOp::Mul)
            } else if p.eat(b'/') {
                Some(BinaryOp::Div)
            } else if p.eat(b'%') {
                Some(BinaryOp::Mod)
            } else {
                None
            }
        })
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = if self.eat(b'!') {
            UnaryOp::Not
        } else if self.eat(b'-') {
            UnaryOp::Neg
        } else if self.eat_keyword("typeof") {
            UnaryOp::Typeof
        } else {
            return self.parse_postfix();
        };
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::unary(op, operand))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let base = self.depth;
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_ws();
            let before = self.checkpoint();
            if matches!(self.peek(), Some(b'.' | b'[' | b'(')) {
                self.deepen()?;
            }
            if self.eat(b'.') {
                self.skip_ws();
                let name = self.ident_raw();
                if name.is_empty() {
                    return Err(ParseError::Expected {
                        expected: "property name",
                        context: "after '.'",
                        offset: self.pos,
                    });
                }
                // `.name =>` is not a property access; leave it unconsumed.
                let after_name = self.checkpoint();
                if self.eat_arrow() {
                    self.restore(before);
                    break;
                }
                self.restore(after_name);
                expr = Expr::property(expr, name);
            } else if self.eat(b'[') {
                let index = self.parse_expression()?;
                self.expect(b']', "']'", "after array index")?;
                expr = Expr::index(expr, index);
            } else if self.eat(b'(') {
                let args = self.parse_list(b')', "',' or ')'", "in argument list")?;
                expr = Expr::call(expr, args);
            } else if self.eat_arrow() {
                let Expr::Ident(param) = expr else {
                    return Err(ParseError::InvalidArrowParam { offset: before.0 });
                };
                let body = self.parse_arrow_body()?;
                expr = Expr::Arrow(Arrow {
                    params: vec![param],
                    body,
                });
            } else {
                break;
            }
        }
        self.depth = base;
        Ok(expr)
    }

    // ------------------------------------------------------------------
    // Primary forms
    // ------------------------------------------------------------------

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(ch) = self.peek() else {
            return Err(ParseError::UnexpectedEnd { offset: self.pos });
        };

        match ch {
            b'"' | b'\'' => {
                let text = self.scan_quoted(ch)?;
                Ok(Expr::string(text))
            }
            b'`' => self.parse_template(),
            b'0'..=b'9' => self.parse_number(),
            b'.' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => self.parse_number(),
            b'[' => {
                self.pos += 1;
                let items = self.parse_list(b']', "',' or ']'", "in array literal")?;
                Ok(Expr::Array(items))
            }
            b'{' => {
                self.pos += 1;
                self.parse_object()
            }
            b'(' => {
                self.pos += 1;
                self.parse_paren_or_arrow()
            }
            _ => {
                if self.eat_keyword("true") {
                    Ok(Expr::bool(true))
                } else if self.eat_keyword("false") {
                    Ok(Expr::bool(false))
                } else if self.eat_keyword("null") {
                    Ok(Expr::null())
                } else if self.eat_keyword("undefined") {
                    Ok(Expr::undefined())
                } else if is_ident_start(ch) {
                    Ok(Expr::ident(self.ident_raw()))
                } else {
                    Err(self.unexpected())
                }
            }
        }
    }

    /// Scan a quoted string at the cursor and return its raw contents.
    /// A backslash skips the following character; nothing is decoded.
    fn scan_quoted(&mut self, quote: u8) -> ParseResult<&'a str> {
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.bytes.get(self.pos) {
                None => return Err(ParseError::UnterminatedString { offset: open }),
                Some(b'\\') => self.pos = (self.pos + 2).min(self.bytes.len()),
                Some(&b) if b == quote => break,
                Some(_) => self.pos += 1,
            }
        }
        let text = &self.src[start..self.pos];
        self.pos += 1;
        Ok(text)
    }

    fn parse_number(&mut self) -> ParseResult<Expr> {
        let start = self.pos;
        while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_at(0) == Some(b'.') {
            self.pos += 1;
            while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        match self.src[start..self.pos].parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Expr::number(value)),
            _ => Err(ParseError::InvalidNumber { offset: start }),
        }
    }

    /// Comma-separated expressions up to `close`; the opener is already consumed.
    fn parse_list(
        &mut self,
        close: u8,
        expected: &'static str,
        context: &'static str,
    ) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.eat(close) {
            items.push(self.parse_expression()?);
            if !self.eat(b',') && self.peek() != Some(close) {
                return Err(ParseError::Expected {
                    expected,
                    context,
                    offset: self.pos,
                });
            }
        }
        Ok(items)
    }

    fn parse_object(&mut self) -> ParseResult<Expr> {
        let mut entries = Vec::new();
        while !self.eat(b'}') {
            let key = match self.peek() {
                Some(q @ (b'"' | b'\'')) => self.scan_quoted(q)?,
                _ => {
                    let key = self.ident_raw();
                    if key.is_empty() {
                        return Err(ParseError::Expected {
                            expected: "object key",
                            context: "in object literal",
                            offset: self.pos,
                        });
                    }
                    key
                }
            };
            self.expect(b':', "':'", "after object key")?;
            let value = self.parse_expression()?;
            entries.push((key.to_string(), value));

            if !self.eat(b',') && self.peek() != Some(b'}') {
                return Err(ParseError::Expected {
                    expected: "',' or '}'",
                    context: "in object literal",
                    offset: self.pos,
                });
            }
        }
        Ok(Expr::Object(entries))
    }

    /// After `(`: an arrow parameter list if one follows, else a grouping.
    fn parse_paren_or_arrow(&mut self) -> ParseResult<Expr> {
        let after_open = self.checkpoint();

        if self.eat(b')') {
            if self.eat_arrow() {
                let body = self.parse_arrow_body()?;
                return Ok(Expr::Arrow(Arrow {
                    params: Vec::new(),
                    body,
                }));
            }
            self.restore(after_open);
        }

        if self.scan_param_list() {
            let params = self.collect_params(after_open);
            let body = self.parse_arrow_body()?;
            return Ok(Expr::Arrow(Arrow { params, body }));
        }
        self.restore(after_open);

        let inner = self.parse_expression()?;
        self.expect(b')', "')'", "after expression")?;
        Ok(inner)
    }

    /// Check for `ident, ident, ...) =>` without allocating. On success the
    /// cursor is left after `=>`; on failure its position is unspecified and
    /// the caller restores it.
    fn scan_param_list(&mut self) -> bool {
        loop {
            if self.eat(b')') {
                return self.eat_arrow();
            }
            self.skip_ws();
            if self.ident_raw().is_empty() {
                return false;
            }
            if !self.eat(b',') && self.peek() != Some(b')') {
                return false;
            }
        }
    }

    /// Re-read a parameter list that [`Self::scan_param_list`] accepted,
    /// leaving the cursor after `=>`.
    fn collect_params(&mut self, after_open: Checkpoint) -> Vec<String> {
        self.restore(after_open);
        let mut params = Vec::new();
        while !self.eat(b')') {
            self.skip_ws();
            params.push(self.ident_raw().to_string());
            self.eat(b',');
        }
        self.eat_arrow();
        params
    }

    fn parse_arrow_body(&mut self) -> ParseResult<ArrowBody> {
        if self.peek() != Some(b'{') {
            return Ok(ArrowBody::Expr(Box::new(self.parse_expression()?)));
        }

        let open = self.pos;
        self.pos += 1;
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let text = &self.src[start..self.pos];
                        self.pos += 1;
                        return Ok(ArrowBody::Block(text.to_string()));
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(ParseError::UnterminatedBlock { offset: open })
    }

    fn parse_template(&mut self) -> ParseResult<Expr> {
        let open = self.pos;
        self.pos += 1;
        let mut lit_start = self.pos;
        let mut parts = Vec::new();
        let mut expressions = Vec::new();

        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'`' => {
                    parts.push(self.src[lit_start..self.pos].to_string());
                    self.pos += 1;
                    let template = Template::from_parts(parts, expressions)
                        .ok_or(ParseError::UnterminatedTemplate { offset: open })?;
                    return Ok(Expr::Template(template));
                }
                b'$' if self.peek_at(1) == Some(b'{') => {
                    parts.push(self.src[lit_start..self.pos].to_string());
                    self.pos += 2;
                    expressions.push(self.parse_expression()?);
                    self.expect(b'}', "'}'", "after template expression")?;
                    lit_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::UnterminatedTemplate { offset: open })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::ident(name)
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("42").unwrap(), Expr::number(42));
        assert_eq!(parse("3.25").unwrap(), Expr::number(3.25));
        assert_eq!(parse(".5").unwrap(), Expr::number(0.5));
        assert_eq!(parse("'hi'").unwrap(), Expr::string("hi"));
        assert_eq!(parse("\"a b\"").unwrap(), Expr::string("a b"));
        assert_eq!(parse("true").unwrap(), Expr::bool(true));
        assert_eq!(parse("false").unwrap(), Expr::bool(false));
        assert_eq!(parse("null").unwrap(), Expr::null());
        assert_eq!(parse("undefined").unwrap(), Expr::undefined());
    }

    #[test]
    fn test_string_escapes_are_kept_raw() {
        assert_eq!(parse(r#""say \"hi\"""#).unwrap(), Expr::string(r#"say \"hi\""#));
        assert_eq!(parse(r"'it\'s'").unwrap(), Expr::string(r"it\'s"));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(parse("trueValue").unwrap(), ident("trueValue"));
        assert_eq!(parse("nullable").unwrap(), ident("nullable"));
        assert_eq!(parse("typeofx").unwrap(), ident("typeofx"));
    }

    #[test]
    fn test_precedence() {
        let expr = parse("a + b * c").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                ident("a"),
                BinaryOp::Add,
                Expr::binary(ident("b"), BinaryOp::Mul, ident("c"))
            )
        );

        let expr = parse("a || b && c == d").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                ident("a"),
                BinaryOp::Or,
                Expr::binary(
                    ident("b"),
                    BinaryOp::And,
                    Expr::binary(ident("c"), BinaryOp::Eq, ident("d"))
                )
            )
        );
    }

    #[test]
    fn test_left_associative_arithmetic() {
        let expr = parse("a - b - c").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                Expr::binary(ident("a"), BinaryOp::Sub, ident("b")),
                BinaryOp::Sub,
                ident("c")
            )
        );
    }

    #[test]
    fn test_comparison_operators() {
        for (src, op) in [
            ("a < b", BinaryOp::Lt),
            ("a > b", BinaryOp::Gt),
            ("a <= b", BinaryOp::Le),
            ("a >= b", BinaryOp::Ge),
            ("a != b", BinaryOp::Ne),
            ("a % b", BinaryOp::Mod),
        ] {
            assert_eq!(parse(src).unwrap(), Expr::binary(ident("a"), op, ident("b")), "{src}");
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = parse("a = b = 1").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                ident("a"),
                BinaryOp::Assign,
                Expr::binary(ident("b"), BinaryOp::Assign, Expr::number(1))
            )
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(parse("!a").unwrap(), Expr::unary(UnaryOp::Not, ident("a")));
        assert_eq!(parse("-a").unwrap(), Expr::unary(UnaryOp::Neg, ident("a")));
        assert_eq!(
            parse("typeof a").unwrap(),
            Expr::unary(UnaryOp::Typeof, ident("a"))
        );
        assert_eq!(
            parse("!!a").unwrap(),
            Expr::unary(UnaryOp::Not, Expr::unary(UnaryOp::Not, ident("a")))
        );
    }

    #[test]
    fn test_postfix_chain() {
        let expr = parse("a.b[0](x, y).c").unwrap();
        assert_eq!(
            expr,
            Expr::property(
                Expr::call(
                    Expr::index(Expr::property(ident("a"), "b"), Expr::number(0)),
                    vec![ident("x"), ident("y")]
                ),
                "c"
            )
        );
    }

    #[test]
    fn test_ternary_right_associative() {
        let expr = parse("a ? b : c ? d : e").unwrap();
        assert_eq!(
            expr,
            Expr::conditional(
                ident("a"),
                ident("b"),
                Expr::conditional(ident("c"), ident("d"), ident("e"))
            )
        );
    }

    #[test]
    fn test_array_and_object() {
        assert_eq!(
            parse("[1, 2, 3]").unwrap(),
            Expr::array(vec![Expr::number(1), Expr::number(2), Expr::number(3)])
        );
        assert_eq!(parse("[]").unwrap(), Expr::array(vec![]));
        assert_eq!(
            parse("{a: 1, 'b-c': x, a: 2}").unwrap(),
            Expr::object(vec![
                ("a".into(), Expr::number(1)),
                ("b-c".into(), ident("x")),
                ("a".into(), Expr::number(2)),
            ])
        );
    }

    #[test]
    fn test_single_param_arrow() {
        assert_eq!(
            parse("x => x * 2").unwrap(),
            Expr::arrow(
                vec!["x".into()],
                Expr::binary(ident("x"), BinaryOp::Mul, Expr::number(2))
            )
        );
    }

    #[test]
    fn test_zero_and_multi_param_arrows() {
        assert_eq!(
            parse("() => go()").unwrap(),
            Expr::arrow(vec![], Expr::call(ident("go"), vec![]))
        );
        assert_eq!(
            parse("(a, b) => a + b").unwrap(),
            Expr::arrow(
                vec!["a".into(), "b".into()],
                Expr::binary(ident("a"), BinaryOp::Add, ident("b"))
            )
        );
        assert_eq!(
            parse("( a ,b )=>a").unwrap(),
            Expr::arrow(vec!["a".into(), "b".into()], ident("a"))
        );
    }

    #[test]
    fn test_paren_falls_back_to_grouping() {
        assert_eq!(
            parse("(a + b) * c").unwrap(),
            Expr::binary(
                Expr::binary(ident("a"), BinaryOp::Add, ident("b")),
                BinaryOp::Mul,
                ident("c")
            )
        );
        // Looks like a parameter list until the missing `=>`.
        assert_eq!(parse("(a, b)").unwrap_err().offset(), Some(2));
        assert_eq!(parse("(a)").unwrap(), ident("a"));
    }

    #[test]
    fn test_block_body_is_raw_text() {
        assert_eq!(
            parse("() => { count = count + 1; if (x) { y(); } }").unwrap(),
            Expr::arrow_block(vec![], " count = count + 1; if (x) { y(); } ")
        );
        assert_eq!(
            parse("e => {}").unwrap(),
            Expr::arrow_block(vec!["e".into()], "")
        );
    }

    #[test]
    fn test_arrow_inside_call() {
        assert_eq!(
            parse("items.map(x => x * 2)").unwrap(),
            Expr::call(
                Expr::property(ident("items"), "map"),
                vec![Expr::arrow(
                    vec!["x".into()],
                    Expr::binary(ident("x"), BinaryOp::Mul, Expr::number(2))
                )]
            )
        );
    }

    #[test]
    fn test_template() {
        let Expr::Template(t) = parse("`Hello ${name}, you are ${age + 1}!`").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &["Hello ", ", you are ", "!"]);
        assert_eq!(t.expressions().len(), 2);
        assert_eq!(t.expressions()[0], ident("name"));

        let Expr::Template(t) = parse("`plain`").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &["plain"]);
        assert!(t.expressions().is_empty());

        let Expr::Template(t) = parse("``").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &[""]);
    }

    #[test]
    fn test_template_escaped_backtick() {
        let Expr::Template(t) = parse(r"`a\`b`").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &[r"a\`b"]);
    }

    #[test]
    fn test_nested_template() {
        let Expr::Template(t) = parse("`a${`b${c}`}d`").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &["a", "d"]);
        assert!(matches!(t.expressions()[0], Expr::Template(_)));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("a +"), Err(ParseError::UnexpectedEnd { offset: 3 }));
        assert_eq!(
            parse("'abc"),
            Err(ParseError::UnterminatedString { offset: 0 })
        );
        assert_eq!(
            parse("`abc ${x}"),
            Err(ParseError::UnterminatedTemplate { offset: 0 })
        );
        assert!(matches!(
            parse("`a ${x`"),
            Err(ParseError::Expected { expected: "'}'", .. })
        ));
        assert!(matches!(
            parse("a ? b"),
            Err(ParseError::Expected { expected: "':'", .. })
        ));
        assert!(matches!(
            parse("a[0"),
            Err(ParseError::Expected { expected: "']'", .. })
        ));
        assert!(matches!(
            parse("f(a, b"),
            Err(ParseError::Expected { expected: "',' or ')'", .. })
        ));
        assert!(matches!(
            parse("[1, 2"),
            Err(ParseError::Expected { expected: "',' or ']'", .. })
        ));
        assert!(matches!(
            parse("{a: 1"),
            Err(ParseError::Expected { expected: "',' or '}'", .. })
        ));
        assert!(matches!(
            parse("{a 1}"),
            Err(ParseError::Expected { expected: "':'", .. })
        ));
        assert_eq!(
            parse("a.b => 1"),
            Err(ParseError::TrailingInput { offset: 1 })
        );
        assert_eq!(
            parse("f(x) => 1"),
            Err(ParseError::InvalidArrowParam { offset: 5 })
        );
        assert_eq!(
            parse("() => { x"),
            Err(ParseError::UnterminatedBlock { offset: 6 })
        );
        assert_eq!(
            parse("a # b"),
            Err(ParseError::TrailingInput { offset: 2 })
        );
        assert_eq!(
            parse("#"),
            Err(ParseError::UnexpectedChar { found: '#', offset: 0 })
        );
        assert!(matches!(
            parse("a."),
            Err(ParseError::Expected { expected: "property name", .. })
        ));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = parse("a ? b").unwrap_err();
        assert_eq!(err.to_string(), "expected ':' in ternary expression at offset 5");
        let err = parse("'abc").unwrap_err();
        assert_eq!(err.to_string(), "unterminated string literal starting at offset 0");
    }

    #[test]
    fn test_overflowing_number_is_rejected() {
        assert_eq!(
            parse(&"9".repeat(400)),
            Err(ParseError::InvalidNumber { offset: 0 })
        );
        assert_eq!(
            parse(&format!("x + {}", "1".repeat(310))),
            Err(ParseError::InvalidNumber { offset: 4 })
        );
        assert_eq!(parse("1e0"), Err(ParseError::TrailingInput { offset: 1 }));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let nested = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(parse(&nested), Err(ParseError::TooDeep { .. })));

        let unary = format!("{}x", "!-".repeat(500));
        assert!(matches!(parse(&unary), Err(ParseError::TooDeep { .. })));

        let arrays = format!("{}{}", "[".repeat(300), "]".repeat(300));
        assert!(matches!(parse(&arrays), Err(ParseError::TooDeep { .. })));

        let arrows = format!("{}1", "x => ".repeat(300));
        assert!(matches!(parse(&arrows), Err(ParseError::TooDeep { .. })));

        let err = parse(&nested).unwrap_err();
        assert!(err.to_string().starts_with("expression nested too deeply at offset "));
    }

    #[test]
    fn test_long_chains_are_bounded() {
        let sum = vec!["a"; 100].join(" + ");
        assert!(parse(&sum).is_ok());
        let sum = vec!["a"; 1000].join(" + ");
        assert!(matches!(parse(&sum), Err(ParseError::TooDeep { .. })));

        let calls = format!("f{}", "()".repeat(1000));
        assert!(matches!(parse(&calls), Err(ParseError::TooDeep { .. })));
        let props = format!("a{}", ".b".repeat(100));
        assert!(parse(&props).is_ok());
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let nested = format!("{}x{}", "(".repeat(25), ")".repeat(25));
        assert_eq!(parse(&nested).unwrap(), ident("x"));
        let negations = format!("{}x", "-".repeat(25));
        assert!(parse(&negations).is_ok());
    }

    #[test]
    fn test_utf8_in_strings_and_templates() {
        assert_eq!(parse("'héllo'").unwrap(), Expr::string("héllo"));
        let Expr::Template(t) = parse("`ünï ${x} ç`").unwrap() else {
            panic!("expected template");
        };
        assert_eq!(t.parts(), &["ünï ", " ç"]);
    }
}
