//! Parse an expression and print its AST.

use anyhow::Context;

/// Print the AST of `source` as pretty JSON.
pub fn cmd_parse(source: &str) -> anyhow::Result<String> {
    let expr = polyglot_expr::parse(source).with_context(|| format!("failed to parse `{source}`"))?;
    serde_json::to_string_pretty(&expr).context("failed to serialize AST")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prints_json() {
        let out = cmd_parse("f(1)").unwrap();
        assert!(out.contains("\"Call\""));
        assert!(out.contains("\"Ident\": \"f\""));
    }

    #[test]
    fn test_parse_error_has_context() {
        let err = cmd_parse("(a").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("failed to parse `(a`: "), "{message}");
    }
}
