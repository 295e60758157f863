//! Show which outer variables an arrow function captures.

use anyhow::{Context, bail};
use polyglot_expr::{Analysis, arrow_captures, parse};

/// One captured name per line.
pub fn cmd_captures(source: &str) -> anyhow::Result<String> {
    let expr = parse(source).with_context(|| format!("failed to parse `{source}`"))?;
    let Some(captures) = arrow_captures(&expr) else {
        bail!("`{source}` is not an arrow function");
    };
    match captures.analysis {
        Analysis::Complete => Ok(captures.names.join("\n")),
        Analysis::OpaqueBlock => Ok("/* block body: captures not analyzed */".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_captures_in_order() {
        assert_eq!(
            cmd_captures("() => deleteHabit(habit, index)").unwrap(),
            "deleteHabit\nhabit\nindex"
        );
    }

    #[test]
    fn test_rejects_non_arrow() {
        let err = cmd_captures("a + b").unwrap_err();
        assert_eq!(err.to_string(), "`a + b` is not an arrow function");
    }

    #[test]
    fn test_block_body_is_reported() {
        assert_eq!(
            cmd_captures("() => { x = 1; }").unwrap(),
            "/* block body: captures not analyzed */"
        );
    }
}
