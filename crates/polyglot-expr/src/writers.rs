//! Lookup of the built-in writers by target, language name, or file
//! extension.

use crate::output::{c, hare, javascript, lua};
use crate::target::Target;
use crate::traits::Writer;

static WRITERS: [&dyn Writer; 4] = [
    &lua::LUA_WRITER,
    &javascript::JAVASCRIPT_WRITER,
    &c::C_WRITER,
    &hare::HARE_WRITER,
];

/// The built-in writer for a target. The C writer runs without an arrow
/// registry.
pub fn writer_for(target: Target) -> &'static dyn Writer {
    match target {
        Target::Lua => &lua::LUA_WRITER,
        Target::JavaScript => &javascript::JAVASCRIPT_WRITER,
        Target::C => &c::C_WRITER,
        Target::Hare => &hare::HARE_WRITER,
    }
}

/// Get a writer by language name.
pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    WRITERS.iter().find(|w| w.language() == lang).copied()
}

/// Get a writer by output file extension.
pub fn writer_for_extension(ext: &str) -> Option<&'static dyn Writer> {
    WRITERS.iter().find(|w| w.extension() == ext).copied()
}

/// All writers, in [`Target::ALL`] order.
pub fn writers() -> &'static [&'static dyn Writer] {
    &WRITERS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn test_writer_lookup() {
        let writer = writer_for_language("lua").expect("lua writer");
        assert_eq!(writer.language(), "lua");
        assert_eq!(writer.extension(), "lua");

        let writer = writer_for_extension("ha").expect("hare writer");
        assert_eq!(writer.language(), "hare");

        assert!(writer_for_language("cobol").is_none());
    }

    #[test]
    fn test_writer_for_target_matches_name() {
        for target in Target::ALL {
            assert_eq!(writer_for(target).language(), target.name());
        }
    }

    #[test]
    fn test_writers_follow_target_order() {
        let names: Vec<&str> = writers().iter().map(|w| w.language()).collect();
        let targets: Vec<&str> = Target::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, targets);
    }

    #[test]
    fn test_lookup_by_name_writes_expression() {
        let writer = writer_for_language("javascript").expect("js writer");
        assert_eq!(writer.write(&Expr::ident("x")), "x");
        assert_eq!(writer_for_extension("js").map(|w| w.language()), Some("javascript"));
    }
}
