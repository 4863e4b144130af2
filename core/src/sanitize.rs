//! Speech sanitizer for generated narration text
//!
//! Model output routinely carries stage directions like `(Sound of gentle Andean flute)`,
//! markdown emphasis, and ragged whitespace. None of that should be read aloud, so every
//! narration passes through an ordered list of rewrite rules before it leaves the generator.
//!
//! Rule order is significant: each rule assumes the shape produced by the previous one.
//! The pipeline is idempotent, `sanitize(sanitize(x)) == sanitize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// One named, pure rewrite step of the sanitizer pipeline.
pub struct RewriteRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid rewrite pattern"),
            replacement,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement)
            .into_owned()
    }
}

static RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        // A parenthetical on its own line between paragraphs becomes a paragraph break.
        RewriteRule::new("standalone_aside", r"\n\s*\([^)]*\)\s*\n", "\n\n"),
        // Inline asides become one space so the neighbouring words do not collide.
        RewriteRule::new("inline_aside", r"\s*\([^)]*\)\s*", " "),
        RewriteRule::new("emphasis", r"\*", ""),
        RewriteRule::new("blank_line_runs", r"\n(?:\s*\n){2,}", "\n\n"),
        RewriteRule::new("space_runs", r"[\t\p{Zs}]{2,}", " "),
    ]
});

/// The rewrite rules in application order.
pub fn rules() -> &'static [RewriteRule] {
    &RULES
}

/// Turn raw model output into speech-ready text. Total and deterministic.
pub fn sanitize(raw: &str) -> String {
    let rewritten = RULES
        .iter()
        .fold(raw.to_string(), |text, rule| rule.apply(&text));
    rewritten.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static RewriteRule {
        rules()
            .iter()
            .find(|r| r.name == name)
            .expect("rule exists")
    }

    #[test]
    fn rules_run_in_declared_order() {
        let names: Vec<_> = rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "standalone_aside",
                "inline_aside",
                "emphasis",
                "blank_line_runs",
                "space_runs"
            ]
        );
    }

    #[test]
    fn standalone_aside_becomes_paragraph_break() {
        let out = rule("standalone_aside").apply("One.\n\n(Bell tolls)\n\nTwo.");
        assert_eq!(out, "One.\n\nTwo.");
    }

    #[test]
    fn inline_aside_becomes_single_space() {
        let out = rule("inline_aside").apply("Hello (soft wind blowing) world");
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn emphasis_markers_are_dropped() {
        assert_eq!(rule("emphasis").apply("**Bold** and *soft*"), "Bold and soft");
    }

    #[test]
    fn blank_line_runs_collapse_to_one_blank_line() {
        assert_eq!(rule("blank_line_runs").apply("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(rule("blank_line_runs").apply("a\n \n\t\n b"), "a\n\n b");
        assert_eq!(rule("blank_line_runs").apply("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn space_runs_collapse_but_newlines_survive() {
        assert_eq!(rule("space_runs").apply("a   b\t\tc\n\nd"), "a b c\n\nd");
    }
}
