//! Removal of rendering artifacts from raw fenced code.

use regex::Regex;
use std::sync::LazyLock;

/// Lines that are nothing but a run of three or more digits (leaked line
/// numbers from copy/paste of rendered pages).
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d{3,}\s*$").unwrap());

/// Badge and copy-button markup injected by the page renderer.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static INJECTED_MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)<span[^>]*class="[^"]*\bbadge\b[^"]*"[^>]*>.*?</span>"#,
        r#"|<button[^>]*class="[^"]*\bcopy[\w-]*"[^>]*>.*?</button>"#,
        r"|<!--\s*(?:badge|annotation)\b.*?-->",
        r"|\[!badge[^\]]*\]",
    ))
    .unwrap()
});

const MAX_BLANK_RUN: usize = 2;

/// Clean raw fenced text.
///
/// Drops digit-only lines and injected badge markup, collapses runs of three
/// or more blank lines to two, and trims surrounding blank lines and trailing
/// whitespace. Leading indentation of the first code line is preserved.
pub fn clean_code(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0;

    for line in raw.lines() {
        if DIGIT_RUN_RE.is_match(line) {
            continue;
        }

        let had_markup = INJECTED_MARKUP_RE.is_match(line);
        let line = INJECTED_MARKUP_RE.replace_all(line, "");
        let line = line.trim_end();
        if had_markup && line.trim().is_empty() {
            // Line existed only to carry the badge.
            continue;
        }

        if line.is_empty() {
            blank_run += 1;
            if blank_run > MAX_BLANK_RUN {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line.to_string());
    }

    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_runs_are_dropped() {
        let cleaned = clean_code("const a = 1;\n123\n  4567 \nconst b = 22;\n42");
        assert_eq!(cleaned, "const a = 1;\nconst b = 22;\n42");
    }

    #[test]
    fn test_badge_markup_is_dropped() {
        let raw = "<span class=\"code-badge\">TS</span>\nlet x = 1; [!badge new]\n";
        assert_eq!(clean_code(raw), "let x = 1;");
    }

    #[test]
    fn test_blank_runs_collapse_to_two() {
        let cleaned = clean_code("a\n\n\n\n\nb\n\nc");
        assert_eq!(cleaned, "a\n\n\nb\n\nc");
    }

    #[test]
    fn test_outer_blank_lines_trimmed_but_indent_kept() {
        let cleaned = clean_code("\n\n    indented()\n  \n");
        assert_eq!(cleaned, "    indented()");
    }

    #[test]
    fn test_annotation_comments_are_dropped() {
        let raw = "let y = 2; <!-- annotation: hover for types -->\n<!-- badge new -->";
        assert_eq!(clean_code(raw), "let y = 2;");
    }

    #[test]
    fn test_ordinary_html_comments_survive() {
        let raw = "<!-- keep me -->\n<div></div>";
        assert_eq!(clean_code(raw), raw);
    }
}
