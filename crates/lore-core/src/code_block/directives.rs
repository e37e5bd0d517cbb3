//! Inline directive comments at the top of a code sample.
//!
//! ```text
//! // Title: Counter with signals
//! // File: counter.component.ts
//! // Tags: signals, state
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Only this many leading lines are inspected for directives.
const DIRECTIVE_WINDOW: usize = 3;

/// Upper bound on lines expanded from a single `Highlight:` range.
const MAX_HIGHLIGHT_SPAN: usize = 1_000;

const GENERIC_TITLES: &[&str] = &[
    "code example",
    "example",
    "example code",
    "snippet",
    "code snippet",
    "code",
    "sample",
    "sample code",
    "untitled",
];

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?://+|#+|--|/\*+|<!--)\s*",
        r"(title|file|filename|category|tags|highlight|line-?numbers)\s*:\s*",
        r"(.*?)\s*(?:\*/|-->)?\s*$",
    ))
    .unwrap()
});

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?://+|#+|--|/\*+|<!--)\s*(.*?)\s*(?:\*/|-->)?\s*$").unwrap()
});

/// Values collected from directive comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub title: Option<String>,
    pub file_name: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub highlight_lines: Option<Vec<usize>>,
    pub show_line_numbers: Option<bool>,
}

/// Parse directives from the first lines of `code`.
///
/// Returns the directives and the code with directive lines removed.
pub fn parse_directives(code: &str) -> (Directives, String) {
    let mut directives = Directives::default();
    let mut kept: Vec<&str> = Vec::new();

    for (idx, line) in code.lines().enumerate() {
        if idx < DIRECTIVE_WINDOW && apply_directive(line, &mut directives) {
            continue;
        }
        kept.push(line);
    }

    let remaining = kept.join("\n");
    let remaining = remaining.trim_start_matches('\n').trim_end().to_string();
    (directives, remaining)
}

fn apply_directive(line: &str, directives: &mut Directives) -> bool {
    // Shebangs look like `#` comments but are never directives.
    if line.trim_start().starts_with("#!") {
        return false;
    }
    let Some(caps) = DIRECTIVE_RE.captures(line) else {
        return false;
    };
    let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
        return false;
    };
    let value = value.as_str().trim();
    if value.is_empty() {
        return false;
    }

    match key.as_str().to_ascii_lowercase().as_str() {
        "title" => directives.title = Some(value.to_string()),
        "file" | "filename" => directives.file_name = Some(value.to_string()),
        "category" => directives.category = Some(value.to_string()),
        "tags" => {
            let tags: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if !tags.is_empty() {
                directives.tags = Some(tags);
            }
        },
        "highlight" => directives.highlight_lines = Some(parse_line_list(value)),
        _ => match parse_flag(value) {
            Some(flag) => directives.show_line_numbers = Some(flag),
            None => return false,
        },
    }
    true
}

/// Parse `1,3-5` into `[1, 3, 4, 5]`. Malformed parts are skipped.
pub fn parse_line_list(value: &str) -> Vec<usize> {
    let mut lines = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                if let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                {
                    if start <= end && end - start < MAX_HIGHLIGHT_SPAN {
                        lines.extend(start..=end);
                    }
                }
            },
            None => {
                if let Ok(line) = part.parse::<usize>() {
                    lines.push(line);
                }
            },
        }
    }
    lines.sort_unstable();
    lines.dedup();
    lines
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Whether a title is boilerplate that says nothing about the sample.
pub fn is_generic_title(title: &str) -> bool {
    let normalized = title
        .trim()
        .trim_end_matches([':', '.'])
        .to_ascii_lowercase();
    normalized.is_empty() || GENERIC_TITLES.contains(&normalized.as_str())
}

/// Title inferred from a leading comment line, if it reads like one.
pub fn infer_title(code: &str) -> Option<String> {
    let first = code.lines().find(|line| !line.trim().is_empty())?;
    if first.trim_start().starts_with("#!") {
        return None;
    }
    let text = COMMENT_RE.captures(first)?.get(1)?.as_str().trim();
    let len = text.chars().count();
    ((3..=80).contains(&len) && !is_generic_title(text)).then(|| text.to_string())
}

/// Final title for a block.
///
/// An explicit non-generic title wins. A generic one falls back to the file
/// name, then `Example (<language>)`. With no title at all, the first comment
/// line is tried before that same fallback.
pub fn resolve_title(directives: &Directives, code: &str, language: &str) -> String {
    let fallback = || {
        directives
            .file_name
            .clone()
            .unwrap_or_else(|| format!("Example ({language})"))
    };

    match directives.title.as_deref() {
        Some(title) if !is_generic_title(title) => title.to_string(),
        Some(_) => fallback(),
        None => infer_title(code).unwrap_or_else(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_directives() {
        let code = "// Title: Counter\n// File: counter.ts\n// Tags: signals, state\nconst x = 1;";
        let (d, rest) = parse_directives(code);
        assert_eq!(d.title.as_deref(), Some("Counter"));
        assert_eq!(d.file_name.as_deref(), Some("counter.ts"));
        assert_eq!(
            d.tags,
            Some(vec!["signals".to_string(), "state".to_string()])
        );
        assert_eq!(rest, "const x = 1;");
    }

    #[test]
    fn test_block_comment_and_html_comment_styles() {
        let (d, _) = parse_directives("/* Category: forms */\n<!-- Title: Login form -->\nx");
        assert_eq!(d.category.as_deref(), Some("forms"));
        assert_eq!(d.title.as_deref(), Some("Login form"));
    }

    #[test]
    fn test_directives_beyond_window_are_code() {
        let code = "a\nb\nc\n// Title: Late";
        let (d, rest) = parse_directives(code);
        assert!(d.title.is_none());
        assert_eq!(rest, code);
    }

    #[test]
    fn test_highlight_and_line_number_overrides() {
        let (d, _) = parse_directives("# highlight: 1, 3-5, x\n# LineNumbers: false\necho");
        assert_eq!(d.highlight_lines, Some(vec![1, 3, 4, 5]));
        assert_eq!(d.show_line_numbers, Some(false));
    }

    #[test]
    fn test_shebang_is_not_a_directive() {
        let (d, rest) = parse_directives("#!/bin/bash\n# Title: Setup script\nnpm ci");
        assert_eq!(d.title.as_deref(), Some("Setup script"));
        assert_eq!(rest, "#!/bin/bash\nnpm ci");
    }

    #[test]
    fn test_generic_titles() {
        assert!(is_generic_title("Code Example"));
        assert!(is_generic_title("snippet:"));
        assert!(!is_generic_title("Signal-based counter"));
    }

    #[test]
    fn test_title_resolution() {
        let mut d = Directives {
            title: Some("Example".into()),
            file_name: Some("app.ts".into()),
            ..Directives::default()
        };
        assert_eq!(resolve_title(&d, "", "typescript"), "app.ts");

        d.file_name = None;
        assert_eq!(resolve_title(&d, "", "typescript"), "Example (typescript)");

        d.title = None;
        assert_eq!(
            resolve_title(&d, "// Wire up the router\nconst r = 1;", "javascript"),
            "Wire up the router"
        );
        assert_eq!(resolve_title(&d, "const r = 1;", "javascript"), "Example (javascript)");
        assert_eq!(resolve_title(&d, "// snippet\nx", "text"), "Example (text)");
    }

    #[test]
    fn test_comment_title_beats_file_name() {
        // Given: a file directive followed by a descriptive comment
        let (d, rest) = parse_directives("// File: app.ts\n// Bootstrap the application\nbootstrap();");
        assert_eq!(d.file_name.as_deref(), Some("app.ts"));

        // Then: the comment names the block, the file name is only a fallback
        assert_eq!(resolve_title(&d, &rest, "typescript"), "Bootstrap the application");
        assert_eq!(resolve_title(&d, "bootstrap();", "typescript"), "app.ts");
    }
}
