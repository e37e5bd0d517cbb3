//! Declared-tag normalization and heuristic language detection.

use regex::Regex;
use std::sync::LazyLock;

/// Language used when nothing was declared and nothing was detected.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Canonical languages and the fence tags that map onto them.
const KNOWN_TAGS: &[(&str, &[&str])] = &[
    ("typescript", &["typescript", "ts", "tsx"]),
    ("javascript", &["javascript", "js", "jsx", "mjs", "cjs"]),
    ("html", &["html", "htm", "xml", "svg", "vue"]),
    ("css", &["css"]),
    ("scss", &["scss", "sass"]),
    ("json", &["json", "jsonc", "json5"]),
    ("shell", &["shell", "sh", "bash", "zsh", "console", "shellscript"]),
    ("yaml", &["yaml", "yml"]),
    ("markdown", &["markdown", "md"]),
    ("rust", &["rust", "rs"]),
    ("python", &["python", "py"]),
    ("text", &["text", "txt", "plaintext", "plain"]),
];

/// Map a fence tag to its canonical language if it is recognized.
///
/// ```rust
/// use lore_core::code_block::normalize_tag;
///
/// assert_eq!(normalize_tag("TS"), Some("typescript"));
/// assert_eq!(normalize_tag("bash"), Some("shell"));
/// assert_eq!(normalize_tag("brainfuck"), None);
/// ```
pub fn normalize_tag(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_ascii_lowercase();
    KNOWN_TAGS
        .iter()
        .find(|(_, aliases)| aliases.contains(&tag.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TYPE_ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b\w+\??\s*:\s*(string|number|boolean|any|void|unknown|never)\b",
        r"|\binterface\s+[A-Z]\w*",
        r"|\btype\s+[A-Z]\w*\s*=",
        r"|\)\s*:\s*[A-Z]\w*(<[^>]*>)?\s*\{",
        r"|\bimplements\s+[A-Z]",
        r"|\b(private|public|protected|readonly)\s+\w+\s*[:;=]",
    ))
    .unwrap()
});

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(function|const|let|var)\s+[\w$]+|=>").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<([a-zA-Z][\w-]*)(\s[^<>]*)?>.*?</[a-zA-Z][\w-]*>|<[a-zA-Z][\w-]*(\s[^<>]*)?/>")
        .unwrap()
});

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^{}]+\{[^{}]*?[\w-]+\s*:\s*[^;{}]+;").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static STYLE_VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[a-zA-Z][\w-]*").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static QUOTED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]+"\s*:"#).unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static SHELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(\$\s+)?(npm|npx|yarn|pnpm|cargo|pip3?|brew|apt(-get)?|ng)\s+\w").unwrap()
});

/// Guess a language from code content.
///
/// Checks run in a fixed order and the first hit wins: type annotations,
/// script declarations, markup, stylesheets, data interchange, shell.
pub fn detect_language(code: &str) -> Option<&'static str> {
    let trimmed = code.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    if TYPE_ANNOTATION_RE.is_match(code) {
        return Some("typescript");
    }
    if SCRIPT_RE.is_match(code) {
        return Some("javascript");
    }
    if MARKUP_RE.is_match(code) {
        return Some("html");
    }
    if STYLE_RE.is_match(code) {
        return Some(if STYLE_VARIABLE_RE.is_match(code) {
            "scss"
        } else {
            "css"
        });
    }
    if (trimmed.starts_with('{') || trimmed.starts_with('[')) && QUOTED_KEY_RE.is_match(code) {
        return Some("json");
    }
    if trimmed.starts_with("#!") || SHELL_RE.is_match(code) {
        return Some("shell");
    }

    None
}

/// Outcome of resolving a block's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    pub language: String,
    /// Present when content heuristics produced the answer.
    pub detected: Option<String>,
}

/// Resolve the language for a block with an optional declared fence tag.
///
/// A recognized tag wins outright. Otherwise heuristics run over the code and
/// the declared tag (or [`FALLBACK_LANGUAGE`]) is the last resort.
pub fn resolve_language(declared: Option<&str>, code: &str) -> ResolvedLanguage {
    let declared = declared.map(str::trim).filter(|tag| !tag.is_empty());

    if let Some(canonical) = declared.and_then(normalize_tag) {
        return ResolvedLanguage {
            language: canonical.to_string(),
            detected: None,
        };
    }

    match detect_language(code) {
        Some(detected) => ResolvedLanguage {
            language: detected.to_string(),
            detected: Some(detected.to_string()),
        },
        None => ResolvedLanguage {
            language: declared.map_or_else(|| FALLBACK_LANGUAGE.to_string(), str::to_ascii_lowercase),
            detected: None,
        },
    }
}
