//! String and numeric helpers shared across modules.

/// Truncate to at most `max_bytes` without splitting a UTF-8 sequence.
///
/// ```
/// use lore_core::utils::safe_truncate;
///
/// let text = "Hello 世界";
/// assert_eq!(safe_truncate(text, 5), "Hello");
/// assert_eq!(safe_truncate(text, 8), "Hello "); // 世 is three bytes
/// ```
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    &s[..floor_char_boundary(s, max_bytes)]
}

/// Largest char boundary `<= pos`.
pub fn floor_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    (0..=pos).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Smallest char boundary `>= pos`.
pub fn ceil_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    (pos..=s.len())
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(s.len())
}

/// Slice of `content` spanning `radius` bytes either side of
/// `start..start + len`, widened outward to char boundaries.
pub fn context_window(content: &str, start: usize, len: usize, radius: usize) -> &str {
    let from = floor_char_boundary(content, start.saturating_sub(radius));
    let to = ceil_char_boundary(content, start.saturating_add(len).saturating_add(radius));
    &content[from..to]
}

/// 1-based line and column (in chars) of byte `offset`.
pub fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = floor_char_boundary(content, offset);
    let before = &content[..offset];
    let line = memchr::memchr_iter(b'\n', before.as_bytes()).count() + 1;
    let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
