//! Line-level fenced code tracking shared by the extractors.

/// An open fence: the marker character and run length that must close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: char,
    len: usize,
}

/// Opening fence on `line`, with its info string.
pub(crate) fn open_fence(line: &str) -> Option<(Fence, &str)> {
    let trimmed = strip_indent(line)?;
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len..].trim();
    // Backtick fences may not carry backticks in their info string.
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some((Fence { marker, len }, info))
}

impl Fence {
    /// Whether `line` closes this fence.
    pub(crate) fn is_closed_by(self, line: &str) -> bool {
        let Some(trimmed) = strip_indent(line) else {
            return false;
        };
        let run = trimmed.chars().take_while(|&c| c == self.marker).count();
        run >= self.len && trimmed[run..].trim().is_empty()
    }
}

/// Up to three spaces of indentation are allowed before a fence.
fn strip_indent(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let indent = line.len() - line.trim_start_matches(' ').len();
    (indent <= 3).then(|| &line[indent..])
}

/// Tracks whether successive lines are inside a fenced block.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    /// Feed the next line; returns `true` when the line is fence markup or
    /// fenced content and should be ignored by prose scanners.
    pub(crate) fn is_code(&mut self, line: &str) -> bool {
        match self.open {
            Some(fence) => {
                if fence.is_closed_by(line) {
                    self.open = None;
                }
                true
            },
            None => {
                if let Some((fence, _)) = open_fence(line) {
                    self.open = Some(fence);
                    true
                } else {
                    false
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_fence_with_info() {
        let (fence, info) = open_fence("```typescript title").unwrap();
        assert_eq!(info, "typescript title");
        assert!(fence.is_closed_by("```"));
        assert!(fence.is_closed_by("`````"));
        assert!(!fence.is_closed_by("~~~"));
        assert!(!fence.is_closed_by("``` trailing"));
    }

    #[test]
    fn test_short_runs_are_not_fences() {
        assert!(open_fence("``inline``").is_none());
        assert!(open_fence("    ```").is_none());
    }

    #[test]
    fn test_tracker_marks_fenced_lines() {
        let mut tracker = FenceTracker::default();
        let flags: Vec<bool> = ["intro", "```sh", "# not a heading", "```", "# heading"]
            .iter()
            .map(|line| tracker.is_code(line))
            .collect();
        assert_eq!(flags, vec![false, true, true, true, false]);
    }
}
