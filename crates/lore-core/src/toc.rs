//! Table-of-contents construction from a flat heading list.

use crate::{Heading, TocSection};

/// Build the section forest for `headings`.
///
/// Each heading becomes a child of the nearest preceding heading with a
/// strictly smaller level, or a new root when there is none. Pre-order
/// traversal of the result (see [`flatten`]) yields the input order.
///
/// ```rust
/// use lore_core::{build_toc, extract_headings};
///
/// let toc = build_toc(&extract_headings("# A\n## B\n### C\n## D\n# E\n"));
/// assert_eq!(toc.len(), 2);
/// assert_eq!(toc[0].children.len(), 2);
/// assert_eq!(toc[0].children[0].children[0].title, "C");
/// ```
pub fn build_toc(headings: &[Heading]) -> Vec<TocSection> {
    let mut roots: Vec<TocSection> = Vec::new();
    // Path of child indices from a root to the currently open section,
    // paired with each open section's level.
    let mut stack: Vec<(u8, usize)> = Vec::new();

    for heading in headings {
        while stack.last().is_some_and(|&(level, _)| level >= heading.level) {
            stack.pop();
        }

        let section = TocSection {
            id: heading.id.clone(),
            title: heading.text.clone(),
            level: heading.level,
            children: Vec::new(),
            start_position: heading.line,
        };

        let siblings = match stack.split_first() {
            None => &mut roots,
            Some((&(_, root), rest)) => {
                let mut parent = &mut roots[root];
                for &(_, child) in rest {
                    parent = &mut parent.children[child];
                }
                &mut parent.children
            },
        };

        siblings.push(section);
        stack.push((heading.level, siblings.len() - 1));
    }

    roots
}

/// Pre-order traversal of a section forest.
pub fn flatten(sections: &[TocSection]) -> Vec<&TocSection> {
    fn walk<'a>(out: &mut Vec<&'a TocSection>, list: &'a [TocSection]) {
        for section in list {
            out.push(section);
            walk(out, &section.children);
        }
    }

    let mut out = Vec::new();
    walk(&mut out, sections);
    out
}

/// Depth of the deepest branch (0 for an empty forest).
pub fn max_depth(sections: &[TocSection]) -> usize {
    sections
        .iter()
        .map(|s| 1 + max_depth(&s.children))
        .max()
        .unwrap_or(0)
}

/// Find a section by anchor id anywhere in the forest.
pub fn find_section<'a>(sections: &'a [TocSection], id: &str) -> Option<&'a TocSection> {
    flatten(sections).into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn heading(id: &str, level: u8, line: usize) -> Heading {
        Heading {
            id: id.to_string(),
            text: id.to_uppercase(),
            level,
            line,
        }
    }

    #[test]
    fn test_nested_structure() {
        let headings = vec![
            heading("a", 1, 0),
            heading("b", 2, 2),
            heading("c", 3, 4),
            heading("d", 2, 6),
            heading("e", 1, 8),
        ];
        let toc = build_toc(&headings);

        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].id, "a");
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[0].children[0].id, "c");
        assert_eq!(toc[0].children[1].id, "d");
        assert_eq!(toc[1].start_position, 8);
        assert_eq!(max_depth(&toc), 3);
    }

    #[test]
    fn test_document_starting_below_level_one() {
        // A leading h3 becomes a root, and a later h2 is its sibling, not child.
        let headings = vec![heading("x", 3, 0), heading("y", 2, 1), heading("z", 3, 2)];
        let toc = build_toc(&headings);

        assert_eq!(toc.len(), 2);
        assert_eq!(toc[1].id, "y");
        assert_eq!(toc[1].children[0].id, "z");
    }

    #[test]
    fn test_skipped_levels_attach_to_nearest_smaller() {
        let headings = vec![heading("a", 1, 0), heading("b", 4, 1), heading("c", 2, 2)];
        let toc = build_toc(&headings);

        assert_eq!(toc.len(), 1);
        let children: Vec<_> = toc[0].children.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(children, ["b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_toc(&[]).is_empty());
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn test_find_section() {
        let toc = build_toc(&[heading("a", 1, 0), heading("b", 2, 1)]);
        assert_eq!(find_section(&toc, "b").map(|s| s.level), Some(2));
        assert!(find_section(&toc, "missing").is_none());
    }

    proptest! {
        #[test]
        fn prop_preorder_matches_heading_order(levels in prop::collection::vec(1u8..=6, 0..60)) {
            let headings: Vec<Heading> = levels
                .iter()
                .enumerate()
                .map(|(i, &level)| heading(&format!("h{i}"), level, i))
                .collect();

            let toc = build_toc(&headings);
            let order: Vec<&str> = flatten(&toc).iter().map(|s| s.id.as_str()).collect();
            let expected: Vec<&str> = headings.iter().map(|h| h.id.as_str()).collect();
            prop_assert_eq!(order, expected);
        }

        #[test]
        fn prop_children_have_greater_level(levels in prop::collection::vec(1u8..=6, 0..60)) {
            let headings: Vec<Heading> = levels
                .iter()
                .enumerate()
                .map(|(i, &level)| heading(&format!("h{i}"), level, i))
                .collect();

            for section in flatten(&build_toc(&headings)) {
                for child in &section.children {
                    prop_assert!(child.level > section.level);
                }
            }
        }
    }
}
