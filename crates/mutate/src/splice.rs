//! Text-level helpers shared by the mutators: record creation from spans, delimiter repair,
//! terminator handling and multi-edit rewrites inside a region.

use crate::{Mutation, ast::Span};
use std::path::Path;

/// Builds a record replacing `span` of `source` with `mutated`.
///
/// Returns `None` when the span does not fall on character boundaries inside the source, so a
/// record's original text always equals the source slice at its offsets, or when the
/// replacement would leave the text unchanged.
pub(crate) fn splice(
    path: &Path,
    source: &str,
    span: Span,
    lines: (usize, usize),
    mutated: String,
    operator_id: &str,
) -> Option<Mutation> {
    if span.lo > span.hi {
        return None;
    }
    let original = source.get(span.lo..span.hi)?;
    if original == mutated {
        return None;
    }
    Some(Mutation::new(path, span, lines, original, mutated, operator_id))
}

/// Removes a statement's trailing `;` (and surrounding whitespace).
pub fn strip_terminator(text: &str) -> &str {
    let text = text.trim_end();
    text.strip_suffix(';').unwrap_or(text).trim_end()
}

/// Shrinks a statement span so it excludes a trailing `;`.
pub fn without_terminator(source: &str, span: Span) -> Option<Span> {
    let text = source.get(span.lo..span.hi)?;
    Some(Span::new(span.lo, span.lo + strip_terminator(text).len()))
}

/// Repairs parenthesis balance: a `)` with no open partner is dropped and any `(` left open at
/// the end is closed.
pub fn balance_parens(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => continue,
            ')' => depth -= 1,
            _ => {}
        }
        out.push(c);
    }
    out.extend(std::iter::repeat_n(')', depth));
    out
}

/// Rewrites the `region` of `source`, replacing each edit span with its text.
///
/// Edits must be non-overlapping and lie within the region; they may be given in any order.
pub fn rewrite(source: &str, region: Span, edits: &[(Span, &str)]) -> Option<String> {
    if region.lo > region.hi {
        return None;
    }
    let mut edits = edits.to_vec();
    edits.sort_by_key(|(span, _)| *span);

    let mut out = String::with_capacity(region.len());
    let mut cursor = region.lo;
    for (span, text) in edits {
        if span.lo < cursor || span.lo > span.hi || !region.contains_span(span) {
            return None;
        }
        out.push_str(source.get(cursor..span.lo)?);
        out.push_str(text);
        cursor = span.hi;
    }
    out.push_str(source.get(cursor..region.hi)?);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balances_parentheses() {
        assert_eq!(balance_parens("(a + (b * c)"), "(a + (b * c))");
        assert_eq!(balance_parens("a + b)"), "a + b");
        assert_eq!(balance_parens("f(a))(b"), "f(a)(b)");
        assert_eq!(balance_parens("(a + b)"), "(a + b)");
    }

    #[test]
    fn strips_terminators() {
        assert_eq!(strip_terminator("x = 1;  "), "x = 1");
        assert_eq!(strip_terminator("x = 1 ;"), "x = 1");
        assert_eq!(strip_terminator("x = 1"), "x = 1");

        let source = "    return a;\n";
        assert_eq!(without_terminator(source, Span::new(4, 13)), Some(Span::new(4, 12)));
    }

    #[test]
    fn rewrites_within_region() {
        let source = "a.delegatecall(x); b.delegatecall(y);";
        let out = rewrite(
            source,
            Span::new(0, source.len()),
            &[(Span::new(19, 20), "delegate"), (Span::new(0, 1), "delegate")],
        );
        assert_eq!(out.as_deref(), Some("delegate.delegatecall(x); delegate.delegatecall(y);"));
    }

    #[test]
    fn rejects_overlapping_edits() {
        let source = "abcdef";
        let edits = [(Span::new(0, 3), "x"), (Span::new(2, 4), "y")];
        assert_eq!(rewrite(source, Span::new(0, 6), &edits), None);
    }

    #[test]
    fn rejects_inverted_spans() {
        let source = "abcdef";
        assert_eq!(Span::new(4, 2).len(), 0);
        assert_eq!(rewrite(source, Span::new(4, 2), &[]), None);
        assert_eq!(rewrite(source, Span::new(0, 6), &[(Span::new(3, 1), "x")]), None);
    }

    #[test]
    fn refuses_spans_outside_source() {
        let path = Path::new("A.sol");
        assert!(splice(path, "abc", Span::new(1, 9), (1, 1), String::new(), "X").is_none());
        assert!(splice(path, "abc", Span::new(1, 2), (1, 1), "b".into(), "X").is_none());
        let record = splice(path, "abc", Span::new(1, 2), (1, 1), "z".into(), "X").unwrap();
        assert_eq!(record.original(), "b");
    }
}
