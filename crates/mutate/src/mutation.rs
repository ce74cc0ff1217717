use crate::ast::Span;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A single proposed source edit: replace `[start_offset, end_offset)` of `file` with
/// `mutated_text`.
///
/// Records are immutable once created. `original_text` always equals the source slice at the
/// recorded offsets; an empty original is an insertion point.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    file: PathBuf,
    start_offset: usize,
    end_offset: usize,
    start_line: usize,
    end_line: usize,
    #[serde(rename = "originalText")]
    original: String,
    #[serde(rename = "mutatedText")]
    mutated: String,
    operator_id: String,
}

impl Mutation {
    pub(crate) fn new(
        file: &Path,
        span: Span,
        (start_line, end_line): (usize, usize),
        original: &str,
        mutated: String,
        operator_id: &str,
    ) -> Self {
        Self {
            file: file.to_path_buf(),
            start_offset: span.lo,
            end_offset: span.hi,
            start_line,
            end_line,
            original: original.to_string(),
            mutated,
            operator_id: operator_id.to_string(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_offset, self.end_offset)
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// First and last affected line, 1-based.
    pub fn lines(&self) -> (usize, usize) {
        (self.start_line, self.end_line)
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn mutated(&self) -> &str {
        &self.mutated
    }

    pub fn operator_id(&self) -> &str {
        &self.operator_id
    }

    pub fn is_insertion(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Materializes the mutant.
    ///
    /// Returns `None` if `source` no longer holds the original text at the recorded offsets.
    pub fn apply(&self, source: &str) -> Option<String> {
        if source.get(self.start_offset..self.end_offset)? != self.original {
            return None;
        }
        let mut out = String::with_capacity(source.len() + self.mutated.len());
        out.push_str(&source[..self.start_offset]);
        out.push_str(&self.mutated);
        out.push_str(&source[self.end_offset..]);
        Some(out)
    }

    /// Path relative to the usual project source directories, or the file name.
    pub fn relative_path(&self) -> String {
        let path = self.file.display().to_string();
        for prefix in ["src/", "contracts/", "test/", "lib/"] {
            if let Some(idx) = path.find(prefix) {
                return path[idx..].to_string();
            }
        }
        self.file.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string()
    }

    /// Returns the mutation as a two-line diff.
    ///
    /// ```text
    /// - original_code
    /// + mutated_code
    /// ```
    pub fn format_diff(&self) -> String {
        let original = if self.is_insertion() { "<insert>" } else { self.original.trim() };
        format!("- {original}\n+ {}", self.mutated.trim())
    }

    /// One-line description, collapsing multi-line text.
    pub fn short_description(&self) -> String {
        let original =
            if self.is_insertion() { "<insert>".to_string() } else { one_line(&self.original) };
        format!("`{original}` -> `{}`", one_line(&self.mutated))
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().join(" ")
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}:{}: {}",
            self.operator_id,
            self.relative_path(),
            self.start_line,
            self.short_description()
        )
    }
}
