//! A Solidity source file paired with its syntax tree.

use crate::{
    MutateError, Mutation, Result,
    ast::{Node, NodeKind},
    mutators::MutationContext,
    version::VersionClass,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Source text, decoded tree and version class of one file.
///
/// Owns everything a [`MutationContext`] borrows, so the same file can be handed to any number
/// of mutators, in parallel if need be.
#[derive(Clone, Debug)]
pub struct SourceFile {
    path: PathBuf,
    source: String,
    unit: Node,
    version: VersionClass,
}

impl SourceFile {
    /// Pairs `source` with the parser output `ast_json`.
    ///
    /// The parser reports ranges in UTF-16 code units; they are translated to byte offsets into
    /// `source` while decoding. Nesting depth is not limited, so deeply nested expressions decode
    /// as long as the stack holds.
    pub fn from_json(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        ast_json: &str,
    ) -> Result<Self> {
        let path = path.into();
        let source = source.into();
        let unit = decode_tree(&source, ast_json)
            .map_err(|source| MutateError::Ast { path: path.clone(), source })?;
        Self::from_ast(path, source, unit)
    }

    /// Pairs `source` with an already decoded tree, which must be rooted at a `SourceUnit` and
    /// carry byte ranges.
    pub fn from_ast(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
        unit: Node,
    ) -> Result<Self> {
        let path = path.into();
        if !matches!(unit.kind, NodeKind::SourceUnit(_)) {
            return Err(MutateError::NotSourceUnit { path });
        }
        let source = source.into();
        let version = VersionClass::detect(&unit, &source);
        Ok(Self { path, source, unit, version })
    }

    /// Reads `path` and the parser output stored next to it, see [`Self::ast_path`].
    pub fn load(path: &Path, ast_extension: &str) -> Result<Self> {
        let read = |path: &Path| {
            std::fs::read_to_string(path)
                .map_err(|source| MutateError::Io { path: path.to_path_buf(), source })
        };
        let source = read(path)?;
        let ast_json = read(&Self::ast_path(path, ast_extension))?;
        let file = Self::from_json(path, source, &ast_json)?;
        debug!(path = %path.display(), version = ?file.version, "loaded source");
        Ok(file)
    }

    /// Where the parser output of `path` is expected: `Token.sol` -> `Token.ast.json`.
    pub fn ast_path(path: &Path, ast_extension: &str) -> PathBuf {
        path.with_extension(ast_extension)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn unit(&self) -> &Node {
        &self.unit
    }

    pub fn version(&self) -> VersionClass {
        self.version
    }

    /// The context mutators run against.
    pub fn context(&self, seed: Option<u64>) -> MutationContext<'_> {
        MutationContext {
            path: &self.path,
            source: &self.source,
            unit: &self.unit,
            version: self.version,
            seed,
        }
    }

    /// Name of the innermost function or modifier enclosing `mutation`, if any.
    pub fn enclosing_function(&self, mutation: &Mutation) -> Option<&str> {
        let target = mutation.span();
        self.unit
            .pre_order()
            .filter(|node| node.span().is_some_and(|span| span.contains_span(target)))
            .filter_map(|node| match &node.kind {
                NodeKind::FunctionDefinition(func) => Some(func.display_name()),
                NodeKind::ModifierDefinition(modifier) => Some(modifier.name.as_str()),
                _ => None,
            })
            .last()
    }
}

fn decode_tree(source: &str, ast_json: &str) -> serde_json::Result<Node> {
    let mut de = serde_json::Deserializer::from_str(ast_json);
    de.disable_recursion_limit();
    if source.is_ascii() {
        let unit = Node::deserialize(&mut de)?;
        de.end()?;
        return Ok(unit);
    }

    let mut tree = Value::deserialize(&mut de)?;
    de.end()?;
    Utf16Offsets::new(source).translate(&mut tree);
    serde_json::from_value(tree)
}

/// Byte offset of every UTF-16 code unit of a source, plus one past the end.
struct Utf16Offsets(Vec<usize>);

impl Utf16Offsets {
    fn new(source: &str) -> Self {
        let mut offsets = Vec::with_capacity(source.len() + 1);
        for (offset, ch) in source.char_indices() {
            offsets.extend(std::iter::repeat_n(offset, ch.len_utf16()));
        }
        offsets.push(source.len());
        Self(offsets)
    }

    /// Inclusive byte range of an inclusive `[lo, end]` code unit range.
    fn range(&self, range: &Value) -> Option<[usize; 2]> {
        let [lo, end] = range.as_array()?.as_slice() else { return None };
        let unit = |index: &Value| usize::try_from(index.as_u64()?).ok();
        let lo = *self.0.get(unit(lo)?)?;
        let hi = *self.0.get(unit(end)?.checked_add(1)?)?;
        Some([lo, hi.checked_sub(1)?])
    }

    /// Rewrites every `range` in `tree`. Ranges falling outside the source are dropped.
    fn translate(&self, tree: &mut Value) {
        match tree {
            Value::Object(node) => {
                for (key, value) in node.iter_mut() {
                    if key == "range" {
                        let range = self.range(value);
                        *value = range.map_or(Value::Null, |[lo, end]| json!([lo, end]));
                    } else if key != "loc" {
                        self.translate(value);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|item| self.translate(item)),
            _ => {}
        }
    }
}
