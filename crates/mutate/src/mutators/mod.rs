pub mod arithmetic_duplication_mutator;
pub mod delegatecall_mutator;
pub mod external_call_mutator;
pub mod injection_mutator;
pub mod input_mutator;
pub mod integer_overflow_mutator;
pub mod locking_ether_mutator;
pub mod randomness_mutator;
pub mod reentrancy_mutator;
pub mod timestamp_mutator;
pub mod unchecked_call_mutator;
pub mod unused_return_mutator;

use crate::{
    Mutation,
    ast::{Node, Span},
    splice,
    version::VersionClass,
};
use std::path::Path;

pub trait Mutator: Send + Sync {
    /// Short stable identifier stamped on every record, e.g. `RE`.
    fn id(&self) -> &'static str;

    /// Human-readable name, e.g. `reentrancy`.
    fn name(&self) -> &'static str;

    /// Generate all mutations of a given file
    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation>;

    /// Cheap pre-filter; false means `generate_mutants` would find nothing
    fn is_applicable(&self, _ctxt: &MutationContext<'_>) -> bool {
        true
    }
}

/// Everything a mutator sees about one source file.
#[derive(Clone, Copy, Debug)]
pub struct MutationContext<'a> {
    pub path: &'a Path,
    /// The raw source text all offsets refer to
    pub source: &'a str,
    /// The `SourceUnit` root
    pub unit: &'a Node,
    pub version: VersionClass,
    /// Seed for mutators drawing random values
    pub seed: Option<u64>,
}

impl<'a> MutationContext<'a> {
    pub fn builder() -> MutationContextBuilder<'a> {
        MutationContextBuilder::new()
    }

    /// Source text of `node`.
    pub fn text(&self, node: &Node) -> Option<&'a str> {
        node.text(self.source)
    }

    pub fn span_text(&self, span: Span) -> Option<&'a str> {
        self.source.get(span.lo..span.hi)
    }

    /// A record replacing `node` with `mutated`.
    pub fn replace(
        &self,
        node: &Node,
        mutated: impl Into<String>,
        operator_id: &str,
    ) -> Option<Mutation> {
        let (Some(span), Some(lines)) = (node.span(), node.lines()) else {
            trace!(operator_id, "skipping node without positional metadata");
            return None;
        };
        self.replace_span(span, lines, mutated, operator_id)
    }

    pub fn replace_span(
        &self,
        span: Span,
        lines: (usize, usize),
        mutated: impl Into<String>,
        operator_id: &str,
    ) -> Option<Mutation> {
        splice::splice(self.path, self.source, span, lines, mutated.into(), operator_id)
    }

    /// An insertion record at `offset`.
    pub fn insert(
        &self,
        offset: usize,
        line: usize,
        text: impl Into<String>,
        operator_id: &str,
    ) -> Option<Mutation> {
        self.replace_span(Span::new(offset, offset), (line, line), text, operator_id)
    }

    /// An insertion record right after the opening brace of `block`.
    pub fn insert_into_block(
        &self,
        block: &Node,
        text: impl Into<String>,
        operator_id: &str,
    ) -> Option<Mutation> {
        let (span, (line, _)) = (block.span()?, block.lines()?);
        if !self.span_text(span)?.starts_with('{') {
            return None;
        }
        self.insert(span.lo + 1, line, text, operator_id)
    }
}

pub struct MutationContextBuilder<'a> {
    path: Option<&'a Path>,
    source: Option<&'a str>,
    unit: Option<&'a Node>,
    version: Option<VersionClass>,
    seed: Option<u64>,
}

impl<'a> MutationContextBuilder<'a> {
    // Create a new empty builder
    pub fn new() -> Self {
        MutationContextBuilder { path: None, source: None, unit: None, version: None, seed: None }
    }

    // Required
    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    // Required
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    // Required
    pub fn with_unit(mut self, unit: &'a Node) -> Self {
        self.unit = Some(unit);
        self
    }

    // Optional, detected from the pragma when absent
    pub fn with_version(mut self, version: VersionClass) -> Self {
        self.version = Some(version);
        self
    }

    // Optional
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<MutationContext<'a>, &'static str> {
        let path = self.path.ok_or("Path is required for MutationContext")?;
        let source = self.source.ok_or("Source is required for MutationContext")?;
        let unit = self.unit.ok_or("Syntax tree is required for MutationContext")?;
        let version = self.version.unwrap_or_else(|| VersionClass::detect(unit, source));

        Ok(MutationContext { path, source, unit, version, seed: self.seed })
    }
}

impl Default for MutationContextBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
