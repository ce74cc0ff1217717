//! Language-version gate.
//!
//! Mutators whose rewrite depends on checked arithmetic pick their strategy from the file's
//! declared compiler version, computed once per file.

use crate::ast::{Node, NodeKind};
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// First release with checked arithmetic by default and `unchecked` blocks stable for all the
/// rewrites we emit.
pub const MODERN_THRESHOLD: Version = Version::new(0, 8, 18);

static PRAGMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pragma\s+solidity\s+([^;]+);").unwrap());

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VersionClass {
    /// Declared version strictly below [`MODERN_THRESHOLD`].
    Legacy,
    /// Declared version at or above [`MODERN_THRESHOLD`], or no recognizable declaration.
    #[default]
    Modern,
}

impl VersionClass {
    /// Classifies a file from its `pragma solidity` directive.
    ///
    /// The parsed directive is preferred; the raw source text is scanned when the tree carries
    /// none.
    pub fn detect(unit: &Node, source: &str) -> Self {
        let version = pragma_value(unit)
            .and_then(first_version)
            .or_else(|| PRAGMA_RE.captures(source).and_then(|c| first_version(c.get(1)?.as_str())));
        match version {
            Some(version) if version < MODERN_THRESHOLD => Self::Legacy,
            _ => Self::Modern,
        }
    }

    pub fn is_legacy(self) -> bool {
        self == Self::Legacy
    }
}

fn pragma_value(unit: &Node) -> Option<&str> {
    let NodeKind::SourceUnit(unit) = &unit.kind else { return None };
    unit.children.iter().find_map(|child| match &child.kind {
        NodeKind::PragmaDirective(pragma) if pragma.name == "solidity" => {
            Some(pragma.value.as_str())
        }
        _ => None,
    })
}

/// The first `major[.minor[.patch]]` in a version constraint, missing components read as zero.
pub fn first_version(constraint: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(constraint)?;
    let component = |i| caps.get(i).map_or(Some(0), |m| m.as_str().parse::<u64>().ok());
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}
