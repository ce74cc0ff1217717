use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading sources or configuring a mutation run.
///
/// Mutators never fail; they abstain on input they cannot handle.
#[derive(Debug, Error)]
pub enum MutateError {
    /// Reading a source or AST file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The AST file is not valid parser output.
    #[error("failed to decode the syntax tree of {}: {source}", path.display())]
    Ast {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The AST decoded, but its root is not a `SourceUnit`.
    #[error("the syntax tree of {} is not rooted at a SourceUnit", path.display())]
    NotSourceUnit { path: PathBuf },
    /// A mutator id in the configuration is not registered.
    #[error("unknown mutator `{0}`")]
    UnknownMutator(String),
    /// Extracting the configuration failed.
    #[error(transparent)]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for MutateError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// The library result.
pub type Result<T, E = MutateError> = std::result::Result<T, E>;
