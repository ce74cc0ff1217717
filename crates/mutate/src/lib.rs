//! Vulnerability-injecting mutation operators for Solidity.
//!
//! Each [`Mutator`] walks a parsed source file looking for one fault class (reentrancy, unchecked
//! calls, predictable randomness, ...) and proposes [`Mutation`]s: exact byte-range
//! replacements that turn correct code into code exhibiting the fault. The
//! [`MutatorRegistry`] runs a selection of mutators over many files.
//!
//! Parsing happens out of process; sources come paired with the JSON tree produced by
//! `@solidity-parser/parser`, see [`SourceFile`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

pub mod ast;

mod config;
pub use config::MutateConfig;

mod error;
pub use error::{MutateError, Result};

mod mutation;
pub use mutation::Mutation;

pub mod mutator_registry;
pub use mutator_registry::MutatorRegistry;

pub mod mutators;
pub use mutators::{MutationContext, Mutator};

mod source;
pub use source::SourceFile;

pub mod splice;

pub mod version;
pub use version::VersionClass;
