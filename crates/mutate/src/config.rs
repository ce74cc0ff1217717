//! Configuration of a mutation run.
//!
//! Values are layered: built-in defaults, then `mutate.toml` in the project root, then
//! `FORGE_MUTATE_*` environment variables. Command-line flags are applied on top by the caller.

use crate::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutateConfig {
    /// Mutator ids to run. Empty means every registered mutator.
    pub mutators: Vec<String>,
    /// Mutator ids to leave out, applied after `mutators`.
    pub skip_mutators: Vec<String>,
    /// Seed for mutators that draw random values. Unset draws from OS entropy.
    pub seed: Option<u64>,
    /// Extension of the parser output stored next to each source, `Token.sol` pairing with
    /// `Token.ast.json` by default.
    pub ast_extension: String,
}

impl Default for MutateConfig {
    fn default() -> Self {
        Self {
            mutators: Vec::new(),
            skip_mutators: Vec::new(),
            seed: None,
            ast_extension: "ast.json".to_string(),
        }
    }
}

impl MutateConfig {
    /// File name of the project-level configuration.
    pub const FILE_NAME: &'static str = "mutate.toml";

    /// Prefix of the environment variables overriding the file.
    pub const ENV_PREFIX: &'static str = "FORGE_MUTATE_";

    /// The layered providers for a project rooted at `root`.
    pub fn figment(root: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(root.join(Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Loads the configuration for a project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let config: Self = Self::figment(root).extract()?;
        trace!(?config, root = %root.display(), "loaded mutate config");
        Ok(config)
    }

    /// Whether the mutator `id` is selected by the allow and deny lists.
    pub fn is_enabled(&self, id: &str) -> bool {
        let listed = |ids: &[String]| ids.iter().any(|other| other.eq_ignore_ascii_case(id));
        (self.mutators.is_empty() || listed(&self.mutators)) && !listed(&self.skip_mutators)
    }

    /// All ids named in either list.
    pub fn named_mutators(&self) -> impl Iterator<Item = &str> {
        self.mutators.iter().chain(&self.skip_mutators).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let config: MutateConfig = MutateConfig::figment(jail.directory()).extract()?;
            assert_eq!(config, MutateConfig::default());
            assert!(config.is_enabled("RE"));
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                MutateConfig::FILE_NAME,
                r#"
                mutators = ["RE", "TD", "UC"]
                skip_mutators = ["td"]
                seed = 3
                "#,
            )?;
            jail.set_env("FORGE_MUTATE_SEED", "42");

            let config: MutateConfig = MutateConfig::figment(jail.directory()).extract()?;
            assert_eq!(config.seed, Some(42));
            assert_eq!(config.ast_extension, "ast.json");
            assert!(config.is_enabled("RE"));
            assert!(config.is_enabled("uc"));
            assert!(!config.is_enabled("TD"));
            assert!(!config.is_enabled("GL"));
            assert_eq!(config.named_mutators().count(), 4);
            Ok(())
        });
    }
}
