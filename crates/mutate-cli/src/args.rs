use crate::report::RunReport;
use clap::{Parser, ValueHint};
use eyre::{Result, WrapErr, bail};
use figment::providers::Serialized;
use forge_mutate::{MutateConfig, MutatorRegistry, SourceFile};
use serde::Serialize;
use std::{
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Inject vulnerabilities into Solidity sources.
///
/// Every source is read together with the syntax tree stored next to it, `Token.sol` pairing
/// with `Token.ast.json` by default.
#[derive(Clone, Debug, Parser)]
#[command(name = "forge-mutate", version)]
pub struct MutateArgs {
    /// Source files, or directories searched for `.sol` files.
    #[arg(
        value_hint = ValueHint::AnyPath,
        value_name = "PATH",
        num_args(1..),
        required_unless_present = "list"
    )]
    pub paths: Vec<PathBuf>,

    /// The project root, where `mutate.toml` is looked up.
    #[arg(long, value_hint = ValueHint::DirPath, value_name = "PATH", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// List the selected mutators and exit.
    #[arg(long)]
    pub list: bool,

    /// Print the mutations as JSON.
    #[arg(long, conflicts_with = "diff")]
    pub json: bool,

    /// Print each mutation as a diff below its summary line.
    #[arg(long)]
    pub diff: bool,

    /// Write the output to this file instead of stdout.
    #[arg(long, short, value_hint = ValueHint::FilePath, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Flags overriding the project configuration.
#[derive(Clone, Debug, Default, Parser, Serialize)]
pub struct ConfigArgs {
    /// Mutator ids to run, eg `RE,UC`. Overrides the `mutators` project config.
    #[arg(long, short, value_delimiter = ',', value_name = "ID")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mutators: Vec<String>,

    /// Mutator ids to leave out. Overrides the `skip_mutators` project config.
    #[arg(long = "skip", value_delimiter = ',', value_name = "ID")]
    #[serde(rename = "skip_mutators", skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,

    /// Seed for mutators drawing random values.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Extension of the syntax tree files.
    #[arg(long, value_name = "EXT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast_extension: Option<String>,
}

impl MutateArgs {
    pub fn run(self) -> Result<()> {
        if self.out.is_some() {
            yansi::disable();
        }

        let config = self.load_config()?;
        let registry = MutatorRegistry::from_config(&config)?;

        if self.list {
            let mut out = String::new();
            for (id, name) in registry.descriptors() {
                let _ = writeln!(out, "{id:<6} {name}");
            }
            return self.emit(&out);
        }

        let sources = self.sources();
        if sources.is_empty() {
            bail!("no Solidity sources found");
        }
        let files = sources
            .iter()
            .map(|path| SourceFile::load(path, &config.ast_extension))
            .collect::<Result<Vec<_>, _>>()?;

        let mutations = registry.run(&files, config.seed);
        let report = RunReport::new(&files, &mutations);
        let output = if self.json {
            let mut json = report.to_json()?;
            json.push('\n');
            json
        } else {
            report.to_text(self.diff)
        };
        self.emit(&output)
    }

    /// The project configuration with the command-line overrides merged in.
    pub fn load_config(&self) -> Result<MutateConfig> {
        let config = MutateConfig::figment(&self.root)
            .merge(Serialized::defaults(&self.config))
            .extract()
            .wrap_err("failed to load the mutate config")?;
        trace!(?config, "resolved config");
        Ok(config)
    }

    /// The `.sol` files named by `paths`, directories expanded in file name order.
    pub fn sources(&self) -> Vec<PathBuf> {
        let mut sources = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            if path.is_dir() {
                sources.extend(
                    WalkDir::new(path)
                        .sort_by_file_name()
                        .into_iter()
                        .filter_map(Result::ok)
                        .filter(|entry| entry.file_type().is_file() && is_sol(entry.path()))
                        .map(walkdir::DirEntry::into_path),
                );
            } else if is_sol(path) {
                sources.push(path.clone());
            } else {
                warn!("cannot process path {}", path.display());
            }
        }
        sources
    }

    fn emit(&self, output: &str) -> Result<()> {
        match &self.out {
            Some(path) => {
                fs::write(path, output)
                    .wrap_err_with(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote mutations");
            }
            None => io::stdout().lock().write_all(output.as_bytes())?,
        }
        Ok(())
    }
}

fn is_sol(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sol")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn verify_cli() {
        MutateArgs::command().debug_assert();
    }

    #[test]
    fn parses_id_lists() {
        let args = MutateArgs::parse_from([
            "forge-mutate",
            "src",
            "-m",
            "RE,UC",
            "--skip",
            "GL",
            "--seed",
            "7",
        ]);
        assert_eq!(args.config.mutators, ["RE", "UC"]);
        assert_eq!(args.config.skip, ["GL"]);
        assert_eq!(args.config.seed, Some(7));
        assert_eq!(args.paths, [PathBuf::from("src")]);
    }

    #[test]
    fn list_needs_no_paths() {
        let args = MutateArgs::parse_from(["forge-mutate", "--list"]);
        assert!(args.paths.is_empty());
        assert!(MutateArgs::try_parse_from(["forge-mutate"]).is_err());
    }

    #[test]
    fn flags_override_project_config() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join(MutateConfig::FILE_NAME),
            "mutators = [\"TD\"]\nseed = 1\nast_extension = \"json\"\n",
        )
        .unwrap();

        let args = MutateArgs::parse_from([
            OsStr::new("forge-mutate"),
            OsStr::new("--root"),
            root.path().as_os_str(),
            OsStr::new("--seed"),
            OsStr::new("5"),
            OsStr::new("A.sol"),
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.mutators, ["TD"]);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.ast_extension, "json");
    }

    #[test]
    fn expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        for name in ["B.sol", "A.sol", "A.ast.json", "nested/C.sol", "notes.md"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let args = MutateArgs::parse_from([OsStr::new("forge-mutate"), dir.path().as_os_str()]);
        let names: Vec<_> = args
            .sources()
            .iter()
            .map(|path| path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [PathBuf::from("A.sol"), PathBuf::from("B.sol"), PathBuf::from("nested/C.sol")]
        );
    }
}
