use figment::Jail;
use forge_mutate::{MutateConfig, MutateError, MutatorRegistry};

#[test]
fn registry_follows_project_config() {
    Jail::expect_with(|jail| {
        jail.create_file(
            MutateConfig::FILE_NAME,
            r#"
            mutators = ["UC", "td", "TDC", "DTU"]
            skip_mutators = ["DTU"]
            "#,
        )?;
        jail.set_env("FORGE_MUTATE_AST_EXTENSION", "json");

        let config = MutateConfig::load(jail.directory()).unwrap();
        assert_eq!(config.ast_extension, "json");
        assert_eq!(config.seed, None);

        let registry = MutatorRegistry::from_config(&config).unwrap();
        // Catalogue order, not configuration order.
        assert_eq!(registry.ids(), ["TD", "TDC", "UC"]);
        Ok(())
    });
}

#[test]
fn unknown_ids_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(MutateConfig::FILE_NAME, r#"mutators = ["RE", "XYZ"]"#)?;

        let config = MutateConfig::load(jail.directory()).unwrap();
        let err = MutatorRegistry::from_config(&config).err().unwrap();
        assert!(matches!(err, MutateError::UnknownMutator(ref id) if id == "XYZ"), "{err}");
        Ok(())
    });
}

#[test]
fn malformed_file_is_a_config_error() {
    Jail::expect_with(|jail| {
        jail.create_file(MutateConfig::FILE_NAME, "seed = \"soon\"")?;

        let err = MutateConfig::load(jail.directory()).unwrap_err();
        assert!(matches!(err, MutateError::Config(_)), "{err}");
        Ok(())
    });
}

#[test]
fn empty_selection_runs_everything() {
    let registry = MutatorRegistry::from_config(&MutateConfig::default()).unwrap();
    assert_eq!(registry.len(), MutatorRegistry::all().len());
}
