use crate::testdata;
use forge_mutate::{
    MutateConfig, Mutation, MutatorRegistry, SourceFile,
    mutators::{
        reentrancy_mutator::ReentrancyMutator, unchecked_call_mutator::UncheckedCallMutator,
    },
};
use std::path::Path;

const FIXTURES: &[&str] = &[
    "Bank.sol",
    "Dice.sol",
    "Escrow.sol",
    "Ledger.sol",
    "Lottery.sol",
    "Notes.sol",
    "Relay.sol",
    "SafeMathToken.sol",
    "Treasury.sol",
    "Vault.sol",
];

fn load_all() -> Vec<SourceFile> {
    FIXTURES.iter().map(|name| load(name)).collect()
}

fn load(name: &str) -> SourceFile {
    SourceFile::load(&testdata().join(name), "ast.json").unwrap()
}

fn file_name(mutation: &Mutation) -> &str {
    mutation.file().file_name().and_then(|name| name.to_str()).unwrap()
}

#[test]
fn every_mutation_is_faithful_to_its_source() {
    let files = load_all();
    let mutations = MutatorRegistry::all().run(&files, Some(7));
    assert!(!mutations.is_empty());

    for mutation in &mutations {
        let file = files.iter().find(|file| file.path() == mutation.file()).unwrap();
        let source = file.source();
        assert_eq!(&source[mutation.start_offset()..mutation.end_offset()], mutation.original());

        let mutant = mutation.apply(source).unwrap();
        assert_ne!(mutant, source, "{mutation}");
    }
}

#[test]
fn output_keeps_input_order() {
    let files = load_all();
    let mutations = MutatorRegistry::all().run(&files, Some(7));

    let mut seen: Vec<&str> = mutations.iter().map(file_name).collect();
    seen.dedup();
    let expected: Vec<&str> =
        FIXTURES.iter().copied().filter(|name| seen.contains(name)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn seeded_runs_are_reproducible() {
    let files = load_all();
    let registry = MutatorRegistry::all();
    assert_eq!(registry.run(&files, Some(99)), registry.run(&files, Some(99)));
}

#[test]
fn selected_mutators_only() {
    let files = vec![load("Bank.sol"), load("Relay.sol")];
    let registry =
        MutatorRegistry::new().with_mutator(ReentrancyMutator).with_mutator(UncheckedCallMutator);
    let mutations = registry.run(&files, None);
    assert!(mutations.iter().all(|m| ["RE", "UC"].contains(&m.operator_id())));

    let summary: Vec<_> =
        mutations.iter().map(|m| (file_name(m), m.operator_id(), m.lines().0)).collect();
    let count = |file: &str, id: &str| {
        summary.iter().filter(|(name, op, _)| *name == file && *op == id).count()
    };
    assert_eq!(count("Bank.sol", "RE"), 1);
    assert_eq!(count("Relay.sol", "RE"), 0);
    assert_eq!(count("Relay.sol", "UC"), 3);
    assert!(summary.contains(&("Bank.sol", "RE", 14)), "{summary:?}");
}

#[test]
fn configured_run_names_enclosing_functions() {
    let config = MutateConfig { mutators: vec!["FFM".into()], ..Default::default() };
    let registry = MutatorRegistry::from_config(&config).unwrap();
    let file = SourceFile::load(&testdata().join("Lottery.sol"), &config.ast_extension).unwrap();

    let mutations = registry.run_file(&file, config.seed);
    let functions: Vec<_> = mutations.iter().map(|m| file.enclosing_function(m)).collect();
    assert_eq!(functions, [Some("fallback"), Some("receive")]);
    assert!(mutations.iter().all(|m| m.file() == Path::new(file.path())));
}

#[test]
fn records_serialize_with_camel_case_keys() {
    let file = load("Bank.sol");
    let mutations = MutatorRegistry::new().with_mutator(ReentrancyMutator).run_file(&file, None);

    let json = serde_json::to_value(&mutations[0]).unwrap();
    for key in [
        "file",
        "startOffset",
        "endOffset",
        "startLine",
        "endLine",
        "originalText",
        "mutatedText",
        "operatorId",
    ] {
        assert!(json.get(key).is_some(), "missing {key} in {json}");
    }
    assert_eq!(json["operatorId"], "RE");
}
