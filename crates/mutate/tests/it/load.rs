use crate::testdata;
use forge_mutate::{MutateError, SourceFile, VersionClass};
use std::fs;

#[test]
fn loads_source_next_to_its_tree() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["Bank.sol", "Bank.ast.json"] {
        fs::copy(testdata().join(name), dir.path().join(name)).unwrap();
    }

    let path = dir.path().join("Bank.sol");
    let file = SourceFile::load(&path, "ast.json").unwrap();
    assert_eq!(file.path(), path);
    assert_eq!(file.version(), VersionClass::Modern);
    assert_eq!(file.source(), fs::read_to_string(testdata().join("Bank.sol")).unwrap());
}

#[test]
fn honors_custom_tree_extension() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(testdata().join("Relay.sol"), dir.path().join("Relay.sol")).unwrap();
    fs::copy(testdata().join("Relay.ast.json"), dir.path().join("Relay.json")).unwrap();

    let file = SourceFile::load(&dir.path().join("Relay.sol"), "json").unwrap();
    assert_eq!(file.version(), VersionClass::Legacy);
}

#[test]
fn missing_tree_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Orphan.sol");
    fs::write(&path, "pragma solidity ^0.8.0;\ncontract Orphan {}\n").unwrap();

    let err = SourceFile::load(&path, "ast.json").unwrap_err();
    match err {
        MutateError::Io { path, .. } => assert_eq!(path, dir.path().join("Orphan.ast.json")),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn truncated_tree_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Vault.sol");
    fs::copy(testdata().join("Vault.sol"), &path).unwrap();
    let tree = fs::read_to_string(testdata().join("Vault.ast.json")).unwrap();
    fs::write(dir.path().join("Vault.ast.json"), &tree[..tree.len() / 2]).unwrap();

    let err = SourceFile::load(&path, "ast.json").unwrap_err();
    assert!(matches!(err, MutateError::Ast { .. }), "{err}");
    assert!(err.to_string().contains("Vault.sol"), "{err}");
}
