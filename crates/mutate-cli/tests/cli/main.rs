use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn testdata() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../mutate/testdata")
}

fn forge_mutate(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_forge-mutate"))
        .current_dir(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// A project directory holding copies of the named fixtures and their trees.
fn project(fixtures: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    for name in fixtures {
        for file in [format!("{name}.sol"), format!("{name}.ast.json")] {
            fs::copy(testdata().join(&file), dir.path().join("src").join(&file)).unwrap();
        }
    }
    dir
}

fn stdout(output: &Output) -> String {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn lists_selected_mutators() {
    let prj = project(&[]);
    let out = stdout(&forge_mutate(prj.path(), &["--list", "-m", "UC,RE"]));
    similar_asserts::assert_eq!(out, "RE     reentrancy\nUC     unchecked-call\n");
}

#[test]
fn writes_json_report() {
    let prj = project(&["Relay", "Bank"]);
    fs::write(prj.path().join("mutate.toml"), "mutators = [\"UC\", \"RE\"]\n").unwrap();

    let output = forge_mutate(prj.path(), &["src", "--json", "--out", "mutations.json"]);
    assert_eq!(stdout(&output), "");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(prj.path().join("mutations.json")).unwrap())
            .unwrap();
    assert_eq!(json["summary"]["UC"], 3);
    assert_eq!(json["summary"]["RE"], 1);

    // Bank.sol sorts before Relay.sol.
    let mutations = json["mutations"].as_array().unwrap();
    assert_eq!(mutations[0]["operatorId"], "RE");
    assert_eq!(mutations[0]["enclosingFunction"], "withdraw");
    assert!(mutations[1..].iter().all(|m| m["operatorId"] == "UC"));
}

#[test]
fn prints_one_line_per_mutation() {
    let prj = project(&["Relay"]);
    let out = stdout(&forge_mutate(prj.path(), &["src/Relay.sol", "-m", "UC"]));
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 4, "{out}");
    assert!(lines[0].starts_with("[UC] src/Relay.sol:9 in forward: "), "{out}");
    assert_eq!(lines[3], "3 mutations (UC: 3)");
}

#[test]
fn unknown_mutator_fails() {
    let prj = project(&["Relay"]);
    let output = forge_mutate(prj.path(), &["src", "--skip", "NOPE"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown mutator `NOPE`"), "{stderr}");
}

#[test]
fn missing_tree_fails() {
    let prj = project(&[]);
    fs::write(prj.path().join("src/Lonely.sol"), "pragma solidity ^0.8.0;\n").unwrap();
    let output = forge_mutate(prj.path(), &["src"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Lonely.ast.json"), "{stderr}");
}
