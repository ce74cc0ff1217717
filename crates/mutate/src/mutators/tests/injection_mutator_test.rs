use crate::mutators::{
    Mutator,
    injection_mutator::{
        FallbackMutator, PublicGetterMutator, ReentrantCallMutator, UnencryptedStorageMutator,
    },
    tests::helper::*,
};

#[test]
fn test_hidden_state_gets_public_getters() {
    let (_, mutants) = mutate(&PublicGetterMutator, "Treasury.sol");
    similar_asserts::assert_eq!(
        mutated(&mutants),
        [
            "\n    function getReserve() public view returns (uint256) { return reserve; }",
            "\n    function getLabel() public view returns (string memory) { return label; }",
            "\n    function getPaused() public view returns (bool) { return paused; }",
            "\n    function getLastGrant() public view returns (Grant memory) { return lastGrant; }",
            "\n    function getAdmin() public view returns (address payable) { return admin; }",
        ]
    );
    assert!(mutants.iter().all(|mutant| mutant.is_insertion()));
    assert_eq!(mutants[0].lines(), (16, 16));
}

#[test]
fn test_getters_skip_public_and_mapping_state() {
    let (_, mutants) = mutate(&PublicGetterMutator, "Treasury.sol");
    for mutant in &mutants {
        assert!(!mutant.mutated().contains("getToken"), "{mutant}");
        assert!(!mutant.mutated().contains("getAllowances"), "{mutant}");
    }
}

#[test]
fn test_encryption_is_removed() {
    <() as MutatorTester>::test_mutator(
        UnencryptedStorageMutator,
        vec![
            MutatorTestCase {
                fixture: "Lottery.sol",
                should_apply: true,
                expected_mutations: Some(vec!["entry"]),
            },
            MutatorTestCase { fixture: "Bank.sol", should_apply: false, expected_mutations: None },
        ],
    );
}

#[test]
fn test_fallback_and_receive_call_back() {
    let (file, mutants) = mutate(&FallbackMutator, "Lottery.sol");
    assert_eq!(mutated(&mutants), ["address(this).call(\"\");", "address(this).call(\"\");"]);
    let names: Vec<_> =
        mutants.iter().map(|mutant| file.enclosing_function(mutant).unwrap()).collect();
    assert_eq!(names, ["fallback", "receive"]);
}

#[test]
fn test_public_functions_reenter_themselves() {
    let (_, mutants) = mutate(&ReentrantCallMutator, "Treasury.sol");
    assert_eq!(mutated(&mutants), ["payout(address(0), 0);", "grant(address(0), 0, false);"]);

    // Only external and internal functions.
    let file = fixture("Bank.sol");
    assert!(ReentrantCallMutator.generate_mutants(&context(&file)).is_empty());
}
