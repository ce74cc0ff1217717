use crate::mutators::{
    Mutator,
    delegatecall_mutator::{DELEGATE_SETTER, DelegatecallMutator},
    tests::helper::*,
};

#[test]
fn test_delegation_target_becomes_settable() {
    let (_, mutants) = mutate(&DelegatecallMutator, "Lottery.sol");

    assert_eq!(mutants.len(), 1);
    let mutant = &mutants[0];
    assert!(mutant.original().starts_with("address public implementation;"));
    assert!(mutant.original().ends_with("receive() external payable {}\n"));
    assert_eq!(mutant.lines(), (5, 35));

    assert!(mutant.mutated().starts_with(DELEGATE_SETTER));
    assert!(mutant.mutated().contains("(bool ok, ) = delegate.delegatecall(data);"));
    assert!(!mutant.mutated().contains("implementation.delegatecall"));
    // Only call receivers are redirected.
    assert!(mutant.mutated().contains("address public implementation;"));
    assert_eq!(
        mutant.mutated().len(),
        DELEGATE_SETTER.len() + mutant.original().len() - "implementation".len()
            + "delegate".len()
    );
}

#[test]
fn test_contract_still_closes() {
    let (file, mutants) = mutate(&DelegatecallMutator, "Lottery.sol");
    let mutated = mutants[0].apply(file.source()).unwrap();
    assert!(mutated.trim_end().ends_with("receive() external payable {}\n}"));
}

#[test]
fn test_contracts_without_delegatecall() {
    let file = fixture("Bank.sol");
    assert!(!DelegatecallMutator.is_applicable(&context(&file)));
    assert!(DelegatecallMutator.generate_mutants(&context(&file)).is_empty());
}
