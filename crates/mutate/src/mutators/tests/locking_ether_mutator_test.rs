use crate::mutators::{locking_ether_mutator::LockingEtherMutator, tests::helper::*};

#[test]
fn test_deletes_uncalled_fund_movers() {
    let (_, mutants) = mutate(&LockingEtherMutator, "Bank.sol");

    assert_eq!(mutants.len(), 2);
    assert!(mutants.iter().all(|mutant| mutant.mutated().is_empty()));
    assert!(mutants[0].original().starts_with("function withdraw(uint256 amount) external {"));
    assert!(mutants[0].original().ends_with('}'));
    assert_eq!(mutants[0].lines(), (12, 17));
    assert!(mutants[1].original().starts_with("function withdrawAll() external {"));
}

#[test]
fn test_keeps_functions_called_internally() {
    let (_, mutants) = mutate(&LockingEtherMutator, "Bank.sol");
    // `_pay` moves funds through `send` but `sweep` calls it.
    assert!(mutants.iter().all(|mutant| !mutant.original().contains("_pay")));

    let (_, mutants) = mutate(&LockingEtherMutator, "Treasury.sol");
    assert!(mutants.is_empty(), "{mutants:?}");
}

#[test]
fn test_low_level_calls_move_funds() {
    let (_, mutants) = mutate(&LockingEtherMutator, "Lottery.sol");
    assert_eq!(mutants.len(), 1);
    assert!(mutants[0].original().starts_with("function upgrade(bytes memory data) external {"));
}
