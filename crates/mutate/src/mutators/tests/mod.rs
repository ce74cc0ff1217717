
mod delegatecall_mutator_test;
mod injection_mutator_test;
mod locking_ether_mutator_test;
