//! Locks ether in a contract by deleting the functions able to move it out.
//!
//! A function is a candidate when its body calls one of the fund-moving primitives. Candidates
//! that no call inside the contract refers to by name are deleted outright. Matching is by name
//! only, so an overload shares the fate of its siblings.

use std::collections::HashSet;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{ContractDefinition, Node, NodeKind},
};

const FUND_MOVERS: &[&str] =
    &["send", "transfer", "call", "staticcall", "delegatecall", "callcode", "selfdestruct"];

pub struct LockingEtherMutator;

impl Mutator for LockingEtherMutator {
    fn id(&self) -> &'static str {
        "LE"
    }

    fn name(&self) -> &'static str {
        "locking-ether"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| match &node.kind {
                NodeKind::ContractDefinition(contract) if contract.kind == "contract" => {
                    Some(contract)
                }
                _ => None,
            })
            .flat_map(|contract| self.lock_contract(ctxt, contract))
            .collect()
    }
}

impl LockingEtherMutator {
    fn lock_contract(
        &self,
        ctxt: &MutationContext<'_>,
        contract: &ContractDefinition,
    ) -> Vec<Mutation> {
        let candidates: Vec<(&Node, &str)> = contract
            .sub_nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::FunctionDefinition(func) if !func.is_constructor => {
                    let name = func.name.as_deref().filter(|name| !name.is_empty())?;
                    let body = func.body.as_deref()?;
                    body.any(moves_funds).then_some((node, name))
                }
                _ => None,
            })
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let called: HashSet<&str> = contract
            .sub_nodes
            .iter()
            .flat_map(Node::pre_order)
            .filter_map(|node| node.as_call()?.function_name())
            .collect();

        candidates
            .into_iter()
            .filter(|(_, name)| !called.contains(name))
            .filter_map(|(node, _)| ctxt.replace(node, "", self.id()))
            .collect()
    }
}

fn moves_funds(node: &Node) -> bool {
    let Some(call) = node.as_call() else { return false };
    let name = match &call.callee().kind {
        NodeKind::Identifier(ident) => ident.name.as_str(),
        NodeKind::MemberAccess(access) => access.member_name.as_str(),
        _ => return false,
    };
    FUND_MOVERS.contains(&name)
}
