//! Delegatecall to an untrusted callee.
//!
//! Contracts that delegate get a public, unauthenticated setter for the delegation target, and
//! every `delegatecall` is routed through it.

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{ContractDefinition, Node, NodeKind, Span},
    splice::rewrite,
};

/// Declarations prepended to the contract body.
pub const DELEGATE_SETTER: &str = concat!(
    "address public delegate;\n",
    "function setDelegate(address _delegate) public { delegate = _delegate; }\n",
);

pub struct DelegatecallMutator;

impl Mutator for DelegatecallMutator {
    fn id(&self) -> &'static str {
        "DTU"
    }

    fn name(&self) -> &'static str {
        "delegatecall-to-untrusted"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| match &node.kind {
                NodeKind::ContractDefinition(contract) if !contract.is_interface_or_library() => {
                    self.untrust(ctxt, node, contract)
                }
                _ => None,
            })
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("delegatecall")
    }
}

impl DelegatecallMutator {
    fn untrust(
        &self,
        ctxt: &MutationContext<'_>,
        node: &Node,
        contract: &ContractDefinition,
    ) -> Option<Mutation> {
        let receivers: Vec<Span> = node
            .descendants()
            .filter_map(|node| match node.as_member_access()? {
                (receiver, "delegatecall") => receiver.span(),
                _ => None,
            })
            .collect();
        if receivers.is_empty() {
            return None;
        }

        let (first, last) = (contract.sub_nodes.first()?, contract.sub_nodes.last()?);
        let contract_span = node.span()?;
        // Everything from the first member up to, not including, the closing brace.
        let body = Span::new(first.span()?.lo, contract_span.hi.checked_sub(1)?);
        if !ctxt.span_text(Span::new(body.hi, contract_span.hi))?.starts_with('}') {
            return None;
        }

        let edits: Vec<(Span, &str)> =
            receivers.into_iter().map(|span| (span, "delegate")).collect();
        let rewritten = rewrite(ctxt.source, body, &edits)?;
        let lines = (first.lines()?.0, last.lines()?.1);
        ctxt.replace_span(body, lines, format!("{DELEGATE_SETTER}{rewritten}"), self.id())
    }
}
