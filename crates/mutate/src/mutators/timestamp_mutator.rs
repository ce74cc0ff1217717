//! Timestamp dependency and manipulation.
//!
//! - `TD` makes logic keyed on other block properties depend on the miner-influenced timestamp.
//! - `TDC` pins the value a time comparison is made against to a tiny constant, so a deadline
//!   or lock period is effectively disabled.
//! - `TM` replaces the timestamp with a value that flips between extremes.

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind},
};

/// Stand-in for the compared value of a time check.
pub const TIME_LITERAL: &str = "1 minutes";

/// Replacement for `block.timestamp` used by [`TimestampManipulationMutator`].
pub const MANIPULATED_TIMESTAMP: &str =
    "(uint256(keccak256(abi.encodePacked(block.timestamp))) % 2 == 0 ? 0 : type(uint256).max)";

pub struct TimestampDependencyMutator;

impl Mutator for TimestampDependencyMutator {
    fn id(&self) -> &'static str {
        "TD"
    }

    fn name(&self) -> &'static str {
        "timestamp-dependency"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter(|node| {
                node.as_member_access().is_some_and(|(receiver, member)| {
                    receiver.as_identifier() == Some("block") && member != "timestamp"
                })
            })
            .filter_map(|node| ctxt.replace(node, "block.timestamp", self.id()))
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("block.")
    }
}

pub struct TimestampComparisonMutator;

impl Mutator for TimestampComparisonMutator {
    fn id(&self) -> &'static str {
        "TDC"
    }

    fn name(&self) -> &'static str {
        "timestamp-dependency-comparison"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::BinaryOperation(op) = &node.kind else { continue };
            if !matches!(op.operator.as_str(), "<" | "<=" | ">" | ">=") {
                continue;
            }
            for (time, other) in [(&op.left, &op.right), (&op.right, &op.left)] {
                if is_time_reference(time) && is_plain_identifier(other) {
                    mutants.extend(ctxt.replace(other, TIME_LITERAL, self.id()));
                }
            }
        }
        mutants
    }
}

pub struct TimestampManipulationMutator;

impl Mutator for TimestampManipulationMutator {
    fn id(&self) -> &'static str {
        "TM"
    }

    fn name(&self) -> &'static str {
        "timestamp-manipulation"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter(|node| node.is_member_of("block", "timestamp"))
            .filter_map(|node| ctxt.replace(node, MANIPULATED_TIMESTAMP, self.id()))
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("block.timestamp")
    }
}

/// `block.timestamp` or the legacy `now` alias.
fn is_time_reference(node: &Node) -> bool {
    node.is_member_of("block", "timestamp") || node.as_identifier() == Some("now")
}

fn is_plain_identifier(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Identifier(ident) if ident.name != "now")
}
