//! Predictable randomness: on-chain entropy sources are replaced with fixed constants.

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind},
};

pub const FIXED_TIMESTAMP: &str = "0x5c7b4e3f";
pub const FIXED_DIFFICULTY: &str = "0x7b9f8e1d";
pub const FIXED_SEED: &str = "0x1234567890abcdef";
pub const FIXED_BLOCKHASH: &str =
    "0x3f5b76c4f3c3e9d49bb8a4ef5d90a047eb95e7b2e0b9b6363f4f7d4fce0f7ab2";

pub struct RandomnessSourceMutator;

impl Mutator for RandomnessSourceMutator {
    fn id(&self) -> &'static str {
        "RSR"
    }

    fn name(&self) -> &'static str {
        "randomness-source-replacement"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            if let Some(constant) = entropy_constant(node) {
                mutants.extend(ctxt.replace(node, constant, self.id()));
            } else if let Some(call) = node.as_call_to("keccak256") {
                for arg in &call.arguments {
                    let NodeKind::BinaryOperation(op) = &arg.kind else { continue };
                    if entropy_constant(&op.left).is_some() {
                        mutants.extend(ctxt.replace(arg, FIXED_SEED, self.id()));
                    }
                }
            }
        }
        mutants
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("block.")
    }
}

fn entropy_constant(node: &Node) -> Option<&'static str> {
    let (receiver, member) = node.as_member_access()?;
    if receiver.as_identifier() != Some("block") {
        return None;
    }
    match member {
        "timestamp" => Some(FIXED_TIMESTAMP),
        "difficulty" | "prevrandao" => Some(FIXED_DIFFICULTY),
        _ => None,
    }
}

pub struct BlockhashMutator;

impl Mutator for BlockhashMutator {
    fn id(&self) -> &'static str {
        "BM"
    }

    fn name(&self) -> &'static str {
        "blockhash-manipulation"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter(|node| {
                node.as_call().is_some_and(|call| {
                    call.function_name() == Some("blockhash")
                        || call.callee().is_member_of("block", "blockhash")
                })
            })
            .filter_map(|node| ctxt.replace(node, FIXED_BLOCKHASH, self.id()))
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("blockhash")
    }
}
