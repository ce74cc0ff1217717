//! Arithmetic operation duplication: `a + b` -> `(a + b) + (a + b)`, and the library spelling
//! `a.add(b)` -> `a.add(b).add(a.add(b))`.

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind},
};

pub struct ArithmeticDuplicationMutator;

impl Mutator for ArithmeticDuplicationMutator {
    fn id(&self) -> &'static str {
        "AOD"
    }

    fn name(&self) -> &'static str {
        "arithmetic-operation-duplication"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let duplicated = duplicate(ctxt, node)?;
                ctxt.replace(node, duplicated, self.id())
            })
            .collect()
    }
}

fn duplicate(ctxt: &MutationContext<'_>, node: &Node) -> Option<String> {
    let text = ctxt.text(node)?;
    match &node.kind {
        NodeKind::BinaryOperation(op) if matches!(op.operator.as_str(), "+" | "-" | "*" | "/") => {
            Some(format!("({text}) {} ({text})", op.operator))
        }
        NodeKind::FunctionCall(call) => {
            let (receiver, method) = call.method()?;
            if !matches!(method, "add" | "sub" | "mul" | "div")
                || receiver.as_identifier() == Some("SafeMath")
            {
                return None;
            }
            Some(format!("{text}.{method}({text})"))
        }
        _ => None,
    }
}
