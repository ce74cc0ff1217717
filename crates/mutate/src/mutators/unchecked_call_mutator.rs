//! Unchecked low-level calls: the success flag of a `call` stops being checked.
//!
//! - `require(to.call{value: v}(""));` -> `to.call{value: v}("");`
//! - `if (!to.send(v)) { revert(); }` style guards built on `.call` become
//!   `if (true) { to.call(..); }` with the aborting statements removed.

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{IfStatement, Node, NodeKind},
};

pub struct UncheckedCallMutator;

impl Mutator for UncheckedCallMutator {
    fn id(&self) -> &'static str {
        "UC"
    }

    fn name(&self) -> &'static str {
        "unchecked-call"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let mutated = match &node.kind {
                NodeKind::ExpressionStatement(stmt) => {
                    stmt.expression.as_deref().and_then(|expr| unguard(ctxt, expr))
                }
                NodeKind::IfStatement(stmt) => unconditional(ctxt, stmt),
                _ => None,
            };
            if let Some(mutated) = mutated {
                mutants.extend(ctxt.replace(node, mutated, self.id()));
            }
        }
        mutants
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains(".call")
    }
}

/// `require(x.call(..), "..")` -> `x.call(..);`
fn unguard(ctxt: &MutationContext<'_>, expr: &Node) -> Option<String> {
    let call = expr.as_call()?;
    if !matches!(call.function_name(), Some("require" | "assert")) {
        return None;
    }
    let checked = call.arguments.iter().map(strip_not).find(|arg| reaches_call(arg))?;
    Some(format!("{};", ctxt.text(checked)?))
}

/// `if (!x.call(..)) { .. }` -> `if (true) { x.call(..); .. }`
fn unconditional(ctxt: &MutationContext<'_>, stmt: &IfStatement) -> Option<String> {
    let checked = strip_not(&stmt.condition);
    if !checked.is_call() || !reaches_call(checked) {
        return None;
    }

    let mut parts = vec![format!("{};", ctxt.text(checked)?)];
    let kept: Vec<&Node> = match &stmt.true_body.kind {
        NodeKind::Block(block) => block.statements.iter().filter(|s| !s.is_abort()).collect(),
        _ if stmt.true_body.is_abort() => Vec::new(),
        _ => vec![&*stmt.true_body],
    };
    for kept_stmt in kept {
        parts.push(ctxt.text(kept_stmt)?.to_string());
    }

    let mut mutated = format!("if (true) {{ {} }}", parts.join(" "));
    if let Some(false_body) = stmt.false_body.as_deref() {
        mutated.push_str(" else ");
        mutated.push_str(ctxt.text(false_body)?);
    }
    Some(mutated)
}

fn strip_not(node: &Node) -> &Node {
    match &node.kind {
        NodeKind::UnaryOperation(op) if op.operator == "!" => &*op.sub_expression,
        _ => node,
    }
}

/// Whether the callee chain of `node` goes through a `.call` member.
fn reaches_call(node: &Node) -> bool {
    let mut node = node;
    loop {
        node = match &node.kind {
            NodeKind::MemberAccess(access) if access.member_name == "call" => return true,
            NodeKind::MemberAccess(access) => &*access.expression,
            NodeKind::FunctionCall(call) => &*call.expression,
            NodeKind::NameValueExpression(options) => &*options.expression,
            _ => return false,
        };
    }
}
