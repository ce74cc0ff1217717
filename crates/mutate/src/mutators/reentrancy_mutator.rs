//! Reentrancy injection by moving state updates after the external call that should follow them.
//!
//! [`ReentrancyMutator`] targets the classic withdraw pattern: a balance held in a
//! `mapping(address => uint..)` is debited for `msg.sender`, and later in the same function the
//! sender is paid through a low-level `call`. The payment is moved in front of the debit.
//!
//! [`OrderSwapMutator`] is the local variant: any state change immediately followed by a
//! value-moving call is swapped with it.

use std::collections::HashSet;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind},
};

pub struct ReentrancyMutator;

impl Mutator for ReentrancyMutator {
    fn id(&self) -> &'static str {
        "RE"
    }

    fn name(&self) -> &'static str {
        "reentrancy"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let balances = balance_mappings(ctxt.unit);
        if balances.is_empty() {
            return Vec::new();
        }

        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::FunctionDefinition(func) = &node.kind else { continue };
            let Some(NodeKind::Block(body)) = func.body.as_deref().map(|body| &body.kind) else {
                continue;
            };

            let Some(debit) =
                body.statements.iter().position(|stmt| is_sender_debit(stmt, &balances))
            else {
                continue;
            };
            let Some(payment) = body.statements[debit + 1..].iter().find(|stmt| pays_sender(stmt))
            else {
                continue;
            };

            mutants.extend(swap(ctxt, &body.statements[debit], payment, self.id()));
        }
        mutants
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("mapping")
    }
}

pub struct OrderSwapMutator;

impl Mutator for OrderSwapMutator {
    fn id(&self) -> &'static str {
        "ROS"
    }

    fn name(&self) -> &'static str {
        "reentrancy-order-swap"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::Block(block) = &node.kind else { continue };
            for pair in block.statements.windows(2) {
                if is_state_change(&pair[0]) && is_value_call(&pair[1]) {
                    mutants.extend(swap(ctxt, &pair[0], &pair[1], self.id()));
                }
            }
        }
        mutants
    }
}

/// Replaces the text from `first` through `second` with `second` followed by `first`.
fn swap(ctxt: &MutationContext<'_>, first: &Node, second: &Node, id: &str) -> Option<Mutation> {
    let (first_span, second_span) = (first.span()?, second.span()?);
    let (start_line, _) = first.lines()?;
    let (_, end_line) = second.lines()?;
    if second_span.lo < first_span.hi {
        return None;
    }
    let mutated = format!("{}\n{}", ctxt.text(second)?, ctxt.text(first)?);
    ctxt.replace_span(first_span.to(second_span), (start_line, end_line), mutated, id)
}

/// Names of state variables typed `mapping(address => uint..)`.
fn balance_mappings(unit: &Node) -> HashSet<&str> {
    unit.pre_order()
        .filter_map(|node| match &node.kind {
            NodeKind::StateVariableDeclaration(decl) => Some(&decl.variables),
            _ => None,
        })
        .flatten()
        .filter_map(|var| {
            let NodeKind::VariableDeclaration(var) = &var.kind else { return None };
            let NodeKind::Mapping(mapping) = &var.type_name.as_deref()?.kind else { return None };
            let name = var.name.as_deref()?;
            let key = elementary_name(&mapping.key_type)?;
            let value = elementary_name(&mapping.value_type)?;
            (key == "address" && value.contains("uint")).then_some(name)
        })
        .collect()
}

fn elementary_name(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::ElementaryTypeName(ty) => Some(&ty.name),
        _ => None,
    }
}

/// `balances[msg.sender] = ..` or `balances[msg.sender] -= ..`, not a credit.
fn is_sender_debit(stmt: &Node, balances: &HashSet<&str>) -> bool {
    let NodeKind::ExpressionStatement(stmt) = &stmt.kind else { return false };
    let Some(NodeKind::BinaryOperation(op)) = stmt.expression.as_deref().map(|e| &e.kind) else {
        return false;
    };
    let credits = matches!(&op.right.kind, NodeKind::BinaryOperation(r) if r.operator == "+");
    if !matches!(op.operator.as_str(), "=" | "-=") || credits {
        return false;
    }
    let NodeKind::IndexAccess(access) = &op.left.kind else { return false };
    access.index.as_deref().is_some_and(|index| index.is_member_of("msg", "sender"))
        && access.base.as_identifier().is_some_and(|base| balances.contains(base))
}

/// `(bool ok, ) = msg.sender.call{value: amount}("")` and its option-less or `payable(..)`
/// spellings.
fn pays_sender(stmt: &Node) -> bool {
    let NodeKind::VariableDeclarationStatement(stmt) = &stmt.kind else { return false };
    let Some(call) = stmt.initial_value.as_deref().and_then(Node::as_call) else { return false };
    let Some((receiver, "call")) = call.method() else { return false };
    is_sender(receiver)
}

fn is_sender(node: &Node) -> bool {
    if node.is_member_of("msg", "sender") {
        return true;
    }
    node.as_call_to("payable")
        .is_some_and(|call| matches!(call.arguments.as_slice(), [arg] if is_sender(arg)))
}

/// An assignment, compound assignment or increment/decrement statement.
fn is_state_change(stmt: &Node) -> bool {
    let NodeKind::ExpressionStatement(stmt) = &stmt.kind else { return false };
    match stmt.expression.as_deref().map(|expr| &expr.kind) {
        Some(NodeKind::BinaryOperation(op)) => op.is_assignment(),
        Some(NodeKind::UnaryOperation(op)) => matches!(op.operator.as_str(), "++" | "--"),
        _ => false,
    }
}

/// A statement that is a bare `call`, `delegatecall`, `send` or `transfer`.
fn is_value_call(stmt: &Node) -> bool {
    let NodeKind::ExpressionStatement(stmt) = &stmt.kind else { return false };
    stmt.expression
        .as_deref()
        .and_then(Node::as_call)
        .and_then(|call| call.method())
        .is_some_and(|(_, method)| matches!(method, "call" | "delegatecall" | "send" | "transfer"))
}
