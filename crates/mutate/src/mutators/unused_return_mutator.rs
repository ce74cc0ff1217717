//! Unused return values: the result of a call is dropped and whatever consumed it gets a default.
//!
//! Three shapes, one mutator each:
//!
//! - `UR1`: a call result assigned or declared directly, `ok = token.transfer(to, amount);` ->
//!   `ok = false; token.transfer(to, amount);`.
//! - `UR2`: a plain assignment from a call or member read inside a function keeps only the right
//!   side, `price = oracle.latest();` -> `oracle.latest();`.
//! - `UR3`: a declaration whose initializer merely contains calls, `uint256 fee = quote(x) / 2;`
//!   -> `uint256 fee = 0; quote(x);`.

use std::collections::HashMap;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind, TypeInfo, VariableDeclaration, default_value},
};

pub struct UnusedReturnAssignMutator;

impl Mutator for UnusedReturnAssignMutator {
    fn id(&self) -> &'static str {
        "UR1"
    }

    fn name(&self) -> &'static str {
        "unused-return-1"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let types = declared_types(ctxt.unit);
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let mutated = match &node.kind {
                NodeKind::ExpressionStatement(stmt) => {
                    stmt.expression.as_deref().and_then(|expr| reset_assignment(ctxt, &types, expr))
                }
                NodeKind::VariableDeclarationStatement(stmt) => {
                    let Some(init) = stmt.initial_value.as_deref().filter(|init| init.is_call())
                    else {
                        continue;
                    };
                    let defaults: Option<Vec<String>> = stmt
                        .variables
                        .iter()
                        .flatten()
                        .map(|var| match &var.kind {
                            NodeKind::VariableDeclaration(decl) => default_declaration(ctxt, decl),
                            _ => None,
                        })
                        .collect();
                    defaults.filter(|defaults| !defaults.is_empty()).and_then(|defaults| {
                        Some(format!("{}; {};", defaults.join("; "), ctxt.text(init)?))
                    })
                }
                _ => None,
            };
            if let Some(mutated) = mutated {
                mutants.extend(ctxt.replace(node, mutated, self.id()));
            }
        }
        mutants
    }
}

/// `x = call();` / `(a, b) = call();` with the targets reset to their defaults.
fn reset_assignment(
    ctxt: &MutationContext<'_>,
    types: &HashMap<&str, &Node>,
    expr: &Node,
) -> Option<String> {
    let NodeKind::BinaryOperation(op) = &expr.kind else { return None };
    if op.operator != "=" || !op.right.is_call() {
        return None;
    }
    let reset = |name: &str| {
        let default = default_value(types.get(name)?)?;
        Some(format!("{name} = {default}"))
    };
    let resets: Vec<String> = match &op.left.kind {
        NodeKind::Identifier(ident) => vec![reset(&ident.name)?],
        NodeKind::TupleExpression(tuple) => tuple
            .components
            .iter()
            .flatten()
            .filter_map(|component| reset(component.as_identifier()?))
            .collect(),
        _ => return None,
    };
    if resets.is_empty() {
        return None;
    }
    Some(format!("{}; {};", resets.join("; "), ctxt.text(&op.right)?))
}

pub struct UnusedReturnDropMutator;

impl Mutator for UnusedReturnDropMutator {
    fn id(&self) -> &'static str {
        "UR2"
    }

    fn name(&self) -> &'static str {
        "unused-return-2"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for func in ctxt.unit.pre_order() {
            let NodeKind::FunctionDefinition(def) = &func.kind else { continue };
            let Some(body) = def.body.as_deref() else { continue };
            for node in body.pre_order() {
                let NodeKind::ExpressionStatement(stmt) = &node.kind else { continue };
                let Some(expr) = stmt.expression.as_deref() else { continue };
                let NodeKind::BinaryOperation(op) = &expr.kind else { continue };
                if op.operator != "=" || !yields_value(&op.right) {
                    continue;
                }
                if let Some(rhs) = ctxt.text(&op.right) {
                    mutants.extend(ctxt.replace(node, format!("{rhs};"), self.id()));
                }
            }
        }
        mutants
    }
}

/// A call, or a member read other than a sender lookup.
fn yields_value(node: &Node) -> bool {
    node.is_call() || node.as_member_access().is_some_and(|(_, member)| member != "sender")
}

pub struct UnusedReturnNestedMutator;

impl Mutator for UnusedReturnNestedMutator {
    fn id(&self) -> &'static str {
        "UR3"
    }

    fn name(&self) -> &'static str {
        "unused-return-3"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::VariableDeclarationStatement(stmt) = &node.kind else { continue };
            let Some(init) = stmt.initial_value.as_deref() else { continue };
            let Some((_, decl)) = stmt.single() else { continue };
            if init.is_call() || ctxt.text(init).is_none_or(|text| text.contains("payable")) {
                continue;
            }
            if decl.type_name.as_deref().is_some_and(|ty| TypeInfo::of(ty) == TypeInfo::Array) {
                continue;
            }

            let mut calls = Vec::new();
            outermost_calls(init, &mut calls);
            let Some(calls): Option<Vec<&str>> = calls.iter().map(|call| ctxt.text(call)).collect()
            else {
                continue;
            };
            if calls.is_empty() {
                continue;
            }
            let Some(declaration) = default_declaration(ctxt, decl) else { continue };
            let mutated = format!("{declaration}; {};", calls.join("; "));
            mutants.extend(ctxt.replace(node, mutated, self.id()));
        }
        mutants
    }
}

fn outermost_calls<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    for child in node.children() {
        if child.is_call() {
            out.push(child);
        } else {
            outermost_calls(child, out);
        }
    }
}

/// `T [location] name = <default>`, if the declared type has a default.
fn default_declaration(ctxt: &MutationContext<'_>, decl: &VariableDeclaration) -> Option<String> {
    let type_name = decl.type_name.as_deref()?;
    let default = default_value(type_name)?;
    let ty = ctxt.text(type_name)?;
    let name = decl.name.as_deref()?;
    Some(match decl.storage_location.as_deref() {
        Some(location) => format!("{ty} {location} {name} = {default}"),
        None => format!("{ty} {name} = {default}"),
    })
}

/// Every named variable declared in the file, mapped to its type. Later declarations shadow
/// earlier ones.
fn declared_types(unit: &Node) -> HashMap<&str, &Node> {
    unit.pre_order()
        .filter_map(|node| match &node.kind {
            NodeKind::VariableDeclaration(decl) => {
                Some((decl.name.as_deref()?, decl.type_name.as_deref()?))
            }
            _ => None,
        })
        .collect()
}
