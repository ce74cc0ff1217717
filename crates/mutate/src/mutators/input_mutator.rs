//! Input handling: call arguments forced to null values, parameters forced to range extremes.

use std::collections::HashMap;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind, TypeInfo, VariableDeclaration},
};

/// Arguments of calls to functions declared in the same file are replaced with the null value
/// of the matching parameter's type: `pay(to, amount)` -> `pay(address(0), amount)` and
/// `pay(to, 0)`.
pub struct NullValueMutator;

impl Mutator for NullValueMutator {
    fn id(&self) -> &'static str {
        "NVI"
    }

    fn name(&self) -> &'static str {
        "null-value-insertion"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut signatures: HashMap<&str, Vec<&[Node]>> = HashMap::new();
        for node in ctxt.unit.pre_order() {
            if let NodeKind::FunctionDefinition(func) = &node.kind
                && let Some(name) = func.plain_name()
            {
                signatures.entry(name).or_default().push(&func.parameters);
            }
        }

        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let Some(call) = node.as_call() else { continue };
            let Some(name) = call.function_name() else { continue };
            if !call.is_positional() {
                continue;
            }
            let Some(params) = signatures
                .get(name)
                .and_then(|overloads| overloads.iter().find(|p| p.len() == call.arguments.len()))
            else {
                continue;
            };
            for (arg, param) in call.arguments.iter().zip(params.iter()) {
                if let Some(null) = declaration(param).and_then(null_value) {
                    mutants.extend(ctxt.replace(arg, null, self.id()));
                }
            }
        }
        mutants
    }
}

fn declaration(node: &Node) -> Option<&VariableDeclaration> {
    match &node.kind {
        NodeKind::VariableDeclaration(decl) => Some(decl),
        _ => None,
    }
}

fn null_value(param: &VariableDeclaration) -> Option<&'static str> {
    match TypeInfo::of(param.type_name.as_deref()?) {
        TypeInfo::Uint(_) | TypeInfo::Int(_) => Some("0"),
        TypeInfo::Address { payable: false } => Some("address(0)"),
        TypeInfo::Address { payable: true } => Some("payable(address(0))"),
        TypeInfo::Bool => Some("false"),
        _ => None,
    }
}

/// Integer parameters are overwritten with their type's maximum on entry:
/// `function f(uint8 x) {` -> `function f(uint8 x) {x = type(uint8).max;`.
pub struct InputRangeMutator;

impl Mutator for InputRangeMutator {
    fn id(&self) -> &'static str {
        "IRR"
    }

    fn name(&self) -> &'static str {
        "input-range-replacement"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::FunctionDefinition(func) = &node.kind else { continue };
            let Some(body) = func.body.as_deref() else { continue };
            for param in func.parameters.iter().filter_map(declaration) {
                let Some(name) = param.name.as_deref() else { continue };
                let Some(ty) = param.type_name.as_deref() else { continue };
                if let TypeInfo::Uint(ty) | TypeInfo::Int(ty) = TypeInfo::of(ty) {
                    let clamp = format!("{name} = type({ty}).max;");
                    mutants.extend(ctxt.insert_into_block(body, clamp, self.id()));
                }
            }
        }
        mutants
    }
}
