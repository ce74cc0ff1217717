//! Code injection: new entry points and statements that open a contract up.

use std::collections::HashSet;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{Node, NodeKind, TypeInfo, default_value},
};

/// Exposes non-public state through a generated public getter inserted after its declaration:
/// `uint256 private secret;` gains `function getSecret() public view returns (uint256) { .. }`.
pub struct PublicGetterMutator;

impl Mutator for PublicGetterMutator {
    fn id(&self) -> &'static str {
        "PGI"
    }

    fn name(&self) -> &'static str {
        "public-getter-insertion"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let structs: HashSet<&str> = ctxt
            .unit
            .pre_order()
            .filter_map(|node| match &node.kind {
                NodeKind::StructDefinition(def) => Some(def.name.as_str()),
                _ => None,
            })
            .collect();

        let mut mutants = Vec::new();
        for node in ctxt.unit.pre_order() {
            let NodeKind::StateVariableDeclaration(decl) = &node.kind else { continue };
            let [var] = decl.variables.as_slice() else { continue };
            let NodeKind::VariableDeclaration(var) = &var.kind else { continue };
            let hidden = matches!(
                var.visibility.as_deref(),
                None | Some("private" | "internal" | "default")
            );
            if !hidden {
                continue;
            }
            let (Some(name), Some(type_name)) = (var.name.as_deref(), var.type_name.as_deref())
            else {
                continue;
            };
            let memory = match TypeInfo::of(type_name) {
                TypeInfo::String | TypeInfo::Bytes => true,
                TypeInfo::UserDefined(path) => structs.contains(path),
                TypeInfo::Mapping | TypeInfo::Array | TypeInfo::Other => continue,
                _ => false,
            };
            let (Some(span), Some((_, line)), Some(ty)) =
                (node.span(), node.lines(), ctxt.text(type_name))
            else {
                continue;
            };
            let location = if memory { " memory" } else { "" };
            let getter = format!(
                "\n    function get{}() public view returns ({ty}{location}) {{ return {name}; }}",
                capitalize(name)
            );
            mutants.extend(ctxt.insert(span.hi, line, getter, self.id()));
        }
        mutants
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drops the encryption wrapper around stored data: `encrypt(secret)` -> `secret`.
pub struct UnencryptedStorageMutator;

impl Mutator for UnencryptedStorageMutator {
    fn id(&self) -> &'static str {
        "US"
    }

    fn name(&self) -> &'static str {
        "unencrypted-storage"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let plain = node.as_call_to("encrypt")?.arguments.first()?;
                ctxt.replace(node, ctxt.text(plain)?, self.id())
            })
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("encrypt")
    }
}

/// Makes the fallback and receive functions call back into the contract on entry.
pub struct FallbackMutator;

impl Mutator for FallbackMutator {
    fn id(&self) -> &'static str {
        "FFM"
    }

    fn name(&self) -> &'static str {
        "fallback-function-manipulation"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let NodeKind::FunctionDefinition(func) = &node.kind else { return None };
                if !(func.is_fallback || func.is_receive_ether) {
                    return None;
                }
                let body = func.body.as_deref()?;
                ctxt.insert_into_block(body, "address(this).call(\"\");", self.id())
            })
            .collect()
    }
}

/// Makes public functions re-enter themselves on entry with default arguments:
/// `function withdraw(uint256 amount) public {` gains `withdraw(0);`.
pub struct ReentrantCallMutator;

impl Mutator for ReentrantCallMutator {
    fn id(&self) -> &'static str {
        "RFC"
    }

    fn name(&self) -> &'static str {
        "reentrant-function-call"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let NodeKind::FunctionDefinition(func) = &node.kind else { return None };
                if func.visibility != "public" {
                    return None;
                }
                let name = func.plain_name()?;
                let body = func.body.as_deref()?;
                let args = func
                    .parameters
                    .iter()
                    .map(parameter_default)
                    .collect::<Option<Vec<_>>>()?
                    .join(", ");
                ctxt.insert_into_block(body, format!("{name}({args});"), self.id())
            })
            .collect()
    }
}

fn parameter_default(param: &Node) -> Option<&'static str> {
    match &param.kind {
        NodeKind::VariableDeclaration(decl) => default_value(decl.type_name.as_deref()?),
        _ => None,
    }
}
