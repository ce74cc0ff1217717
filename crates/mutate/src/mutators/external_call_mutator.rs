//! Low-level external calls: gas starvation, forged results and replaced call payloads.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{FunctionCall, Node},
};

/// Gas stipend forced onto low-level calls.
pub const GAS_LIMIT: u64 = 10_000;

const LOW_LEVEL_CALLS: &[&str] = &["call", "delegatecall", "staticcall"];

/// `(call, receiver, method)` of a low-level call.
fn low_level_call(node: &Node) -> Option<(&FunctionCall, &Node, &str)> {
    let call = node.as_call()?;
    let (receiver, method) = call.method()?;
    LOW_LEVEL_CALLS.contains(&method).then_some((call, receiver, method))
}

/// Caps the gas of `.call`, `.delegatecall` and `.staticcall`:
/// `to.call(data)` -> `to.call{gas: 10000}(data)`.
pub struct GasLimitMutator;

impl Mutator for GasLimitMutator {
    fn id(&self) -> &'static str {
        "GL"
    }

    fn name(&self) -> &'static str {
        "gas-limitation"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let (call, _, _) = low_level_call(node)?;
                if call.has_call_options() {
                    return None;
                }
                let callee = ctxt.text(&call.expression)?;
                ctxt.replace(&call.expression, format!("{callee}{{gas: {GAS_LIMIT}}}"), self.id())
            })
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("call")
    }
}

/// Replaces a low-level call with a successful result carrying a random, well-typed payload.
pub struct ReturnValueMutator;

impl Mutator for ReturnValueMutator {
    fn id(&self) -> &'static str {
        "ECRVM"
    }

    fn name(&self) -> &'static str {
        "external-contract-return-value-manipulation"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut rng = match ctxt.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        ctxt.unit
            .pre_order()
            .filter(|node| low_level_call(node).is_some())
            .filter_map(|node| {
                let forged = format!("(true, abi.encode({}))", random_payload(&mut rng));
                ctxt.replace(node, forged, self.id())
            })
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("call")
    }
}

/// One of `uint256(N)`, `int256(N)`, `address(uint160(N))` or `bytes32(0x..)`.
pub fn random_payload(rng: &mut impl Rng) -> String {
    match rng.random_range(0..4u8) {
        0 => format!("uint256({})", rng.random::<u32>()),
        1 => format!("int256({})", rng.random_range(-1_000_000i64..=1_000_000)),
        2 => format!("address(uint160({}))", rng.random::<u64>()),
        _ => {
            let word: [u8; 32] = rng.random();
            let hex: String = word.iter().map(|byte| format!("{byte:02x}")).collect();
            format!("bytes32(0x{hex})")
        }
    }
}

/// Replaces the payload of low-level calls on a named address with a fixed one.
pub struct ExternalCallReplacementMutator;

impl Mutator for ExternalCallReplacementMutator {
    fn id(&self) -> &'static str {
        "ECR"
    }

    fn name(&self) -> &'static str {
        "external-call-replacement"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        ctxt.unit
            .pre_order()
            .filter_map(|node| {
                let (call, receiver, method) = low_level_call(node)?;
                if call.has_call_options() {
                    return None;
                }
                let target = receiver.as_identifier()?;
                let replaced = match method {
                    "call" => format!("{target}.call{{value: 0, gas: {GAS_LIMIT}}}(\"\")"),
                    "delegatecall" => {
                        format!("{target}.delegatecall(abi.encodeWithSignature(\"fallback()\"))")
                    }
                    _ => format!("{target}.staticcall(\"\")"),
                };
                ctxt.replace(node, replaced, self.id())
            })
            .collect()
    }

    fn is_applicable(&self, ctxt: &MutationContext<'_>) -> bool {
        ctxt.source.contains("call")
    }
}
