//! Integer underflow/overflow injection.
//!
//! Which rewrite applies depends on the file's declared compiler version:
//!
//! - Before 0.8.18, arithmetic written through a safe-math library (`a.add(b)`, `x.mul(y)`, ...)
//!   is rewritten to the raw operator, e.g. `uint256 c = a.add(b)` -> `uint256 c = (a + b)`.
//! - From 0.8.18 on, statements doing arithmetic are wrapped in an `unchecked` block, e.g.
//!   `total += amount;` -> `unchecked { total += amount; }`.
//!
//! Guard calls are left alone: `require`/`approve` arguments on the legacy path,
//! `require`/`assert` arguments on the modern one.

use std::ops::ControlFlow;

use super::{MutationContext, Mutator};
use crate::{
    Mutation,
    ast::{
        BinaryOperation, ExpressionStatement, ForStatement, FunctionCall, Node, NodeKind,
        ReturnStatement, Span, UncheckedStatement, VariableDeclarationStatement, Visit,
    },
    splice::{balance_parens, rewrite, strip_terminator, without_terminator},
};

const LEGACY_GUARDS: &[&str] = &["require", "approve"];
const MODERN_GUARDS: &[&str] = &["require", "assert"];

const ARITHMETIC_OPS: &[&str] = &["+", "-", "*", "/", "%", "+=", "-=", "*=", "/=", "%="];

pub struct IntegerOverflowMutator;

impl Mutator for IntegerOverflowMutator {
    fn id(&self) -> &'static str {
        "IUO"
    }

    fn name(&self) -> &'static str {
        "integer-underflow-overflow"
    }

    fn generate_mutants(&self, ctxt: &MutationContext<'_>) -> Vec<Mutation> {
        let mut visitor = OverflowVisitor {
            ctxt,
            id: self.id(),
            mutants: Vec::new(),
            statement_expr: None,
            unchecked_depth: 0,
            loop_headers: Vec::new(),
        };
        let _ = visitor.visit_node(ctxt.unit);
        visitor.mutants
    }
}

struct OverflowVisitor<'c, 'a> {
    ctxt: &'c MutationContext<'a>,
    id: &'static str,
    mutants: Vec<Mutation>,
    /// Span of the expression directly owned by the expression statement being walked.
    statement_expr: Option<Span>,
    unchecked_depth: usize,
    /// Spans of the init and update statements of the `for` loops seen so far.
    loop_headers: Vec<Span>,
}

impl OverflowVisitor<'_, '_> {
    fn legacy(&self) -> bool {
        self.ctxt.version.is_legacy()
    }

    /// Records a legacy rewrite of `expr`, anchored on `stmt` minus its terminator.
    fn push_legacy(&mut self, stmt: &Node, expr: &Node, compose: impl FnOnce(String) -> String) {
        if !contains_safe_math(expr) || is_guard(expr, LEGACY_GUARDS) {
            return;
        }
        let (Some(span), Some(lines)) = (stmt.span(), stmt.lines()) else { return };
        let Some(anchor) = without_terminator(self.ctxt.source, span) else { return };
        let Some(raw) = render_raw(self.ctxt, expr) else { return };
        let mutated = compose(balance_parens(&raw));
        self.mutants.extend(self.ctxt.replace_span(anchor, lines, mutated, self.id));
    }
}

impl<'ast> Visit<'ast> for OverflowVisitor<'_, '_> {
    type BreakValue = ();

    fn visit_return(
        &mut self,
        node: &'ast Node,
        stmt: &'ast ReturnStatement,
    ) -> ControlFlow<Self::BreakValue> {
        if self.legacy()
            && let Some(expr) = stmt.expression.as_deref()
        {
            self.push_legacy(node, expr, |raw| format!("return {raw}"));
        }
        self.walk_node(node)
    }

    fn visit_expression_statement(
        &mut self,
        node: &'ast Node,
        stmt: &'ast ExpressionStatement,
    ) -> ControlFlow<Self::BreakValue> {
        let Some(expr) = stmt.expression.as_deref() else { return self.walk_node(node) };

        if self.legacy() {
            self.push_legacy(node, expr, |raw| raw);
        } else if self.unchecked_depth == 0
            && !is_guard(expr, MODERN_GUARDS)
            && expr.any(is_arithmetic)
            && node.span().is_some_and(|span| !self.loop_headers.contains(&span))
            && let Some(text) = self.ctxt.text(node)
        {
            let body = strip_terminator(text.trim());
            let mutated = format!("unchecked {{ {body}; }}");
            self.mutants.extend(self.ctxt.replace(node, mutated, self.id));
        }

        let outer = self.statement_expr.replace(expr.span().unwrap_or_default());
        let flow = self.walk_node(node);
        self.statement_expr = outer;
        flow
    }

    fn visit_variable_declaration_statement(
        &mut self,
        node: &'ast Node,
        stmt: &'ast VariableDeclarationStatement,
    ) -> ControlFlow<Self::BreakValue> {
        if self.legacy()
            && let Some(init) = stmt.initial_value.as_deref()
            && let Some((_, decl)) = stmt.single()
            && let Some(ty) = decl.type_name.as_deref().and_then(|ty| self.ctxt.text(ty))
            && let Some(name) = decl.name.as_deref()
        {
            let head = match decl.storage_location.as_deref() {
                Some(location) => format!("{ty} {location} {name}"),
                None => format!("{ty} {name}"),
            };
            self.push_legacy(node, init, |raw| format!("{head} = {raw}"));
        }
        self.walk_node(node)
    }

    fn visit_binary_operation(
        &mut self,
        node: &'ast Node,
        op: &'ast BinaryOperation,
    ) -> ControlFlow<Self::BreakValue> {
        // Assignments owned by an expression statement are covered by the statement rewrite.
        if self.legacy()
            && op.operator == "="
            && node.span().is_some_and(|span| Some(span) != self.statement_expr)
            && let Some(lhs) = assignable_text(self.ctxt, &op.left)
        {
            let lhs = lhs.to_string();
            self.push_legacy(node, &op.right, |raw| format!("{lhs} = {raw}"));
        }
        self.walk_node(node)
    }

    fn visit_for(
        &mut self,
        node: &'ast Node,
        stmt: &'ast ForStatement,
    ) -> ControlFlow<Self::BreakValue> {
        // `unchecked` blocks are statements, not loop header clauses.
        let headers = [&stmt.init_expression, &stmt.loop_expression];
        self.loop_headers.extend(headers.into_iter().flatten().filter_map(|node| node.span()));
        self.walk_node(node)
    }

    fn visit_unchecked(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast UncheckedStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.unchecked_depth += 1;
        let flow = self.walk_node(node);
        self.unchecked_depth -= 1;
        flow
    }
}

fn is_arithmetic(node: &Node) -> bool {
    matches!(
        &node.kind,
        NodeKind::BinaryOperation(op) if ARITHMETIC_OPS.contains(&op.operator.as_str())
    )
}

/// Whether `expr` is itself a call to one of the guard functions.
fn is_guard(expr: &Node, guards: &[&str]) -> bool {
    expr.as_call().and_then(FunctionCall::function_name).is_some_and(|name| guards.contains(&name))
}

/// `(operator, receiver, first argument)` of a library arithmetic call such as `a.add(b)`.
fn safe_math_call(node: &Node) -> Option<(&'static str, &Node, &Node)> {
    let call = node.as_call()?;
    let (receiver, method) = call.method()?;
    if receiver.as_identifier() == Some("SafeMath") {
        return None;
    }
    let operator = match method {
        "add" => "+",
        "sub" => "-",
        "mul" => "*",
        "div" => "/",
        "mod" => "%",
        _ => return None,
    };
    Some((operator, receiver, call.arguments.first()?))
}

fn contains_safe_math(node: &Node) -> bool {
    node.any(|node| safe_math_call(node).is_some())
}

/// Renders `node` with every library arithmetic call replaced by its raw-operator form.
fn render_raw(ctxt: &MutationContext<'_>, node: &Node) -> Option<String> {
    if let Some((operator, receiver, arg)) = safe_math_call(node) {
        let left = render_operand(ctxt, receiver)?;
        let right = render_operand(ctxt, arg)?;
        return Some(format!("({left} {operator} {right})"));
    }

    let mut edits = Vec::new();
    collect_safe_math(ctxt, node, &mut edits)?;
    let edits: Vec<_> = edits.iter().map(|(span, text)| (*span, text.as_str())).collect();
    rewrite(ctxt.source, node.span()?, &edits)
}

/// Raw rendering of an operand, parenthesized unless it already binds tighter than any
/// arithmetic operator.
fn render_operand(ctxt: &MutationContext<'_>, node: &Node) -> Option<String> {
    let raw = render_raw(ctxt, node)?;
    match node.kind {
        NodeKind::BinaryOperation(_) | NodeKind::UnaryOperation(_) | NodeKind::Conditional(_) => {
            Some(format!("({raw})"))
        }
        _ => Some(raw),
    }
}

fn collect_safe_math(
    ctxt: &MutationContext<'_>,
    node: &Node,
    edits: &mut Vec<(Span, String)>,
) -> Option<()> {
    for child in node.children() {
        if safe_math_call(child).is_some() {
            edits.push((child.span()?, render_raw(ctxt, child)?));
        } else {
            collect_safe_math(ctxt, child, edits)?;
        }
    }
    Some(())
}

/// Text of an assignment target the legacy rewrite can reproduce.
fn assignable_text<'a>(ctxt: &MutationContext<'a>, node: &Node) -> Option<&'a str> {
    match node.kind {
        NodeKind::Identifier(_) | NodeKind::IndexAccess(_) | NodeKind::MemberAccess(_) => {
            ctxt.text(node)
        }
        _ => None,
    }
}
