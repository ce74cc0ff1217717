//! Kind-dispatched traversal over [`Node`] trees.
//!
//! Implementors override the hooks for the node kinds they care about. Every hook defaults to
//! [`Visit::walk_node`], which visits the children in document order, so an overriding hook that
//! still wants to descend must call it itself.

use super::*;
use std::ops::ControlFlow;

pub trait Visit<'ast> {
    type BreakValue;

    fn visit_node(&mut self, node: &'ast Node) -> ControlFlow<Self::BreakValue> {
        match &node.kind {
            NodeKind::ContractDefinition(contract) => self.visit_contract(node, contract),
            NodeKind::StateVariableDeclaration(decl) => self.visit_state_variable(node, decl),
            NodeKind::FunctionDefinition(func) => self.visit_function(node, func),
            NodeKind::ModifierDefinition(modifier) => self.visit_modifier(node, modifier),
            NodeKind::Block(block) => self.visit_block(node, block),
            NodeKind::ExpressionStatement(stmt) => self.visit_expression_statement(node, stmt),
            NodeKind::VariableDeclarationStatement(stmt) => {
                self.visit_variable_declaration_statement(node, stmt)
            }
            NodeKind::ReturnStatement(stmt) => self.visit_return(node, stmt),
            NodeKind::IfStatement(stmt) => self.visit_if(node, stmt),
            NodeKind::ForStatement(stmt) => self.visit_for(node, stmt),
            NodeKind::UncheckedStatement(stmt) => self.visit_unchecked(node, stmt),
            NodeKind::VariableDeclaration(decl) => self.visit_variable_declaration(node, decl),
            NodeKind::MemberAccess(access) => self.visit_member_access(node, access),
            NodeKind::BinaryOperation(op) => self.visit_binary_operation(node, op),
            NodeKind::FunctionCall(call) => self.visit_function_call(node, call),
            NodeKind::Identifier(ident) => self.visit_identifier(node, ident),
            _ => self.walk_node(node),
        }
    }

    fn walk_node(&mut self, node: &'ast Node) -> ControlFlow<Self::BreakValue> {
        for child in node.children() {
            self.visit_node(child)?;
        }
        ControlFlow::Continue(())
    }

    fn visit_contract(
        &mut self,
        node: &'ast Node,
        _contract: &'ast ContractDefinition,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_state_variable(
        &mut self,
        node: &'ast Node,
        _decl: &'ast StateVariableDeclaration,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_function(
        &mut self,
        node: &'ast Node,
        _func: &'ast FunctionDefinition,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_modifier(
        &mut self,
        node: &'ast Node,
        _modifier: &'ast ModifierDefinition,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_block(
        &mut self,
        node: &'ast Node,
        _block: &'ast Block,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_expression_statement(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast ExpressionStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_variable_declaration_statement(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast VariableDeclarationStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_return(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast ReturnStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_if(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast IfStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_for(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast ForStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_unchecked(
        &mut self,
        node: &'ast Node,
        _stmt: &'ast UncheckedStatement,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_variable_declaration(
        &mut self,
        node: &'ast Node,
        _decl: &'ast VariableDeclaration,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_member_access(
        &mut self,
        node: &'ast Node,
        _access: &'ast MemberAccess,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_binary_operation(
        &mut self,
        node: &'ast Node,
        _op: &'ast BinaryOperation,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_function_call(
        &mut self,
        node: &'ast Node,
        _call: &'ast FunctionCall,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }

    fn visit_identifier(
        &mut self,
        node: &'ast Node,
        _ident: &'ast Identifier,
    ) -> ControlFlow<Self::BreakValue> {
        self.walk_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FirstCall;

    impl<'ast> Visit<'ast> for FirstCall {
        type BreakValue = &'ast str;

        fn visit_function_call(
            &mut self,
            node: &'ast Node,
            call: &'ast FunctionCall,
        ) -> ControlFlow<Self::BreakValue> {
            if let Some(name) = call.function_name() {
                return ControlFlow::Break(name);
            }
            self.walk_node(node)
        }
    }

    #[test]
    fn breaks_on_first_match() {
        let node: Node = serde_json::from_str(
            r#"{
                "type": "Block",
                "statements": [
                    {"type": "ExpressionStatement", "expression": {
                        "type": "FunctionCall",
                        "expression": {"type": "Identifier", "name": "first"},
                        "arguments": [{
                            "type": "FunctionCall",
                            "expression": {"type": "Identifier", "name": "inner"},
                            "arguments": []
                        }]
                    }},
                    {"type": "ExpressionStatement", "expression": {
                        "type": "FunctionCall",
                        "expression": {"type": "Identifier", "name": "second"},
                        "arguments": []
                    }}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(FirstCall.visit_node(&node), ControlFlow::Break("first"));
    }
}
