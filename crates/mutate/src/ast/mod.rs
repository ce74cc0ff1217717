//! Owned view over the JSON syntax tree produced by `@solidity-parser/parser`.
//!
//! The parser is run out of process with `range` and `loc` enabled; its output is decoded here
//! into a closed set of node kinds. Node kinds the mutators never inspect decode to
//! [`NodeKind::Unknown`], which keeps its positional metadata but no children.

use serde::{Deserialize, Serialize};

mod types;
pub use types::{TypeInfo, default_value};

pub mod visit;
pub use visit::Visit;

/// A half-open byte range into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub const fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi }
    }

    pub const fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    pub const fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    pub const fn contains(&self, offset: usize) -> bool {
        self.lo <= offset && offset < self.hi
    }

    pub const fn contains_span(&self, other: Self) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    /// Returns the span starting at `self` and ending at `other`.
    pub const fn to(self, other: Self) -> Self {
        Self { lo: self.lo, hi: other.hi }
    }
}

/// A line/column pair. Lines are 1-based, columns 0-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loc {
    pub start: Position,
    pub end: Position,
}

/// A syntax node: its kind-specific payload plus positional metadata.
///
/// `range` is the inclusive `[start, end]` byte range into the source. The parser reports it in
/// UTF-16 code units, [`SourceFile`](crate::SourceFile) translates it on load. It is only ever
/// consumed through [`Node::span`], which turns it into a half-open [`Span`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    SourceUnit(SourceUnit),
    PragmaDirective(PragmaDirective),
    ContractDefinition(ContractDefinition),
    StructDefinition(StructDefinition),
    StateVariableDeclaration(StateVariableDeclaration),
    VariableDeclaration(VariableDeclaration),
    FunctionDefinition(FunctionDefinition),
    ModifierDefinition(ModifierDefinition),
    Block(Block),
    ExpressionStatement(ExpressionStatement),
    VariableDeclarationStatement(VariableDeclarationStatement),
    ReturnStatement(ReturnStatement),
    IfStatement(IfStatement),
    ForStatement(ForStatement),
    WhileStatement(WhileStatement),
    DoWhileStatement(WhileStatement),
    EmitStatement(EmitStatement),
    RevertStatement(RevertStatement),
    UncheckedStatement(UncheckedStatement),
    TryStatement(TryStatement),
    CatchClause(CatchClause),
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    Identifier(Identifier),
    NumberLiteral(NumberLiteral),
    BooleanLiteral(BooleanLiteral),
    StringLiteral(StringLiteral),
    HexLiteral(StringLiteral),
    MemberAccess(MemberAccess),
    IndexAccess(IndexAccess),
    IndexRangeAccess(IndexRangeAccess),
    BinaryOperation(BinaryOperation),
    UnaryOperation(UnaryOperation),
    FunctionCall(FunctionCall),
    NameValueExpression(NameValueExpression),
    NameValueList(NameValueList),
    TupleExpression(TupleExpression),
    Conditional(Conditional),
    NewExpression(TypeNameExpression),
    TypeNameExpression(TypeNameExpression),
    ElementaryTypeName(ElementaryTypeName),
    UserDefinedTypeName(UserDefinedTypeName),
    Mapping(Mapping),
    ArrayTypeName(ArrayTypeName),
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PragmaDirective {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub name: String,
    /// One of `contract`, `abstract`, `interface` or `library`.
    pub kind: String,
    #[serde(default)]
    pub base_contracts: Vec<Node>,
    #[serde(default)]
    pub sub_nodes: Vec<Node>,
}

impl ContractDefinition {
    pub fn is_interface_or_library(&self) -> bool {
        matches!(self.kind.as_str(), "interface" | "library")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StructDefinition {
    pub name: String,
    #[serde(default)]
    pub members: Vec<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateVariableDeclaration {
    #[serde(default)]
    pub variables: Vec<Node>,
    pub initial_value: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub type_name: Option<Box<Node>>,
    pub name: Option<String>,
    pub expression: Option<Box<Node>>,
    pub visibility: Option<String>,
    pub storage_location: Option<String>,
    #[serde(default)]
    pub is_state_var: bool,
    #[serde(default)]
    pub is_declared_const: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Node>,
    pub return_parameters: Option<Vec<Node>>,
    pub body: Option<Box<Node>>,
    #[serde(default)]
    pub visibility: String,
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub is_receive_ether: bool,
    #[serde(default)]
    pub is_fallback: bool,
}

impl FunctionDefinition {
    /// The declared name, or the keyword for the special functions.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if self.is_constructor => "constructor",
            _ if self.is_receive_ether => "receive",
            _ => "fallback",
        }
    }

    /// Named, non-special function.
    pub fn plain_name(&self) -> Option<&str> {
        if self.is_constructor || self.is_fallback || self.is_receive_ether {
            return None;
        }
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModifierDefinition {
    pub name: String,
    pub parameters: Option<Vec<Node>>,
    pub body: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclarationStatement {
    #[serde(default)]
    pub variables: Vec<Option<Node>>,
    pub initial_value: Option<Box<Node>>,
}

impl VariableDeclarationStatement {
    /// The declared variable when exactly one is declared.
    pub fn single(&self) -> Option<(&Node, &VariableDeclaration)> {
        match self.variables.as_slice() {
            [Some(node)] => match &node.kind {
                NodeKind::VariableDeclaration(decl) => Some((node, decl)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub expression: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub true_body: Box<Node>,
    pub false_body: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForStatement {
    pub init_expression: Option<Box<Node>>,
    pub condition_expression: Option<Box<Node>>,
    pub loop_expression: Option<Box<Node>>,
    pub body: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitStatement {
    pub event_call: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertStatement {
    pub revert_call: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UncheckedStatement {
    pub block: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryStatement {
    pub expression: Box<Node>,
    pub return_parameters: Option<Vec<Node>>,
    pub body: Box<Node>,
    #[serde(default)]
    pub catch_clauses: Vec<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatchClause {
    pub parameters: Option<Vec<Node>>,
    pub body: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub number: String,
    pub subdenomination: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAccess {
    pub expression: Box<Node>,
    pub member_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexAccess {
    pub base: Box<Node>,
    pub index: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRangeAccess {
    pub base: Box<Node>,
    pub index_start: Option<Box<Node>>,
    pub index_end: Option<Box<Node>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub operator: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl BinaryOperation {
    pub fn is_assignment(&self) -> bool {
        matches!(
            self.operator.as_str(),
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "|=" | "&=" | "^=" | "<<=" | ">>="
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnaryOperation {
    pub operator: String,
    pub sub_expression: Box<Node>,
    #[serde(default)]
    pub is_prefix: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionCall {
    pub expression: Box<Node>,
    #[serde(default)]
    pub arguments: Vec<Node>,
    #[serde(default)]
    pub names: Vec<String>,
}

impl FunctionCall {
    /// The called expression with any `{value: .., gas: ..}` call options stripped.
    pub fn callee(&self) -> &Node {
        match &self.expression.kind {
            NodeKind::NameValueExpression(options) => &*options.expression,
            _ => &*self.expression,
        }
    }

    pub fn has_call_options(&self) -> bool {
        matches!(self.expression.kind, NodeKind::NameValueExpression(_))
    }

    /// Name of a plain identifier callee, `foo` in `foo(..)`.
    pub fn function_name(&self) -> Option<&str> {
        self.callee().as_identifier()
    }

    /// Member name of a member-access callee, `transfer` in `token.transfer(..)`, along with
    /// its receiver.
    pub fn method(&self) -> Option<(&Node, &str)> {
        self.callee().as_member_access()
    }

    /// Positional call with named arguments absent.
    pub fn is_positional(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the call is a type conversion such as `uint256(x)`, `address(0)` or
    /// `payable(to)` rather than a real call.
    pub fn is_conversion(&self) -> bool {
        match &self.callee().kind {
            NodeKind::ElementaryTypeName(_) | NodeKind::TypeNameExpression(_) => true,
            NodeKind::Identifier(ident) => matches!(ident.name.as_str(), "payable" | "type"),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameValueExpression {
    pub expression: Box<Node>,
    pub arguments: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NameValueList {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleExpression {
    #[serde(default)]
    pub components: Vec<Option<Node>>,
    #[serde(default)]
    pub is_array: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    pub condition: Box<Node>,
    pub true_expression: Box<Node>,
    pub false_expression: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNameExpression {
    pub type_name: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryTypeName {
    pub name: String,
    pub state_mutability: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedTypeName {
    pub name_path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub key_type: Box<Node>,
    pub value_type: Box<Node>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTypeName {
    pub base_type_name: Box<Node>,
    pub length: Option<Box<Node>>,
}

impl Node {
    /// Half-open byte span, `None` when the parser did not record a range.
    pub fn span(&self) -> Option<Span> {
        let [lo, end] = self.range?;
        let hi = end.checked_add(1).filter(|hi| *hi >= lo)?;
        Some(Span::new(lo, hi))
    }

    /// First and last line, `None` when the parser did not record a location.
    pub fn lines(&self) -> Option<(usize, usize)> {
        self.loc.map(|loc| (loc.start.line, loc.end.line))
    }

    /// The node's source text.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        let span = self.span()?;
        source.get(span.lo..span.hi)
    }

    /// Direct children in document order.
    pub fn children(&self) -> Vec<&Self> {
        let mut out: Vec<&Self> = Vec::new();
        match &self.kind {
            NodeKind::SourceUnit(unit) => out.extend(&unit.children),
            NodeKind::ContractDefinition(contract) => {
                out.extend(&contract.base_contracts);
                out.extend(&contract.sub_nodes);
            }
            NodeKind::StructDefinition(def) => out.extend(&def.members),
            NodeKind::StateVariableDeclaration(decl) => {
                out.extend(&decl.variables);
                // The parser mirrors the initializer on the declared variable; only fall back to
                // the statement-level copy when it did not.
                let mirrored = decl.variables.iter().any(|var| match &var.kind {
                    NodeKind::VariableDeclaration(var) => var.expression.is_some(),
                    _ => false,
                });
                if !mirrored {
                    out.extend(decl.initial_value.as_deref());
                }
            }
            NodeKind::VariableDeclaration(decl) => {
                out.extend(decl.type_name.as_deref());
                out.extend(decl.expression.as_deref());
            }
            NodeKind::FunctionDefinition(func) => {
                out.extend(&func.parameters);
                out.extend(func.return_parameters.iter().flatten());
                out.extend(func.body.as_deref());
            }
            NodeKind::ModifierDefinition(modifier) => {
                out.extend(modifier.parameters.iter().flatten());
                out.extend(modifier.body.as_deref());
            }
            NodeKind::Block(block) => out.extend(&block.statements),
            NodeKind::ExpressionStatement(stmt) => out.extend(stmt.expression.as_deref()),
            NodeKind::VariableDeclarationStatement(stmt) => {
                out.extend(stmt.variables.iter().flatten());
                out.extend(stmt.initial_value.as_deref());
            }
            NodeKind::ReturnStatement(stmt) => out.extend(stmt.expression.as_deref()),
            NodeKind::IfStatement(stmt) => {
                out.push(&stmt.condition);
                out.push(&stmt.true_body);
                out.extend(stmt.false_body.as_deref());
            }
            NodeKind::ForStatement(stmt) => {
                out.extend(stmt.init_expression.as_deref());
                out.extend(stmt.condition_expression.as_deref());
                out.extend(stmt.loop_expression.as_deref());
                out.push(&stmt.body);
            }
            NodeKind::WhileStatement(stmt) => {
                out.push(&stmt.condition);
                out.push(&stmt.body);
            }
            NodeKind::DoWhileStatement(stmt) => {
                out.push(&stmt.body);
                out.push(&stmt.condition);
            }
            NodeKind::EmitStatement(stmt) => out.push(&stmt.event_call),
            NodeKind::RevertStatement(stmt) => out.push(&stmt.revert_call),
            NodeKind::UncheckedStatement(stmt) => out.push(&stmt.block),
            NodeKind::TryStatement(stmt) => {
                out.push(&stmt.expression);
                out.extend(stmt.return_parameters.iter().flatten());
                out.push(&stmt.body);
                out.extend(&stmt.catch_clauses);
            }
            NodeKind::CatchClause(clause) => {
                out.extend(clause.parameters.iter().flatten());
                out.push(&clause.body);
            }
            NodeKind::MemberAccess(access) => out.push(&access.expression),
            NodeKind::IndexAccess(access) => {
                out.push(&access.base);
                out.extend(access.index.as_deref());
            }
            NodeKind::IndexRangeAccess(access) => {
                out.push(&access.base);
                out.extend(access.index_start.as_deref());
                out.extend(access.index_end.as_deref());
            }
            NodeKind::BinaryOperation(op) => {
                out.push(&op.left);
                out.push(&op.right);
            }
            NodeKind::UnaryOperation(op) => out.push(&op.sub_expression),
            NodeKind::FunctionCall(call) => {
                out.push(&call.expression);
                out.extend(&call.arguments);
            }
            NodeKind::NameValueExpression(expr) => {
                out.push(&expr.expression);
                out.push(&expr.arguments);
            }
            NodeKind::NameValueList(list) => out.extend(&list.arguments),
            NodeKind::TupleExpression(tuple) => out.extend(tuple.components.iter().flatten()),
            NodeKind::Conditional(cond) => {
                out.push(&cond.condition);
                out.push(&cond.true_expression);
                out.push(&cond.false_expression);
            }
            NodeKind::NewExpression(expr) | NodeKind::TypeNameExpression(expr) => {
                out.push(&expr.type_name)
            }
            NodeKind::Mapping(mapping) => {
                out.push(&mapping.key_type);
                out.push(&mapping.value_type);
            }
            NodeKind::ArrayTypeName(array) => {
                out.push(&array.base_type_name);
                out.extend(array.length.as_deref());
            }
            NodeKind::PragmaDirective(_)
            | NodeKind::ThrowStatement
            | NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::Identifier(_)
            | NodeKind::NumberLiteral(_)
            | NodeKind::BooleanLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::HexLiteral(_)
            | NodeKind::ElementaryTypeName(_)
            | NodeKind::UserDefinedTypeName(_)
            | NodeKind::Unknown => {}
        }
        out
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Pre-order iterator over the descendants, excluding this node.
    pub fn descendants(&self) -> PreOrder<'_> {
        let mut stack = self.children();
        stack.reverse();
        PreOrder { stack }
    }

    pub fn any(&self, mut pred: impl FnMut(&Self) -> bool) -> bool {
        self.pre_order().any(|node| pred(node))
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// `(receiver, member)` for a member access.
    pub fn as_member_access(&self) -> Option<(&Self, &str)> {
        match &self.kind {
            NodeKind::MemberAccess(access) => {
                Some((&*access.expression, access.member_name.as_str()))
            }
            _ => None,
        }
    }

    /// Whether this is `object.member` with `object` a plain identifier, e.g. `block.timestamp`.
    pub fn is_member_of(&self, object: &str, member: &str) -> bool {
        self.as_member_access().is_some_and(|(receiver, name)| {
            name == member && receiver.as_identifier() == Some(object)
        })
    }

    pub fn as_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            NodeKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    /// A function call that is not a type conversion.
    pub fn is_call(&self) -> bool {
        self.as_call().is_some_and(|call| !call.is_conversion())
    }

    /// The call if this is a call to the plain function `name`.
    pub fn as_call_to(&self, name: &str) -> Option<&FunctionCall> {
        self.as_call().filter(|call| call.function_name() == Some(name))
    }

    /// Whether the node is the statement or expression that unconditionally aborts execution.
    pub fn is_abort(&self) -> bool {
        match &self.kind {
            NodeKind::ThrowStatement | NodeKind::RevertStatement(_) => true,
            NodeKind::ExpressionStatement(stmt) => {
                stmt.expression.as_deref().is_some_and(|expr| expr.as_call_to("revert").is_some())
            }
            _ => false,
        }
    }
}

/// See [`Node::pre_order`].
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_tagged_nodes_with_ranges() {
        let node = parse(
            r#"{
                "type": "MemberAccess",
                "expression": {"type": "Identifier", "name": "block", "range": [10, 14]},
                "memberName": "timestamp",
                "range": [10, 24],
                "loc": {"start": {"line": 2, "column": 4}, "end": {"line": 2, "column": 10}}
            }"#,
        );
        assert!(node.is_member_of("block", "timestamp"));
        assert_eq!(node.span(), Some(Span::new(10, 25)));
        assert_eq!(node.lines(), Some((2, 2)));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn unknown_kinds_keep_metadata() {
        let node = parse(
            r#"{"type": "EventDefinition", "name": "Sent", "parameters": [], "range": [0, 17]}"#,
        );
        assert!(matches!(node.kind, NodeKind::Unknown));
        assert_eq!(node.span(), Some(Span::new(0, 18)));
        assert!(node.children().is_empty());
    }

    #[test]
    fn missing_range_has_no_span() {
        let node = parse(r#"{"type": "Identifier", "name": "x"}"#);
        assert_eq!(node.span(), None);
        assert_eq!(node.text("x"), None);
    }

    #[test]
    fn pre_order_is_document_order() {
        let node = parse(
            r#"{
                "type": "BinaryOperation",
                "operator": "+",
                "left": {"type": "Identifier", "name": "a"},
                "right": {
                    "type": "FunctionCall",
                    "expression": {"type": "Identifier", "name": "f"},
                    "arguments": [{"type": "Identifier", "name": "b"}],
                    "names": []
                }
            }"#,
        );
        let names: Vec<_> = node.pre_order().filter_map(Node::as_identifier).collect();
        assert_eq!(names, ["a", "f", "b"]);
        assert_eq!(node.descendants().count(), 4);
    }

    #[test]
    fn conversions_are_not_calls() {
        let conversion = parse(
            r#"{
                "type": "FunctionCall",
                "expression": {"type": "ElementaryTypeName", "name": "address"},
                "arguments": [{"type": "NumberLiteral", "number": "0"}]
            }"#,
        );
        assert!(!conversion.is_call());

        let call = parse(
            r#"{
                "type": "FunctionCall",
                "expression": {
                    "type": "NameValueExpression",
                    "expression": {
                        "type": "MemberAccess",
                        "expression": {"type": "Identifier", "name": "to"},
                        "memberName": "call"
                    },
                    "arguments": {"type": "NameValueList", "names": ["value"], "arguments": []}
                },
                "arguments": []
            }"#,
        );
        let inner = call.as_call().unwrap();
        assert!(call.is_call());
        assert!(inner.has_call_options());
        assert_eq!(inner.method().map(|(_, name)| name), Some("call"));
    }
}
