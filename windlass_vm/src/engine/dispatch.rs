// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The syntax operation table.
//!
//! Evaluation of every AST node is routed through a table keyed by
//! (syntax operation, node kind). Plugins register handlers at install
//! time; handlers are tried in registration order until one returns
//! something other than [`HandlerResult::NotApplicable`], so a feature
//! plugin can override or extend the base language behaviour without
//! touching it.

use ahash::AHashMap;
use oxc_ast::ast;

use super::fiber::FrameStep;
use crate::ecmascript::execution::{Agent, ExceptionType, JsResult};
use crate::ecmascript::types::{PropertyKey, Value};

/// The syntax-directed operations the evaluator dispatches through the
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxOperation {
    Evaluate,
    NamedEvaluation,
    InstantiateFunctionObject,
    BindingInitialization,
    IteratorBindingInitialization,
    LabelledEvaluation,
}

/// Coarse node kinds, the second half of the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Expressions
    Literal,
    Identifier,
    ThisExpression,
    ArrayExpression,
    ObjectExpression,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassExpression,
    TemplateLiteral,
    TaggedTemplateExpression,
    MemberExpression,
    CallExpression,
    NewExpression,
    MetaProperty,
    UpdateExpression,
    UnaryExpression,
    BinaryExpression,
    LogicalExpression,
    ConditionalExpression,
    AssignmentExpression,
    SequenceExpression,
    YieldExpression,
    AwaitExpression,
    ChainExpression,
    ParenthesizedExpression,
    // Statements
    BlockStatement,
    VariableDeclaration,
    EmptyStatement,
    ExpressionStatement,
    IfStatement,
    DoWhileStatement,
    WhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    ContinueStatement,
    BreakStatement,
    ReturnStatement,
    WithStatement,
    LabeledStatement,
    SwitchStatement,
    ThrowStatement,
    TryStatement,
    DebuggerStatement,
    FunctionDeclaration,
    ClassDeclaration,
    // Binding forms
    BindingPattern,
    FormalParameters,
}

/// A node plus any operation-specific payload, handed to syntax handlers.
#[derive(Clone, Copy)]
pub enum SyntaxRequest {
    Evaluate {
        node: EvalNode,
    },
    NamedEvaluation {
        node: EvalNode,
        name: PropertyKey,
    },
    LabelledEvaluation {
        node: EvalNode,
        label: crate::ecmascript::types::HeapString,
    },
}

#[derive(Clone, Copy)]
pub enum EvalNode {
    Expression(&'static ast::Expression<'static>),
    Statement(&'static ast::Statement<'static>),
}

impl EvalNode {
    pub fn kind(self) -> SyntaxKind {
        match self {
            EvalNode::Expression(expression) => expression_kind(expression),
            EvalNode::Statement(statement) => statement_kind(statement),
        }
    }
}

pub fn expression_kind(expression: &ast::Expression<'_>) -> SyntaxKind {
    use ast::Expression;
    match expression {
        Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::StringLiteral(_) => SyntaxKind::Literal,
        Expression::Identifier(_) => SyntaxKind::Identifier,
        Expression::ThisExpression(_) => SyntaxKind::ThisExpression,
        Expression::ArrayExpression(_) => SyntaxKind::ArrayExpression,
        Expression::ObjectExpression(_) => SyntaxKind::ObjectExpression,
        Expression::FunctionExpression(_) => SyntaxKind::FunctionExpression,
        Expression::ArrowFunctionExpression(_) => SyntaxKind::ArrowFunctionExpression,
        Expression::ClassExpression(_) => SyntaxKind::ClassExpression,
        Expression::TemplateLiteral(_) => SyntaxKind::TemplateLiteral,
        Expression::TaggedTemplateExpression(_) => SyntaxKind::TaggedTemplateExpression,
        Expression::ComputedMemberExpression(_)
        | Expression::StaticMemberExpression(_)
        | Expression::PrivateFieldExpression(_) => SyntaxKind::MemberExpression,
        Expression::CallExpression(_) | Expression::ImportExpression(_) => {
            SyntaxKind::CallExpression
        }
        Expression::NewExpression(_) => SyntaxKind::NewExpression,
        Expression::MetaProperty(_) => SyntaxKind::MetaProperty,
        Expression::UpdateExpression(_) => SyntaxKind::UpdateExpression,
        Expression::UnaryExpression(_) => SyntaxKind::UnaryExpression,
        Expression::BinaryExpression(_) | Expression::PrivateInExpression(_) => {
            SyntaxKind::BinaryExpression
        }
        Expression::LogicalExpression(_) => SyntaxKind::LogicalExpression,
        Expression::ConditionalExpression(_) => SyntaxKind::ConditionalExpression,
        Expression::AssignmentExpression(_) => SyntaxKind::AssignmentExpression,
        Expression::SequenceExpression(_) => SyntaxKind::SequenceExpression,
        Expression::YieldExpression(_) => SyntaxKind::YieldExpression,
        Expression::AwaitExpression(_) => SyntaxKind::AwaitExpression,
        Expression::ChainExpression(_) => SyntaxKind::ChainExpression,
        Expression::ParenthesizedExpression(_) => SyntaxKind::ParenthesizedExpression,
        Expression::Super(_) => SyntaxKind::Identifier,
        _ => SyntaxKind::Literal,
    }
}

pub fn statement_kind(statement: &ast::Statement<'_>) -> SyntaxKind {
    use ast::Statement;
    match statement {
        Statement::BlockStatement(_) => SyntaxKind::BlockStatement,
        Statement::VariableDeclaration(_) => SyntaxKind::VariableDeclaration,
        Statement::EmptyStatement(_) => SyntaxKind::EmptyStatement,
        Statement::ExpressionStatement(_) => SyntaxKind::ExpressionStatement,
        Statement::IfStatement(_) => SyntaxKind::IfStatement,
        Statement::DoWhileStatement(_) => SyntaxKind::DoWhileStatement,
        Statement::WhileStatement(_) => SyntaxKind::WhileStatement,
        Statement::ForStatement(_) => SyntaxKind::ForStatement,
        Statement::ForInStatement(_) => SyntaxKind::ForInStatement,
        Statement::ForOfStatement(_) => SyntaxKind::ForOfStatement,
        Statement::ContinueStatement(_) => SyntaxKind::ContinueStatement,
        Statement::BreakStatement(_) => SyntaxKind::BreakStatement,
        Statement::ReturnStatement(_) => SyntaxKind::ReturnStatement,
        Statement::WithStatement(_) => SyntaxKind::WithStatement,
        Statement::LabeledStatement(_) => SyntaxKind::LabeledStatement,
        Statement::SwitchStatement(_) => SyntaxKind::SwitchStatement,
        Statement::ThrowStatement(_) => SyntaxKind::ThrowStatement,
        Statement::TryStatement(_) => SyntaxKind::TryStatement,
        Statement::DebuggerStatement(_) => SyntaxKind::DebuggerStatement,
        Statement::FunctionDeclaration(_) => SyntaxKind::FunctionDeclaration,
        Statement::ClassDeclaration(_) => SyntaxKind::ClassDeclaration,
        _ => SyntaxKind::EmptyStatement,
    }
}

/// What a syntax handler produced.
pub enum HandlerResult {
    /// The handler does not apply to this node; try the next one.
    NotApplicable,
    /// The operation continues on the fiber with this step.
    Step(FrameStep),
    /// The operation completed immediately with a value or a throw.
    Value(JsResult<Value>),
}

pub type SyntaxHandler = fn(&mut Agent, SyntaxRequest) -> HandlerResult;

/// The registry of syntax handlers, keyed by (operation, node kind).
/// Multiple handlers per key are tried in registration order.
#[derive(Debug, Default)]
pub struct SyntaxTable {
    handlers: AHashMap<(SyntaxOperation, SyntaxKind), Vec<SyntaxHandler>>,
}

impl SyntaxTable {
    pub fn register(
        &mut self,
        operation: SyntaxOperation,
        kind: SyntaxKind,
        handler: SyntaxHandler,
    ) {
        self.handlers
            .entry((operation, kind))
            .or_default()
            .push(handler);
    }

    /// Registers a handler ahead of the existing ones, letting a feature
    /// plugin override a default.
    pub fn register_override(
        &mut self,
        operation: SyntaxOperation,
        kind: SyntaxKind,
        handler: SyntaxHandler,
    ) {
        self.handlers
            .entry((operation, kind))
            .or_default()
            .insert(0, handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn get(&self, operation: SyntaxOperation, kind: SyntaxKind) -> Option<&[SyntaxHandler]> {
        self.handlers
            .get(&(operation, kind))
            .map(|handlers| handlers.as_slice())
    }
}

/// Routes one operation through the table. The first applicable handler
/// wins; a node kind with no applicable handler is unsupported syntax.
pub fn dispatch(agent: &mut Agent, operation: SyntaxOperation, request: SyntaxRequest) -> FrameStep {
    let node = match request {
        SyntaxRequest::Evaluate { node } => node,
        SyntaxRequest::NamedEvaluation { node, .. } => node,
        SyntaxRequest::LabelledEvaluation { node, .. } => node,
    };
    let kind = node.kind();
    // The handler list is a small vector of fn pointers; clone it so the
    // handlers may re-enter the table through the agent.
    let handlers: Vec<SyntaxHandler> = agent
        .syntax_table()
        .get(operation, kind)
        .map(|handlers| handlers.to_vec())
        .unwrap_or_default();
    for handler in handlers {
        match handler(agent, request) {
            HandlerResult::NotApplicable => continue,
            HandlerResult::Step(step) => return step,
            HandlerResult::Value(Ok(value)) => {
                return FrameStep::Done(crate::ecmascript::types::Completion::normal(value));
            }
            HandlerResult::Value(Err(err)) => {
                return FrameStep::Done(crate::ecmascript::types::Completion::Throw(err));
            }
        }
    }
    let err = agent.throw_exception(
        ExceptionType::SyntaxError,
        format!("No syntax handler applies to {kind:?}"),
    );
    FrameStep::Done(crate::ecmascript::types::Completion::Throw(err))
}
