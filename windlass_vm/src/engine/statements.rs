// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Statement evaluation frames: the completion algebra of loops, switch,
//! try/catch/finally, and labelled statements.

use oxc_ast::ast;

use super::dispatch::{dispatch, EvalNode, SyntaxOperation, SyntaxRequest};
use super::expressions::{is_anonymous_function_definition, named_expression_frame, value_of};
use super::fiber::{Frame, FrameStep};
use super::patterns::{binding_initialization_for_pattern, destructuring_assignment_evaluation};
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::{
    get_iterator, iterator_close, iterator_step_value, IteratorRecord,
};
use crate::ecmascript::abstract_operations::testing_and_comparison::is_strictly_equal;
use crate::ecmascript::abstract_operations::type_conversion::to_object;
use crate::ecmascript::execution::agent::resolve_binding;
use crate::ecmascript::execution::{
    new_declarative_environment, new_object_environment, Agent, EnvironmentIndex, ExceptionType,
    JsError, JsResult,
};
use crate::ecmascript::syntax_directed_operations::class_definitions::class_definition_evaluation;
use crate::ecmascript::syntax_directed_operations::function_definitions::instantiate_ordinary_function_object;
use crate::ecmascript::syntax_directed_operations::scope_analysis::{
    statements_lexically_scoped_declarations, LexicallyScopedDeclaration,
};
use crate::ecmascript::types::{Completion, HeapString, Object, PropertyKey, Value};

fn throw_step(err: JsError) -> FrameStep {
    FrameStep::Done(Completion::Throw(err))
}

fn empty_step() -> FrameStep {
    FrameStep::Done(Completion::EMPTY)
}

/// The generic statement dispatcher frame.
#[derive(Debug)]
pub struct StatementFrame {
    node: &'static ast::Statement<'static>,
}

impl StatementFrame {
    pub(crate) fn step(&mut self, agent: &mut Agent) -> FrameStep {
        dispatch(
            agent,
            SyntaxOperation::Evaluate,
            SyntaxRequest::Evaluate {
                node: EvalNode::Statement(self.node),
            },
        )
    }
}

pub(crate) fn statement_frame(node: &'static ast::Statement<'static>) -> Frame {
    Frame::Statement(StatementFrame { node })
}

/// ### [14 ECMAScript Language: Statements and Declarations](https://tc39.es/ecma262/#sec-ecmascript-language-statements-and-declarations)
///
/// The base-language `Evaluate` behaviour for statements.
pub(crate) fn begin_statement(
    agent: &mut Agent,
    node: &'static ast::Statement<'static>,
) -> FrameStep {
    use ast::Statement;
    match node {
        Statement::EmptyStatement(_) | Statement::DebuggerStatement(_) => empty_step(),
        // Function declarations were instantiated during declaration
        // instantiation; their evaluation is empty.
        Statement::FunctionDeclaration(_) => empty_step(),
        Statement::ClassDeclaration(class) => {
            // ### [15.7.16 BindingClassDeclarationEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-bindingclassdeclarationevaluation)
            let result = (|| -> JsResult<()> {
                let value = class_definition_evaluation(agent, class, None)?;
                if let Some(id) = &class.id {
                    let name = HeapString::from_str(agent, id.name.as_str());
                    let env = agent.current_lexical_environment();
                    env.initialize_binding(agent, name, Value::Object(value))?;
                }
                Ok(())
            })();
            match result {
                Ok(()) => empty_step(),
                Err(err) => throw_step(err),
            }
        }
        Statement::ExpressionStatement(statement) => {
            FrameStep::Replace(Frame::expression(&statement.expression))
        }
        Statement::BlockStatement(block) => {
            FrameStep::Replace(Frame::Block(BlockFrame::new(&block.body)))
        }
        Statement::VariableDeclaration(declaration) => FrameStep::Replace(
            Frame::VariableDeclaration(VariableDeclarationFrame::new(declaration)),
        ),
        Statement::IfStatement(statement) => {
            FrameStep::Replace(Frame::If(IfFrame::new(statement)))
        }
        Statement::WhileStatement(statement) => {
            FrameStep::Replace(Frame::While(WhileFrame::new(statement, Vec::new())))
        }
        Statement::DoWhileStatement(statement) => {
            FrameStep::Replace(Frame::DoWhile(DoWhileFrame::new(statement, Vec::new())))
        }
        Statement::ForStatement(statement) => {
            FrameStep::Replace(Frame::For(ForFrame::new(statement, Vec::new())))
        }
        Statement::ForInStatement(statement) => {
            FrameStep::Replace(Frame::ForIn(ForInFrame::new(statement, Vec::new())))
        }
        Statement::ForOfStatement(statement) => {
            FrameStep::Replace(Frame::ForOf(ForOfFrame::new(statement, Vec::new())))
        }
        Statement::SwitchStatement(statement) => {
            FrameStep::Replace(Frame::Switch(SwitchFrame::new(statement, Vec::new())))
        }
        Statement::LabeledStatement(_) => begin_labelled_statement(agent, node),
        Statement::BreakStatement(statement) => {
            let label = statement
                .label
                .as_ref()
                .map(|label| HeapString::from_str(agent, label.name.as_str()));
            FrameStep::Done(Completion::Break(label))
        }
        Statement::ContinueStatement(statement) => {
            let label = statement
                .label
                .as_ref()
                .map(|label| HeapString::from_str(agent, label.name.as_str()));
            FrameStep::Done(Completion::Continue(label))
        }
        Statement::ReturnStatement(statement) => {
            FrameStep::Replace(Frame::Return(ReturnFrame::new(statement)))
        }
        Statement::ThrowStatement(statement) => {
            FrameStep::Replace(Frame::Throw(ThrowFrame::new(statement)))
        }
        Statement::TryStatement(statement) => {
            FrameStep::Replace(Frame::Try(TryFrame::new(statement)))
        }
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(ast::Declaration::VariableDeclaration(declaration)) => FrameStep::Replace(
                Frame::VariableDeclaration(VariableDeclarationFrame::new(declaration)),
            ),
            Some(ast::Declaration::ClassDeclaration(class)) => {
                let result = (|| -> JsResult<()> {
                    let value = class_definition_evaluation(agent, class, None)?;
                    if let Some(id) = &class.id {
                        let name = HeapString::from_str(agent, id.name.as_str());
                        let env = agent.current_lexical_environment();
                        env.initialize_binding(agent, name, Value::Object(value))?;
                    }
                    Ok(())
                })();
                match result {
                    Ok(()) => empty_step(),
                    Err(err) => throw_step(err),
                }
            }
            _ => empty_step(),
        },
        Statement::WithStatement(statement) => {
            if agent.in_strict_mode() {
                return throw_step(agent.throw_exception_with_static_message(
                    ExceptionType::SyntaxError,
                    "'with' statements are not allowed in strict mode",
                ));
            }
            FrameStep::Replace(Frame::With(WithFrame::new(statement)))
        }
        _ => throw_step(agent.throw_exception_with_static_message(
            ExceptionType::SyntaxError,
            "Unsupported statement form",
        )),
    }
}

/// ### [14.13 Labelled Statements](https://tc39.es/ecma262/#sec-labelled-statements)
///
/// Collects the label chain, hands the label set to a loop or switch when
/// one is the labelled item, and wraps everything for break matching.
fn begin_labelled_statement(
    agent: &mut Agent,
    node: &'static ast::Statement<'static>,
) -> FrameStep {
    let mut labels: Vec<HeapString> = Vec::new();
    let mut inner = node;
    while let ast::Statement::LabeledStatement(labelled) = inner {
        let label = HeapString::from_str(agent, labelled.label.name.as_str());
        labels.push(label);
        inner = &labelled.body;
    }
    let inner_frame = match inner {
        ast::Statement::WhileStatement(statement) => {
            Frame::While(WhileFrame::new(statement, labels.clone()))
        }
        ast::Statement::DoWhileStatement(statement) => {
            Frame::DoWhile(DoWhileFrame::new(statement, labels.clone()))
        }
        ast::Statement::ForStatement(statement) => {
            Frame::For(ForFrame::new(statement, labels.clone()))
        }
        ast::Statement::ForInStatement(statement) => {
            Frame::ForIn(ForInFrame::new(statement, labels.clone()))
        }
        ast::Statement::ForOfStatement(statement) => {
            Frame::ForOf(ForOfFrame::new(statement, labels.clone()))
        }
        ast::Statement::SwitchStatement(statement) => {
            Frame::Switch(SwitchFrame::new(statement, labels.clone()))
        }
        _ => statement_frame(inner),
    };
    FrameStep::Replace(Frame::Labelled(LabelledFrame {
        labels,
        inner: Some(Box::new(inner_frame)),
    }))
}

fn label_matches(labels: &[HeapString], target: &Option<HeapString>) -> bool {
    match target {
        None => true,
        Some(target) => labels.contains(target),
    }
}

/// ### [14.2 Block](https://tc39.es/ecma262/#sec-block)
#[derive(Debug)]
pub struct StatementListFrame {
    statements: &'static [ast::Statement<'static>],
    index: usize,
    value: Option<Value>,
}

impl StatementListFrame {
    pub(crate) fn new(statements: &'static [ast::Statement<'static>]) -> Self {
        Self {
            statements,
            index: 0,
            value: None,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let _ = agent;
        if let Some(input) = input {
            // The statement list's value is the last non-empty statement
            // value (UpdateEmpty threading).
            match input {
                Completion::Normal(Some(value)) => self.value = Some(value),
                Completion::Normal(None) => {}
                abrupt => return FrameStep::Done(abrupt),
            }
        }
        match self.statements.get(self.index) {
            None => FrameStep::Done(Completion::Normal(self.value)),
            Some(statement) => {
                self.index += 1;
                FrameStep::Push(statement_frame(statement))
            }
        }
    }
}

/// ### [14.2.3 BlockDeclarationInstantiation ( code, env )](https://tc39.es/ecma262/#sec-blockdeclarationinstantiation)
pub(crate) fn block_declaration_instantiation(
    agent: &mut Agent,
    statements: &'static [ast::Statement<'static>],
    env: EnvironmentIndex,
) -> JsResult<()> {
    let declarations = statements_lexically_scoped_declarations(statements);
    for declaration in &declarations {
        let is_constant = declaration.is_constant_declaration();
        let mut names: Vec<HeapString> = Vec::new();
        declaration.bound_names(&mut |identifier| {
            let name = HeapString::from_str(agent, identifier.name.as_str());
            names.push(name);
        });
        for name in names {
            if is_constant {
                env.create_immutable_binding(agent, name, true)?;
            } else {
                env.create_mutable_binding(agent, name, false)?;
            }
        }
        // Function declarations are initialized eagerly so that intra-block
        // hoisting works.
        if let LexicallyScopedDeclaration::Function(function) = declaration {
            let name = HeapString::from_str(agent, function.id.as_ref().unwrap().name.as_str());
            let private_env = agent
                .running_execution_context()
                .ecmascript_code
                .as_ref()
                .unwrap()
                .private_environment;
            let function_object =
                instantiate_ordinary_function_object(agent, function, env, private_env);
            env.initialize_binding(agent, name, Value::Object(function_object))?;
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct BlockFrame {
    statements: &'static [ast::Statement<'static>],
    saved_env: Option<EnvironmentIndex>,
}

impl BlockFrame {
    pub(crate) fn new(statements: &'static [ast::Statement<'static>]) -> Self {
        Self {
            statements,
            saved_env: None,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match input {
            None => {
                // 1. Let blockEnv be NewDeclarativeEnvironment(oldEnv).
                let old_env = agent.current_lexical_environment();
                let block_env = EnvironmentIndex::Declarative(new_declarative_environment(
                    agent,
                    Some(old_env),
                ));
                // 2. Perform BlockDeclarationInstantiation(StatementList,
                //    blockEnv).
                if let Err(err) =
                    block_declaration_instantiation(agent, self.statements, block_env)
                {
                    return throw_step(err);
                }
                // 3. Set the running execution context's LexicalEnvironment
                //    to blockEnv.
                agent.set_current_lexical_environment(block_env);
                self.saved_env = Some(old_env);
                FrameStep::Push(Frame::StatementList(StatementListFrame::new(
                    self.statements,
                )))
            }
            Some(completion) => {
                // 5. Restore the LexicalEnvironment.
                if let Some(saved) = self.saved_env.take() {
                    agent.set_current_lexical_environment(saved);
                }
                FrameStep::Done(completion)
            }
        }
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        if let Some(saved) = self.saved_env.take() {
            agent.set_current_lexical_environment(saved);
        }
    }
}

/// ### [14.3 Declarations and the Variable Statement](https://tc39.es/ecma262/#sec-declarations-and-the-variable-statement)
#[derive(Debug)]
pub struct VariableDeclarationFrame {
    node: &'static ast::VariableDeclaration<'static>,
    index: usize,
    /// Set while the current declarator's initializer is being evaluated.
    awaiting_initializer: bool,
}

impl VariableDeclarationFrame {
    pub(crate) fn new(node: &'static ast::VariableDeclaration<'static>) -> Self {
        Self {
            node,
            index: 0,
            awaiting_initializer: false,
        }
    }

    fn is_lexical(&self) -> bool {
        self.node.kind != ast::VariableDeclarationKind::Var
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if self.awaiting_initializer {
            self.awaiting_initializer = false;
            let value = value_of(input);
            let declarator = &self.node.declarations[self.index];
            self.index += 1;
            let result = self.bind_declarator(agent, declarator, value);
            if let Err(err) = result {
                return throw_step(err);
            }
            return self.step(agent, None);
        }
        let Some(declarator) = self.node.declarations.get(self.index) else {
            // Declarations complete with an empty normal completion.
            return empty_step();
        };
        match &declarator.init {
            Some(init) => {
                self.awaiting_initializer = true;
                // An anonymous initializer picks up the binding's name.
                let name = match &declarator.id.kind {
                    ast::BindingPatternKind::BindingIdentifier(identifier)
                        if is_anonymous_function_definition(init) =>
                    {
                        Some(PropertyKey::from_str(agent, identifier.name.as_str()))
                    }
                    _ => None,
                };
                FrameStep::Push(named_expression_frame(init, name))
            }
            None => {
                self.index += 1;
                // 1. `var x;` performs no work at evaluation time; `let x;`
                //    initializes the binding to undefined.
                if self.is_lexical() {
                    let ast::BindingPatternKind::BindingIdentifier(identifier) =
                        &declarator.id.kind
                    else {
                        unreachable!("uninitialized declarators are plain identifiers")
                    };
                    let name = HeapString::from_str(agent, identifier.name.as_str());
                    let env = agent.current_lexical_environment();
                    if let Err(err) = env.initialize_binding(agent, name, Value::Undefined) {
                        return throw_step(err);
                    }
                }
                self.step(agent, None)
            }
        }
    }

    fn bind_declarator(
        &self,
        agent: &mut Agent,
        declarator: &'static ast::VariableDeclarator<'static>,
        value: Value,
    ) -> JsResult<()> {
        if self.is_lexical() {
            let env = agent.current_lexical_environment();
            binding_initialization_for_pattern(agent, &declarator.id, value, Some(env))
        } else {
            match &declarator.id.kind {
                ast::BindingPatternKind::BindingIdentifier(identifier) => {
                    // 14.3.2.1: var bindings assign through PutValue so
                    // that the existing hoisted binding is updated.
                    let name = HeapString::from_str(agent, identifier.name.as_str());
                    let reference = resolve_binding(agent, name, None)?;
                    reference.put_value(agent, value)
                }
                _ => binding_initialization_for_pattern(agent, &declarator.id, value, None),
            }
        }
    }
}

/// ### [14.6 The if Statement](https://tc39.es/ecma262/#sec-if-statement)
#[derive(Debug)]
pub struct IfFrame {
    node: &'static ast::IfStatement<'static>,
    tested: bool,
}

impl IfFrame {
    pub(crate) fn new(node: &'static ast::IfStatement<'static>) -> Self {
        Self {
            node,
            tested: false,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match (self.tested, input) {
            (false, None) => FrameStep::Push(Frame::expression(&self.node.test)),
            (false, Some(input)) => {
                self.tested = true;
                let test = value_of(Some(input)).to_boolean(agent);
                let branch = if test {
                    Some(&self.node.consequent)
                } else {
                    self.node.alternate.as_ref()
                };
                match branch {
                    Some(branch) => FrameStep::Push(statement_frame(branch)),
                    // 3. Return undefined when the untaken branch is
                    //    absent.
                    None => FrameStep::Done(Completion::normal(Value::Undefined)),
                }
            }
            (true, Some(completion)) => {
                // Completion: UpdateEmpty(stmtCompletion, undefined).
                FrameStep::Done(completion.update_empty(Some(Value::Undefined)))
            }
            (true, None) => unreachable!(),
        }
    }
}

/// ### [14.7.3 The while Statement](https://tc39.es/ecma262/#sec-while-statement)
#[derive(Debug)]
pub struct WhileFrame {
    node: &'static ast::WhileStatement<'static>,
    labels: Vec<HeapString>,
    in_body: bool,
    value: Option<Value>,
}

impl WhileFrame {
    pub(crate) fn new(node: &'static ast::WhileStatement<'static>, labels: Vec<HeapString>) -> Self {
        Self {
            node,
            labels,
            in_body: false,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        loop_observes(&self.labels, completion)
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match input {
            None => FrameStep::Push(Frame::expression(&self.node.test)),
            Some(completion) => {
                if self.in_body {
                    self.in_body = false;
                    match completion {
                        Completion::Normal(value) => {
                            if let Some(value) = value {
                                self.value = Some(value);
                            }
                        }
                        Completion::Continue(ref target)
                            if label_matches(&self.labels, target) => {}
                        Completion::Break(ref target)
                            if label_matches(&self.labels, target) =>
                        {
                            return FrameStep::Done(Completion::Normal(self.value));
                        }
                        abrupt => return FrameStep::Done(abrupt),
                    }
                    FrameStep::Push(Frame::expression(&self.node.test))
                } else {
                    let test = value_of(Some(completion)).to_boolean(agent);
                    if !test {
                        return FrameStep::Done(Completion::Normal(self.value));
                    }
                    self.in_body = true;
                    FrameStep::Push(statement_frame(&self.node.body))
                }
            }
        }
    }
}

fn loop_observes(labels: &[HeapString], completion: &Completion) -> bool {
    match completion {
        Completion::Break(target) | Completion::Continue(target) => {
            label_matches(labels, target)
        }
        _ => false,
    }
}

/// ### [14.7.2 The do-while Statement](https://tc39.es/ecma262/#sec-do-while-statement)
#[derive(Debug)]
pub struct DoWhileFrame {
    node: &'static ast::DoWhileStatement<'static>,
    labels: Vec<HeapString>,
    in_body: bool,
    value: Option<Value>,
}

impl DoWhileFrame {
    pub(crate) fn new(
        node: &'static ast::DoWhileStatement<'static>,
        labels: Vec<HeapString>,
    ) -> Self {
        Self {
            node,
            labels,
            in_body: false,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        loop_observes(&self.labels, completion)
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match input {
            None => {
                self.in_body = true;
                FrameStep::Push(statement_frame(&self.node.body))
            }
            Some(completion) => {
                if self.in_body {
                    self.in_body = false;
                    match completion {
                        Completion::Normal(value) => {
                            if let Some(value) = value {
                                self.value = Some(value);
                            }
                        }
                        Completion::Continue(ref target)
                            if label_matches(&self.labels, target) => {}
                        Completion::Break(ref target)
                            if label_matches(&self.labels, target) =>
                        {
                            return FrameStep::Done(Completion::Normal(self.value));
                        }
                        abrupt => return FrameStep::Done(abrupt),
                    }
                    FrameStep::Push(Frame::expression(&self.node.test))
                } else {
                    let test = value_of(Some(completion)).to_boolean(agent);
                    if !test {
                        return FrameStep::Done(Completion::Normal(self.value));
                    }
                    self.in_body = true;
                    FrameStep::Push(statement_frame(&self.node.body))
                }
            }
        }
    }
}

/// ### [14.7.4 The for Statement](https://tc39.es/ecma262/#sec-for-statement)
#[derive(Debug)]
pub struct ForFrame {
    node: &'static ast::ForStatement<'static>,
    labels: Vec<HeapString>,
    state: ForState,
    /// Bound names of a `let` head, copied between iterations.
    per_iteration_names: Vec<HeapString>,
    saved_env: Option<EnvironmentIndex>,
    value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForState {
    Start,
    Init,
    Test,
    Body,
    Update,
}

impl ForFrame {
    pub(crate) fn new(node: &'static ast::ForStatement<'static>, labels: Vec<HeapString>) -> Self {
        Self {
            node,
            labels,
            state: ForState::Start,
            per_iteration_names: Vec::new(),
            saved_env: None,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        self.state == ForState::Body && loop_observes(&self.labels, completion)
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        self.restore_env(agent);
    }

    fn restore_env(&mut self, agent: &mut Agent) {
        if let Some(saved) = self.saved_env.take() {
            agent.set_current_lexical_environment(saved);
        }
    }

    /// ### [14.7.4.3 ForBodyEvaluation, CreatePerIterationEnvironment](https://tc39.es/ecma262/#sec-createperiterationenvironment)
    fn create_per_iteration_environment(&self, agent: &mut Agent) -> JsResult<()> {
        if self.per_iteration_names.is_empty() {
            return Ok(());
        }
        let last_env = agent.current_lexical_environment();
        let outer = last_env.get_outer_env(agent);
        let fresh = EnvironmentIndex::Declarative(new_declarative_environment(agent, outer));
        for name in &self.per_iteration_names {
            // b.iii. Copy each binding's value into the fresh record.
            let value = last_env.get_binding_value(agent, *name, true)?;
            fresh.create_mutable_binding(agent, *name, false)?;
            fresh.initialize_binding(agent, *name, value)?;
        }
        agent.set_current_lexical_environment(fresh);
        Ok(())
    }

    fn proceed_to_test(&mut self, agent: &mut Agent) -> FrameStep {
        self.state = ForState::Test;
        match &self.node.test {
            Some(test) => FrameStep::Push(Frame::expression(test)),
            None => {
                // No test means the loop condition is always true.
                self.state = ForState::Body;
                FrameStep::Push(statement_frame(&self.node.body))
            }
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self.state {
            ForState::Start => {
                match &self.node.init {
                    Some(ast::ForStatementInit::VariableDeclaration(declaration)) => {
                        if declaration.kind != ast::VariableDeclarationKind::Var {
                            // 14.7.4.2: a lexical head gets its own scope;
                            // `let` names are refreshed per iteration.
                            let old_env = agent.current_lexical_environment();
                            let loop_env = EnvironmentIndex::Declarative(
                                new_declarative_environment(agent, Some(old_env)),
                            );
                            let is_const =
                                declaration.kind == ast::VariableDeclarationKind::Const;
                            let mut names = Vec::new();
                            for declarator in &declaration.declarations {
                                use oxc_ecmascript::BoundNames;
                                declarator.id.bound_names(&mut |identifier| {
                                    let name =
                                        HeapString::from_str(agent, identifier.name.as_str());
                                    names.push(name);
                                });
                            }
                            for name in &names {
                                let result = if is_const {
                                    loop_env.create_immutable_binding(agent, *name, true)
                                } else {
                                    loop_env.create_mutable_binding(agent, *name, false)
                                };
                                if let Err(err) = result {
                                    return throw_step(err);
                                }
                            }
                            if !is_const {
                                self.per_iteration_names = names;
                            }
                            self.saved_env = Some(old_env);
                            agent.set_current_lexical_environment(loop_env);
                        }
                        self.state = ForState::Init;
                        FrameStep::Push(Frame::VariableDeclaration(
                            VariableDeclarationFrame::new(declaration),
                        ))
                    }
                    Some(init) => {
                        let expression = init
                            .as_expression()
                            .expect("non-declaration for-heads are expressions");
                        self.state = ForState::Init;
                        FrameStep::Push(Frame::expression(expression))
                    }
                    None => self.proceed_to_test(agent),
                }
            }
            ForState::Init => {
                let _ = input;
                if let Err(err) = self.create_per_iteration_environment(agent) {
                    self.restore_env(agent);
                    return throw_step(err);
                }
                self.proceed_to_test(agent)
            }
            ForState::Test => {
                let test = value_of(input).to_boolean(agent);
                if !test {
                    self.restore_env(agent);
                    return FrameStep::Done(Completion::Normal(self.value));
                }
                self.state = ForState::Body;
                FrameStep::Push(statement_frame(&self.node.body))
            }
            ForState::Body => {
                match input.expect("loop body completion") {
                    Completion::Normal(value) => {
                        if let Some(value) = value {
                            self.value = Some(value);
                        }
                    }
                    Completion::Continue(ref target) if label_matches(&self.labels, target) => {}
                    Completion::Break(ref target) if label_matches(&self.labels, target) => {
                        self.restore_env(agent);
                        return FrameStep::Done(Completion::Normal(self.value));
                    }
                    abrupt => {
                        self.restore_env(agent);
                        return FrameStep::Done(abrupt);
                    }
                }
                if let Err(err) = self.create_per_iteration_environment(agent) {
                    self.restore_env(agent);
                    return throw_step(err);
                }
                match &self.node.update {
                    Some(update) => {
                        self.state = ForState::Update;
                        FrameStep::Push(Frame::expression(update))
                    }
                    None => self.proceed_to_test(agent),
                }
            }
            ForState::Update => {
                let _ = input;
                self.proceed_to_test(agent)
            }
        }
    }
}

/// The binding step shared by for-in and for-of heads.
fn bind_for_head(
    agent: &mut Agent,
    left: &'static ast::ForStatementLeft<'static>,
    value: Value,
    saved_env: &mut Option<EnvironmentIndex>,
) -> JsResult<()> {
    match left {
        ast::ForStatementLeft::VariableDeclaration(declaration) => {
            let declarator = &declaration.declarations[0];
            if declaration.kind == ast::VariableDeclarationKind::Var {
                // ForBinding with var: assign through the existing binding.
                binding_initialization_for_pattern(agent, &declarator.id, value, None)
            } else {
                // Lexical ForBinding: a fresh per-iteration environment.
                let outer = agent.current_lexical_environment();
                if saved_env.is_none() {
                    *saved_env = Some(outer);
                }
                let iteration_env =
                    EnvironmentIndex::Declarative(new_declarative_environment(agent, Some(outer)));
                use oxc_ecmascript::BoundNames;
                let is_const = declaration.kind == ast::VariableDeclarationKind::Const;
                let mut names = Vec::new();
                declarator.id.bound_names(&mut |identifier| {
                    names.push(HeapString::from_str(agent, identifier.name.as_str()));
                });
                for name in names {
                    if is_const {
                        iteration_env.create_immutable_binding(agent, name, true)?;
                    } else {
                        iteration_env.create_mutable_binding(agent, name, false)?;
                    }
                }
                agent.set_current_lexical_environment(iteration_env);
                binding_initialization_for_pattern(
                    agent,
                    &declarator.id,
                    value,
                    Some(iteration_env),
                )
            }
        }
        _ => {
            let target = left
                .as_assignment_target()
                .expect("for-head left sides are declarations or assignment targets");
            destructuring_assignment_evaluation(agent, target, value)
        }
    }
}

fn restore_for_head_env(agent: &mut Agent, saved_env: &mut Option<EnvironmentIndex>) {
    if let Some(saved) = *saved_env {
        agent.set_current_lexical_environment(saved);
    }
}

/// ### [14.7.5 The for-in Statement](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements)
#[derive(Debug)]
pub struct ForInFrame {
    node: &'static ast::ForInStatement<'static>,
    labels: Vec<HeapString>,
    state: ForInState,
    keys: Vec<PropertyKey>,
    object: Option<Object>,
    next_index: usize,
    saved_env: Option<EnvironmentIndex>,
    value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForInState {
    Start,
    Body,
}

impl ForInFrame {
    pub(crate) fn new(node: &'static ast::ForInStatement<'static>, labels: Vec<HeapString>) -> Self {
        Self {
            node,
            labels,
            state: ForInState::Start,
            keys: Vec::new(),
            object: None,
            next_index: 0,
            saved_env: None,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        self.state == ForInState::Body && loop_observes(&self.labels, completion)
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self.state {
            ForInState::Start => match input {
                None => FrameStep::Push(Frame::expression(&self.node.right)),
                Some(input) => {
                    let value = value_of(Some(input));
                    // 6.b. If exprValue is undefined or null, the loop body
                    //      never runs.
                    if value.is_nullish() {
                        return FrameStep::Done(Completion::Normal(None));
                    }
                    let object = match to_object(agent, value) {
                        Ok(object) => object,
                        Err(err) => return throw_step(err),
                    };
                    // EnumerateObjectProperties: own and inherited
                    // enumerable string keys, shadowed names visited once.
                    match enumerate_object_properties(agent, object) {
                        Ok(keys) => self.keys = keys,
                        Err(err) => return throw_step(err),
                    }
                    self.object = Some(object);
                    self.advance(agent)
                }
            },
            ForInState::Body => {
                restore_for_head_env(agent, &mut self.saved_env);
                match input.expect("loop body completion") {
                    Completion::Normal(value) => {
                        if let Some(value) = value {
                            self.value = Some(value);
                        }
                    }
                    Completion::Continue(ref target) if label_matches(&self.labels, target) => {}
                    Completion::Break(ref target) if label_matches(&self.labels, target) => {
                        return FrameStep::Done(Completion::Normal(self.value));
                    }
                    abrupt => return FrameStep::Done(abrupt),
                }
                self.advance(agent)
            }
        }
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        restore_for_head_env(agent, &mut self.saved_env);
    }

    fn advance(&mut self, agent: &mut Agent) -> FrameStep {
        let object = self.object.unwrap();
        loop {
            let Some(key) = self.keys.get(self.next_index).copied() else {
                return FrameStep::Done(Completion::Normal(self.value));
            };
            self.next_index += 1;
            // A property deleted mid-iteration is skipped.
            match crate::ecmascript::abstract_operations::operations_on_objects::has_property(
                agent, object, key,
            ) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => return throw_step(err),
            }
            let key_value = key.to_value(agent);
            if let Err(err) = bind_for_head(agent, &self.node.left, key_value, &mut self.saved_env)
            {
                restore_for_head_env(agent, &mut self.saved_env);
                return throw_step(err);
            }
            self.state = ForInState::Body;
            return FrameStep::Push(statement_frame(&self.node.body));
        }
    }
}

/// ### [14.7.5.10 EnumerateObjectProperties ( O )](https://tc39.es/ecma262/#sec-enumerate-object-properties)
fn enumerate_object_properties(agent: &mut Agent, object: Object) -> JsResult<Vec<PropertyKey>> {
    let mut visited: hashbrown::HashSet<PropertyKey> = hashbrown::HashSet::new();
    let mut keys = Vec::new();
    let mut current = Some(object);
    while let Some(target) = current {
        for key in target.internal_own_property_keys(agent)? {
            if key.is_symbol() || !visited.insert(key) {
                continue;
            }
            let Some(descriptor) = target.internal_get_own_property(agent, key)? else {
                continue;
            };
            if descriptor.enumerable == Some(true) {
                keys.push(key);
            }
        }
        current = target.internal_get_prototype_of(agent)?;
    }
    Ok(keys)
}

/// ### [14.7.5 The for-of Statement](https://tc39.es/ecma262/#sec-for-in-and-for-of-statements)
#[derive(Debug)]
pub struct ForOfFrame {
    node: &'static ast::ForOfStatement<'static>,
    labels: Vec<HeapString>,
    state: ForOfState,
    iterator: Option<IteratorRecord>,
    saved_env: Option<EnvironmentIndex>,
    value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForOfState {
    Start,
    AwaitingNext,
    Body,
}

impl ForOfFrame {
    pub(crate) fn new(node: &'static ast::ForOfStatement<'static>, labels: Vec<HeapString>) -> Self {
        Self {
            node,
            labels,
            state: ForOfState::Start,
            iterator: None,
            saved_env: None,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        self.state == ForOfState::Body && loop_observes(&self.labels, completion)
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, completion: &Completion) {
        restore_for_head_env(agent, &mut self.saved_env);
        // Abrupt exit closes the iterator; a close failure is ignored when
        // the incoming completion is already abrupt.
        if let (Some(iterator), Completion::Throw(_) | Completion::Return(_)) =
            (&self.iterator, completion)
        {
            let _ = iterator_close(agent, iterator, Ok(Value::Undefined));
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self.state {
            ForOfState::Start => match input {
                None => FrameStep::Push(Frame::expression(&self.node.right)),
                Some(input) => {
                    let value = value_of(Some(input));
                    if self.node.r#await {
                        // for await: prefer the async iterator when the
                        // object provides one; otherwise each sync value is
                        // awaited individually.
                        let iterator = get_iterator(agent, value, true)
                            .or_else(|_| get_iterator(agent, value, false));
                        match iterator {
                            Ok(iterator) => self.iterator = Some(iterator),
                            Err(err) => return throw_step(err),
                        }
                    } else {
                        match get_iterator(agent, value, false) {
                            Ok(iterator) => self.iterator = Some(iterator),
                            Err(err) => return throw_step(err),
                        }
                    }
                    self.advance(agent)
                }
            },
            ForOfState::AwaitingNext => {
                // Resumption of the awaited next value in a for await
                // loop.
                let completion = input.expect("await resumption carries a completion");
                let value = match completion {
                    Completion::Normal(value) => value.unwrap_or(Value::Undefined),
                    abrupt => return FrameStep::Done(abrupt),
                };
                self.bind_and_run(agent, value)
            }
            ForOfState::Body => {
                restore_for_head_env(agent, &mut self.saved_env);
                match input.expect("loop body completion") {
                    Completion::Normal(value) => {
                        if let Some(value) = value {
                            self.value = Some(value);
                        }
                    }
                    Completion::Continue(ref target) if label_matches(&self.labels, target) => {}
                    Completion::Break(ref target) if label_matches(&self.labels, target) => {
                        let iterator = self.iterator.unwrap();
                        return match iterator_close(agent, &iterator, Ok(())) {
                            Ok(()) => FrameStep::Done(Completion::Normal(self.value)),
                            Err(err) => throw_step(err),
                        };
                    }
                    abrupt => return FrameStep::Done(abrupt),
                }
                self.advance(agent)
            }
        }
    }

    fn advance(&mut self, agent: &mut Agent) -> FrameStep {
        let mut iterator = self.iterator.unwrap();
        let step = iterator_step_value(agent, &mut iterator);
        self.iterator = Some(iterator);
        match step {
            Err(err) => throw_step(err),
            Ok(None) => FrameStep::Done(Completion::Normal(self.value)),
            Ok(Some(value)) => {
                if self.node.r#await {
                    self.state = ForOfState::AwaitingNext;
                    return FrameStep::Await(value);
                }
                self.bind_and_run(agent, value)
            }
        }
    }

    fn bind_and_run(&mut self, agent: &mut Agent, value: Value) -> FrameStep {
        if let Err(err) = bind_for_head(agent, &self.node.left, value, &mut self.saved_env) {
            restore_for_head_env(agent, &mut self.saved_env);
            let iterator = self.iterator.unwrap();
            let close_result: JsResult<()> =
                iterator_close(agent, &iterator, Err(err));
            return match close_result {
                Err(err) => throw_step(err),
                Ok(()) => unreachable!("closing over a throw preserves it"),
            };
        }
        self.state = ForOfState::Body;
        FrameStep::Push(statement_frame(&self.node.body))
    }
}

/// ### [14.12 The switch Statement](https://tc39.es/ecma262/#sec-switch-statement)
#[derive(Debug)]
pub struct SwitchFrame {
    node: &'static ast::SwitchStatement<'static>,
    labels: Vec<HeapString>,
    state: SwitchState,
    discriminant: Value,
    /// Index of the case whose test is being evaluated.
    test_index: usize,
    /// Index of the case whose consequent is running.
    run_index: usize,
    saved_env: Option<EnvironmentIndex>,
    value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchState {
    Discriminant,
    FindCase,
    Running,
}

impl SwitchFrame {
    pub(crate) fn new(node: &'static ast::SwitchStatement<'static>, labels: Vec<HeapString>) -> Self {
        Self {
            node,
            labels,
            state: SwitchState::Discriminant,
            discriminant: Value::Undefined,
            test_index: 0,
            run_index: 0,
            saved_env: None,
            value: None,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        self.state == SwitchState::Running
            && matches!(completion, Completion::Break(target) if label_matches(&self.labels, target))
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match self.state {
            SwitchState::Discriminant => match input {
                None => FrameStep::Push(Frame::expression(&self.node.discriminant)),
                Some(input) => {
                    self.discriminant = value_of(Some(input));
                    // The case block gets one shared declaration scope.
                    let old_env = agent.current_lexical_environment();
                    let block_env = EnvironmentIndex::Declarative(new_declarative_environment(
                        agent,
                        Some(old_env),
                    ));
                    for case in &self.node.cases {
                        if let Err(err) = block_declaration_instantiation(
                            agent,
                            &case.consequent,
                            block_env,
                        ) {
                            return throw_step(err);
                        }
                    }
                    agent.set_current_lexical_environment(block_env);
                    self.saved_env = Some(old_env);
                    self.state = SwitchState::FindCase;
                    self.find_case(agent, None)
                }
            },
            SwitchState::FindCase => self.find_case(agent, input),
            SwitchState::Running => {
                match input.expect("switch consequent completion") {
                    Completion::Normal(value) => {
                        if let Some(value) = value {
                            self.value = Some(value);
                        }
                    }
                    Completion::Break(ref target) if label_matches(&self.labels, target) => {
                        return self.finish(agent);
                    }
                    abrupt => {
                        self.restore_env(agent);
                        return FrameStep::Done(abrupt);
                    }
                }
                self.run_index += 1;
                self.run_next(agent)
            }
        }
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        self.restore_env(agent);
    }

    fn restore_env(&mut self, agent: &mut Agent) {
        if let Some(saved) = self.saved_env.take() {
            agent.set_current_lexical_environment(saved);
        }
    }

    fn finish(&mut self, agent: &mut Agent) -> FrameStep {
        self.restore_env(agent);
        FrameStep::Done(Completion::Normal(self.value))
    }

    /// Evaluates case tests in source order until one strictly equals the
    /// discriminant; absent a match, execution starts at the default case.
    fn find_case(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if let Some(input) = input {
            let test = value_of(Some(input));
            if is_strictly_equal(agent, self.discriminant, test) {
                self.run_index = self.test_index;
                self.state = SwitchState::Running;
                return self.run_next(agent);
            }
            self.test_index += 1;
        }
        loop {
            match self.node.cases.get(self.test_index) {
                None => {
                    // No matching case: run from the default clause.
                    match self.node.cases.iter().position(|case| case.test.is_none()) {
                        Some(default_index) => {
                            self.run_index = default_index;
                            self.state = SwitchState::Running;
                            return self.run_next(agent);
                        }
                        None => return self.finish(agent),
                    }
                }
                Some(case) => match &case.test {
                    None => {
                        self.test_index += 1;
                        continue;
                    }
                    Some(test) => {
                        return FrameStep::Push(Frame::expression(test));
                    }
                },
            }
        }
    }

    fn run_next(&mut self, agent: &mut Agent) -> FrameStep {
        match self.node.cases.get(self.run_index) {
            None => self.finish(agent),
            Some(case) => FrameStep::Push(Frame::StatementList(StatementListFrame::new(
                &case.consequent,
            ))),
        }
    }
}

/// ### [14.13 Labelled Statements](https://tc39.es/ecma262/#sec-labelled-statements)
#[derive(Debug)]
pub struct LabelledFrame {
    pub(crate) labels: Vec<HeapString>,
    pub(crate) inner: Option<Box<Frame>>,
}

impl LabelledFrame {
    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        matches!(completion, Completion::Break(Some(target)) if self.labels.contains(target))
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let _ = agent;
        match input {
            None => FrameStep::Push(*self.inner.take().expect("labelled body evaluated once")),
            // A matching labelled break produces a normal completion.
            Some(Completion::Break(_)) => FrameStep::Done(Completion::Normal(None)),
            Some(completion) => FrameStep::Done(completion),
        }
    }
}

/// ### [14.15 The try Statement](https://tc39.es/ecma262/#sec-try-statement)
#[derive(Debug)]
pub struct TryFrame {
    node: &'static ast::TryStatement<'static>,
    state: TryState,
}

#[derive(Debug)]
enum TryState {
    Start,
    Block,
    Catch,
    Finally { saved: Completion },
}

impl TryFrame {
    pub(crate) fn new(node: &'static ast::TryStatement<'static>) -> Self {
        Self {
            node,
            state: TryState::Start,
        }
    }

    pub(crate) fn observes_abrupt(&self, completion: &Completion) -> bool {
        let has_finalizer = self.node.finalizer.is_some();
        match self.state {
            // A throw is observed when a handler can catch it; any abrupt
            // completion is observed when a finalizer must run first.
            TryState::Block => {
                has_finalizer
                    || (self.node.handler.is_some()
                        && matches!(completion, Completion::Throw(_)))
            }
            TryState::Catch => has_finalizer,
            // The finalizer's own abrupt completion replaces everything.
            TryState::Start | TryState::Finally { .. } => false,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match &self.state {
            TryState::Start => {
                self.state = TryState::Block;
                FrameStep::Push(Frame::Block(BlockFrame::new(&self.node.block.body)))
            }
            TryState::Block => {
                let completion = input.expect("try block completion");
                if let (Completion::Throw(err), Some(handler)) =
                    (&completion, &self.node.handler)
                {
                    let thrown = err.value();
                    self.state = TryState::Catch;
                    return FrameStep::Push(Frame::Catch(CatchFrame::new(handler, thrown)));
                }
                self.continue_with(agent, completion)
            }
            TryState::Catch => {
                let completion = input.expect("catch clause completion");
                self.continue_with(agent, completion)
            }
            TryState::Finally { saved } => {
                let finalizer_completion = input.expect("finalizer completion");
                // B.3: a normally-completing finalizer re-raises the saved
                // completion; an abrupt finalizer never reaches here (it
                // unwinds past this frame).
                debug_assert!(!finalizer_completion.is_abrupt());
                let saved = *saved;
                FrameStep::Done(saved.update_empty(None))
            }
        }
    }

    fn continue_with(&mut self, _agent: &mut Agent, completion: Completion) -> FrameStep {
        match &self.node.finalizer {
            Some(finalizer) => {
                self.state = TryState::Finally { saved: completion };
                FrameStep::Push(Frame::Block(BlockFrame::new(&finalizer.body)))
            }
            None => FrameStep::Done(completion),
        }
    }
}

/// ### [14.15.2 Runtime Semantics: CatchClauseEvaluation](https://tc39.es/ecma262/#sec-runtime-semantics-catchclauseevaluation)
#[derive(Debug)]
pub struct CatchFrame {
    handler: &'static ast::CatchClause<'static>,
    thrown: Value,
    saved_env: Option<EnvironmentIndex>,
    started: bool,
}

impl CatchFrame {
    pub(crate) fn new(handler: &'static ast::CatchClause<'static>, thrown: Value) -> Self {
        Self {
            handler,
            thrown,
            saved_env: None,
            started: false,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if !self.started {
            self.started = true;
            // 1. Let catchEnv be NewDeclarativeEnvironment(oldEnv), with the
            //    catch parameter bound to the thrown value.
            if let Some(param) = &self.handler.param {
                let old_env = agent.current_lexical_environment();
                let catch_env = EnvironmentIndex::Declarative(new_declarative_environment(
                    agent,
                    Some(old_env),
                ));
                use oxc_ecmascript::BoundNames;
                let mut names = Vec::new();
                param.pattern.bound_names(&mut |identifier| {
                    names.push(HeapString::from_str(agent, identifier.name.as_str()));
                });
                for name in names {
                    if let Err(err) = catch_env.create_mutable_binding(agent, name, false) {
                        return throw_step(err);
                    }
                }
                agent.set_current_lexical_environment(catch_env);
                self.saved_env = Some(old_env);
                if let Err(err) = binding_initialization_for_pattern(
                    agent,
                    &param.pattern,
                    self.thrown,
                    Some(catch_env),
                ) {
                    self.restore_env(agent);
                    return throw_step(err);
                }
            }
            return FrameStep::Push(Frame::Block(BlockFrame::new(&self.handler.body.body)));
        }
        let completion = input.expect("catch body completion");
        self.restore_env(agent);
        FrameStep::Done(completion)
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        self.restore_env(agent);
    }

    fn restore_env(&mut self, agent: &mut Agent) {
        if let Some(saved) = self.saved_env.take() {
            agent.set_current_lexical_environment(saved);
        }
    }
}

/// ### [14.10 The return Statement](https://tc39.es/ecma262/#sec-return-statement)
#[derive(Debug)]
pub struct ReturnFrame {
    node: &'static ast::ReturnStatement<'static>,
}

impl ReturnFrame {
    pub(crate) fn new(node: &'static ast::ReturnStatement<'static>) -> Self {
        Self { node }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        let _ = agent;
        match (&self.node.argument, input) {
            (Some(argument), None) => FrameStep::Push(Frame::expression(argument)),
            (None, None) => FrameStep::Done(Completion::Return(Value::Undefined)),
            (_, Some(input)) => {
                let value = value_of(Some(input));
                FrameStep::Done(Completion::Return(value))
            }
        }
    }
}

/// ### [14.14 The throw Statement](https://tc39.es/ecma262/#sec-throw-statement)
#[derive(Debug)]
pub struct ThrowFrame {
    node: &'static ast::ThrowStatement<'static>,
}

impl ThrowFrame {
    pub(crate) fn new(node: &'static ast::ThrowStatement<'static>) -> Self {
        Self { node }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        match input {
            None => FrameStep::Push(Frame::expression(&self.node.argument)),
            Some(input) => {
                let value = value_of(Some(input));
                FrameStep::Done(Completion::Throw(agent.throw_error_value(value)))
            }
        }
    }
}

/// ### [14.11 The with Statement](https://tc39.es/ecma262/#sec-with-statement)
#[derive(Debug)]
pub struct WithFrame {
    node: &'static ast::WithStatement<'static>,
    saved_env: Option<EnvironmentIndex>,
    in_body: bool,
}

impl WithFrame {
    pub(crate) fn new(node: &'static ast::WithStatement<'static>) -> Self {
        Self {
            node,
            saved_env: None,
            in_body: false,
        }
    }

    pub(crate) fn step(&mut self, agent: &mut Agent, input: Option<Completion>) -> FrameStep {
        if !self.in_body {
            match input {
                None => return FrameStep::Push(Frame::expression(&self.node.object)),
                Some(input) => {
                    let value = value_of(Some(input));
                    // 2. Let obj be ? ToObject(val).
                    let object = match to_object(agent, value) {
                        Ok(object) => object,
                        Err(err) => return throw_step(err),
                    };
                    // 3./4. Run the body in an object environment marked as
                    //    a with environment.
                    let old_env = agent.current_lexical_environment();
                    let with_env = EnvironmentIndex::Object(new_object_environment(
                        agent,
                        object,
                        true,
                        Some(old_env),
                    ));
                    agent.set_current_lexical_environment(with_env);
                    self.saved_env = Some(old_env);
                    self.in_body = true;
                    return FrameStep::Push(statement_frame(&self.node.body));
                }
            }
        }
        let completion = input.expect("with body completion");
        self.restore_env(agent);
        FrameStep::Done(completion.update_empty(Some(Value::Undefined)))
    }

    pub(crate) fn on_unwind(&mut self, agent: &mut Agent, _completion: &Completion) {
        self.restore_env(agent);
    }

    fn restore_env(&mut self, agent: &mut Agent) {
        if let Some(saved) = self.saved_env.take() {
            agent.set_current_lexical_environment(saved);
        }
    }
}
