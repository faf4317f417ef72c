// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The evaluation engine: a stepwise fiber over explicit frames.
//!
//! Evaluation state lives on a [`fiber::Fiber`]'s frame stack rather than
//! the native call stack, so a fiber can stop after any bounded step and
//! resume later. Generators and async functions own their fibers and
//! detach them between resumptions; scripts are drained through the same
//! interface.
//!
//! Native re-entry (builtins invoking user code, getters hit by abstract
//! operations, iterator protocol calls) spins a nested fiber to
//! completion instead.

pub mod dispatch;
pub mod fiber;
pub(crate) mod expressions;
pub(crate) mod patterns;
pub(crate) mod reference;
pub(crate) mod statements;

use oxc_ast::ast;

use crate::ecmascript::execution::{
    new_function_environment, Agent, EnvironmentIndex, ECMAScriptCodeEvaluationState,
    ExecutionContext, FunctionEnvironmentRecord, JsResult,
};
use crate::ecmascript::types::{Completion, Object, Value};
use fiber::Fiber;

/// Evaluates one expression in the current execution context, driving a
/// nested fiber to completion.
pub(crate) fn evaluate_expression_native(
    agent: &mut Agent,
    expression: &'static ast::Expression<'static>,
) -> JsResult<Value> {
    let mut fiber = Fiber::for_expression(expression);
    fiber.run_to_completion(agent).into_js_result()
}

/// Evaluates an expression inside a fresh function-environment context
/// whose `this` is already bound, the shape class field initializers and
/// static blocks run in.
pub(crate) fn evaluate_expression_with_this(
    agent: &mut Agent,
    function: Object,
    this_value: Value,
    expression: &'static ast::Expression<'static>,
) -> JsResult<Value> {
    let local_env = push_method_context(agent, function, this_value)?;
    let _ = local_env;
    let result = evaluate_expression_native(agent, expression);
    agent.pop_execution_context();
    result
}

/// Runs a `static { }` block with the class constructor as `this`.
pub(crate) fn run_class_static_block(
    agent: &mut Agent,
    class_constructor: Object,
    statements: &'static oxc_allocator::Vec<'static, ast::Statement<'static>>,
) -> JsResult<()> {
    push_method_context(agent, class_constructor, Value::Object(class_constructor))?;
    let mut fiber = Fiber::for_statements(statements);
    let completion = fiber.run_to_completion(agent);
    agent.pop_execution_context();
    match completion {
        Completion::Normal(_) | Completion::Return(_) => Ok(()),
        Completion::Throw(err) => Err(err),
        Completion::Break(_) | Completion::Continue(_) => unreachable!(),
    }
}

fn push_method_context(
    agent: &mut Agent,
    function: Object,
    this_value: Value,
) -> JsResult<crate::ecmascript::execution::FunctionEnvironment> {
    let data = crate::ecmascript::builtins::ecmascript_function::function_data(agent, function);
    let realm = data.realm;
    let script_or_module = data.script_or_module;
    let source_code = data.source_code;
    let private_environment = data.private_environment;
    let local_env = new_function_environment(agent, function, None);
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: Some(ECMAScriptCodeEvaluationState {
            lexical_environment: EnvironmentIndex::Function(local_env),
            variable_environment: EnvironmentIndex::Function(local_env),
            private_environment,
            is_strict_mode: true,
            source_code,
        }),
        function: Some(function),
        realm,
        script_or_module,
    });
    if let Err(err) = FunctionEnvironmentRecord::bind_this_value(agent, local_env, this_value) {
        agent.pop_execution_context();
        return Err(err);
    }
    Ok(local_env)
}
