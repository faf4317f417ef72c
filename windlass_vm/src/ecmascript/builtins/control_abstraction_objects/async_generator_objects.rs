// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.6 AsyncGenerator Objects](https://tc39.es/ecma262/#sec-asyncgenerator-objects)
//!
//! Async generators combine both suspension schemes: a queue of requests,
//! await-driven resumption, and promise-valued results.

use std::collections::VecDeque;

use super::async_function_objects::{drive_async_activation, AwaitTarget};
use super::generator_objects::SuspendedActivation;
use super::promise_objects::promise_abstract_operations::promise_capability_records::PromiseCapability;
use crate::ecmascript::abstract_operations::operations_on_iterator_objects::create_iter_result_object;
use crate::ecmascript::builtins::ecmascript_function::function_declaration_instantiation;
use crate::ecmascript::builtins::ordinary::ordinary_create_from_constructor;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, ExceptionType, JsError, JsResult, ProtoIntrinsics};
use crate::ecmascript::types::{Completion, Object, ObjectKind, Value};
use crate::engine::fiber::Fiber;

/// ### [\[\[AsyncGeneratorState]]](https://tc39.es/ecma262/#sec-properties-of-asyncgenerator-intances)
#[derive(Debug)]
pub enum AsyncGeneratorState {
    SuspendedStart(Box<SuspendedActivation>),
    SuspendedYield(Box<SuspendedActivation>),
    /// Running, or parked behind an await reaction that owns the
    /// activation.
    Executing,
    Completed,
}

/// ### [27.6.3.1 AsyncGeneratorRequest Records](https://tc39.es/ecma262/#sec-asyncgeneratorrequest-records)
#[derive(Debug)]
pub struct AsyncGeneratorRequest {
    pub completion: Completion,
    pub capability: PromiseCapability,
}

#[derive(Debug)]
pub struct AsyncGeneratorData {
    pub state: AsyncGeneratorState,
    pub queue: VecDeque<AsyncGeneratorRequest>,
}

fn async_generator_data_mut<'a>(
    agent: &'a mut Agent,
    generator: Object,
) -> &'a mut AsyncGeneratorData {
    match &mut agent[generator].kind {
        ObjectKind::AsyncGenerator(data) => data,
        _ => unreachable!("expected an async generator object"),
    }
}

/// ### [15.6.2 Runtime Semantics: EvaluateAsyncGeneratorBody](https://tc39.es/ecma262/#sec-runtime-semantics-evaluateasyncgeneratorbody)
pub(crate) fn evaluate_async_generator_body(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    // 1. Perform ? FunctionDeclarationInstantiation(functionObject,
    //    argumentsList).
    function_declaration_instantiation(agent, function, arguments)?;
    // 2. Let generator be ? OrdinaryCreateFromConstructor(functionObject,
    //    "%AsyncGeneratorPrototype%", « ... »).
    let generator = ordinary_create_from_constructor(
        agent,
        function,
        ProtoIntrinsics::AsyncGenerator,
        ObjectKind::AsyncGenerator(Box::new(AsyncGeneratorData {
            state: AsyncGeneratorState::Completed,
            queue: VecDeque::new(),
        })),
    )?;
    // 4. Perform AsyncGeneratorStart(generator, FunctionBody).
    let fiber = Fiber::for_function_body(agent, function);
    let execution_context = agent.running_execution_context().clone();
    async_generator_data_mut(agent, generator).state =
        AsyncGeneratorState::SuspendedStart(Box::new(SuspendedActivation {
            fiber,
            execution_context,
        }));
    // 7. Return generator.
    Ok(Value::Object(generator))
}

/// ### [27.6.3.3 AsyncGeneratorValidate ( generator, generatorBrand )](https://tc39.es/ecma262/#sec-asyncgeneratorvalidate)
pub(crate) fn async_generator_validate(agent: &mut Agent, value: Value) -> JsResult<Object> {
    if let Value::Object(object) = value {
        if matches!(agent[object].kind, ObjectKind::AsyncGenerator(_)) {
            return Ok(object);
        }
    }
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Method called on an object that is not an async generator",
    ))
}

/// ### [27.6.3.4 AsyncGeneratorEnqueue ( generator, completion, promiseCapability )](https://tc39.es/ecma262/#sec-asyncgeneratorenqueue)
pub(crate) fn async_generator_enqueue(
    agent: &mut Agent,
    generator: Object,
    completion: Completion,
    capability: PromiseCapability,
) {
    let data = async_generator_data_mut(agent, generator);
    // 1. Append the request to generator.[[AsyncGeneratorQueue]].
    data.queue.push_back(AsyncGeneratorRequest {
        completion,
        capability,
    });
    // 2. A suspended generator starts draining immediately; an executing
    //    one will pick the request up when it suspends or completes.
    let should_resume = !matches!(data.state, AsyncGeneratorState::Executing);
    if should_resume {
        async_generator_resume_next(agent, generator);
    }
}

/// ### [27.6.3.5 AsyncGeneratorResumeNext ( generator )](https://tc39.es/ecma262/#sec-asyncgeneratorresumenext)
pub(crate) fn async_generator_resume_next(agent: &mut Agent, generator: Object) {
    enum NextAction {
        Idle,
        Settle(AsyncGeneratorRequest),
        Resume {
            activation: Box<SuspendedActivation>,
            resume: Option<Completion>,
        },
    }
    loop {
        let action = {
            let data = async_generator_data_mut(agent, generator);
            if data.queue.is_empty() {
                NextAction::Idle
            } else {
                match &data.state {
                    AsyncGeneratorState::Executing => NextAction::Idle,
                    // 10. A completed generator settles requests without
                    //     running any code.
                    AsyncGeneratorState::Completed => {
                        NextAction::Settle(data.queue.pop_front().unwrap())
                    }
                    AsyncGeneratorState::SuspendedStart(_)
                    | AsyncGeneratorState::SuspendedYield(_) => {
                        let is_start =
                            matches!(data.state, AsyncGeneratorState::SuspendedStart(_));
                        let (AsyncGeneratorState::SuspendedStart(activation)
                        | AsyncGeneratorState::SuspendedYield(activation)) =
                            std::mem::replace(&mut data.state, AsyncGeneratorState::Executing)
                        else {
                            unreachable!()
                        };
                        // The front request stays queued while the body
                        // runs; it settles at the next yield or
                        // completion.
                        let completion = data.queue.front().unwrap().completion;
                        let resume = match completion {
                            Completion::Normal(_) if is_start => None,
                            completion => Some(completion),
                        };
                        NextAction::Resume { activation, resume }
                    }
                }
            }
        };
        match action {
            NextAction::Idle => return,
            NextAction::Settle(request) => {
                match request.completion {
                    Completion::Normal(_) => {
                        let result = create_iter_result_object(agent, Value::Undefined, true);
                        request.capability.try_resolve(agent, Value::Object(result));
                    }
                    Completion::Return(value) => {
                        let result = create_iter_result_object(agent, value, true);
                        request.capability.try_resolve(agent, Value::Object(result));
                    }
                    Completion::Throw(err) => {
                        request.capability.reject(agent, err.value());
                    }
                    _ => unreachable!(),
                }
                continue;
            }
            NextAction::Resume { activation, resume } => {
                drive_async_activation(
                    agent,
                    *activation,
                    AwaitTarget::AsyncGenerator { generator },
                    resume,
                );
                return;
            }
        }
    }
}

/// Settles the front request at a yield point and re-suspends.
pub(crate) fn async_generator_handle_yield(
    agent: &mut Agent,
    generator: Object,
    activation: SuspendedActivation,
    value: Value,
) {
    let data = async_generator_data_mut(agent, generator);
    data.state = AsyncGeneratorState::SuspendedYield(Box::new(activation));
    let request = data.queue.pop_front().expect("a yield settles a queued request");
    // 27.6.3.8 AsyncGeneratorYield: the request resolves with the iterator
    // result of the yielded value.
    let result = create_iter_result_object(agent, value, false);
    request.capability.try_resolve(agent, Value::Object(result));
    // Further queued requests resume the generator again.
    async_generator_resume_next(agent, generator);
}

/// Settles the front request with the body's terminal completion.
pub(crate) fn async_generator_handle_completion(
    agent: &mut Agent,
    generator: Object,
    completion: Completion,
) {
    let data = async_generator_data_mut(agent, generator);
    data.state = AsyncGeneratorState::Completed;
    let request = data
        .queue
        .pop_front()
        .expect("a completing body settles a queued request");
    match completion {
        Completion::Normal(_) => {
            let result = create_iter_result_object(agent, Value::Undefined, true);
            request.capability.try_resolve(agent, Value::Object(result));
        }
        Completion::Return(value) => {
            let result = create_iter_result_object(agent, value, true);
            request.capability.try_resolve(agent, Value::Object(result));
        }
        Completion::Throw(err) => {
            request.capability.reject(agent, err.value());
        }
        _ => unreachable!(),
    }
    async_generator_resume_next(agent, generator);
}

/// The `AsyncGenerator.prototype.next/return/throw` behaviours: every call
/// returns a promise for the matching iterator result.
pub(crate) fn async_generator_prototype_resume(
    agent: &mut Agent,
    this_value: Value,
    completion_kind: AsyncGeneratorResumeKind,
    value: Value,
) -> JsResult<Value> {
    let capability = PromiseCapability::new(agent);
    match async_generator_validate(agent, this_value) {
        Ok(generator) => {
            let completion = match completion_kind {
                AsyncGeneratorResumeKind::Next => Completion::normal(value),
                AsyncGeneratorResumeKind::Return => Completion::Return(value),
                AsyncGeneratorResumeKind::Throw => Completion::Throw(JsError::new(value)),
            };
            async_generator_enqueue(agent, generator, completion, capability);
        }
        Err(err) => {
            capability.reject(agent, err.value());
        }
    }
    Ok(Value::Object(capability.promise()))
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum AsyncGeneratorResumeKind {
    Next,
    Return,
    Throw,
}
