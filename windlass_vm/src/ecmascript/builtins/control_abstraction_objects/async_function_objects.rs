// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.7 AsyncFunction Objects](https://tc39.es/ecma262/#sec-async-function-objects)
//!
//! Async functions reuse the generator machinery: the body runs on its own
//! fiber, `await` suspends it with an await marker, and the driver turns
//! the marker into promise reactions scheduled on the job queue. The
//! function's visible result is the promise of the capability made at call
//! time.

use super::generator_objects::SuspendedActivation;
use super::promise_objects::promise_abstract_operations::promise_capability_records::{
    inner_promise_then, promise_resolve, PromiseCapability,
};
use super::promise_objects::promise_objects_data::PromiseReactionHandler;
use crate::ecmascript::execution::Agent;
use crate::ecmascript::types::{Completion, Object, Value};
use crate::engine::fiber::{Fiber, FiberStep};
pub use crate::heap::AwaitReaction;

/// What a suspended await continuation resumes into: an async function's
/// result capability, or an async generator's request queue.
#[derive(Debug, Clone, Copy)]
pub enum AwaitTarget {
    AsyncFunction { capability: PromiseCapability },
    AsyncGenerator { generator: Object },
}

/// The heap data of one suspended await point.
#[derive(Debug)]
pub struct AwaitReactionData {
    pub(crate) activation: Option<SuspendedActivation>,
    pub(crate) target: AwaitTarget,
}

/// ### [27.7.5.1 AsyncFunctionStart ( promiseCapability, asyncFunctionBody )](https://tc39.es/ecma262/#sec-async-functions-abstract-operations-async-function-start)
///
/// Runs the body until it returns, throws, or suspends on its first
/// await. Called with the function's execution context on top of the
/// stack.
pub fn async_function_start(agent: &mut Agent, capability: PromiseCapability, fiber: Fiber) {
    let execution_context = agent.running_execution_context().clone();
    let activation = SuspendedActivation {
        fiber,
        execution_context,
    };
    drive_async_activation(
        agent,
        activation,
        AwaitTarget::AsyncFunction { capability },
        None,
    );
}

/// Advances a suspended async activation with the given resumption
/// completion (from a settled awaited promise), or starts it fresh.
pub(crate) fn resume_await_reaction(
    agent: &mut Agent,
    reaction: AwaitReaction,
    completion: Completion,
) {
    let data = agent.heap.await_reactions[reaction.into_index()]
        .as_mut()
        .expect("await reaction resumed twice");
    let Some(activation) = data.activation.take() else {
        unreachable!("await reaction resumed twice")
    };
    let target = data.target;
    // [27.7.5.3 Await]: resume the suspended evaluation inside its own
    // execution context.
    agent.push_execution_context(activation.execution_context.clone());
    let mut activation = activation;
    activation.fiber.resume_with(completion);
    drive_async_activation_pushed(agent, activation, target);
}

/// Entry point that still needs to push the activation's context.
pub(crate) fn drive_async_activation(
    agent: &mut Agent,
    activation: SuspendedActivation,
    target: AwaitTarget,
    resume: Option<Completion>,
) {
    agent.push_execution_context(activation.execution_context.clone());
    let mut activation = activation;
    if let Some(completion) = resume {
        activation.fiber.resume_with(completion);
    }
    drive_async_activation_pushed(agent, activation, target);
}

fn drive_async_activation_pushed(
    agent: &mut Agent,
    mut activation: SuspendedActivation,
    target: AwaitTarget,
) {
    loop {
        match activation.fiber.step(agent) {
            FiberStep::Continue => {}
            // ### [27.7.5.3 Await ( value )](https://tc39.es/ecma262/#await)
            FiberStep::Await(value) => {
                // 2.-5. Detach the running context and park the activation
                //    behind fulfil/reject continuations on the resolved
                //    promise.
                activation.execution_context = agent.pop_execution_context();
                let reaction = agent.heap.create_await_reaction(AwaitReactionData {
                    activation: Some(activation),
                    target,
                });
                // 2. Let promise be ? PromiseResolve(%Promise%, value).
                let promise = promise_resolve(agent, value);
                // 7. Perform PerformPromiseThen(promise, onFulfilled,
                //    onRejected).
                inner_promise_then(
                    agent,
                    promise,
                    PromiseReactionHandler::Await(reaction),
                    PromiseReactionHandler::Await(reaction),
                    None,
                );
                return;
            }
            FiberStep::Yield(value) => match target {
                AwaitTarget::AsyncFunction { .. } => {
                    unreachable!("async function bodies cannot yield")
                }
                // An async generator parks at the yield and settles the
                // current request.
                AwaitTarget::AsyncGenerator { generator } => {
                    activation.execution_context = agent.pop_execution_context();
                    super::async_generator_objects::async_generator_handle_yield(
                        agent, generator, activation, value,
                    );
                    return;
                }
            },
            // ### [27.7.5.2 AsyncBlockStart, steps 2.e-g](https://tc39.es/ecma262/#sec-asyncblockstart)
            FiberStep::Done(completion) => {
                agent.pop_execution_context();
                match target {
                    AwaitTarget::AsyncFunction { capability } => match completion {
                        // e./f. A normal or return completion resolves the
                        //    promise with the carried value.
                        Completion::Normal(value) => {
                            capability.try_resolve(agent, value.unwrap_or(Value::Undefined));
                        }
                        Completion::Return(value) => {
                            capability.try_resolve(agent, value);
                        }
                        // g. A throw completion rejects it.
                        Completion::Throw(err) => {
                            capability.reject(agent, err.value());
                        }
                        Completion::Break(_) | Completion::Continue(_) => unreachable!(),
                    },
                    AwaitTarget::AsyncGenerator { generator } => {
                        super::async_generator_objects::async_generator_handle_completion(
                            agent, generator, completion,
                        );
                    }
                }
                return;
            }
        }
    }
}
