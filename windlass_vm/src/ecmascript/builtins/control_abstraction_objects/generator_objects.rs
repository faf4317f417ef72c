// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.5 Generator Objects](https://tc39.es/ecma262/#sec-generator-objects)

use crate::ecmascript::abstract_operations::operations_on_iterator_objects::create_iter_result_object;
use crate::ecmascript::execution::{
    Agent, ExceptionType, ExecutionContext, JsError, JsResult,
};
use crate::ecmascript::types::{Completion, Object, ObjectKind, Value};
use crate::engine::fiber::{Fiber, FiberStep};

/// A suspended activation: the evaluation fiber together with the
/// execution context it runs in, detached from the context stack between
/// resumptions.
#[derive(Debug)]
pub struct SuspendedActivation {
    pub fiber: Fiber,
    pub execution_context: ExecutionContext,
}

/// ### [\[\[GeneratorState]]](https://tc39.es/ecma262/#sec-properties-of-generator-instances)
#[derive(Debug)]
pub enum GeneratorState {
    SuspendedStart(Box<SuspendedActivation>),
    SuspendedYield(Box<SuspendedActivation>),
    Executing,
    Completed,
}

#[derive(Debug)]
pub struct GeneratorData {
    /// `None` only transiently while the state is being replaced.
    pub generator_state: Option<GeneratorState>,
}

fn generator_data_mut<'a>(agent: &'a mut Agent, generator: Object) -> &'a mut GeneratorData {
    match &mut agent[generator].kind {
        ObjectKind::Generator(data) => data,
        _ => unreachable!("expected a generator object"),
    }
}

/// ### [27.5.3.2 GeneratorValidate ( generator, generatorBrand )](https://tc39.es/ecma262/#sec-generatorvalidate)
pub(crate) fn generator_validate(agent: &mut Agent, value: Value) -> JsResult<Object> {
    if let Value::Object(object) = value {
        if matches!(agent[object].kind, ObjectKind::Generator(_)) {
            return Ok(object);
        }
    }
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Method called on an object that is not a generator",
    ))
}

/// ### [27.5.3.3 GeneratorResume ( generator, value, generatorBrand )](https://tc39.es/ecma262/#sec-generatorresume)
///
/// Returns the visible iterator result object.
pub(crate) fn generator_resume(
    agent: &mut Agent,
    generator: Object,
    value: Value,
) -> JsResult<Value> {
    // 1. Let state be ? GeneratorValidate(generator, generatorBrand).
    let taken = take_suspended_state(agent, generator);
    let activation = match taken {
        TakenState::Executing => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "The generator is already running",
            ));
        }
        // 2. If state is COMPLETED, return CreateIteratorResultObject(
        //    undefined, true).
        TakenState::Completed => {
            return Ok(Value::Object(create_iter_result_object(
                agent,
                Value::Undefined,
                true,
            )));
        }
        // 3. Assert: state is either SUSPENDED-START or SUSPENDED-YIELD;
        //    7. Set generator.[[GeneratorState]] to EXECUTING.
        TakenState::Suspended {
            activation,
            is_start,
        } => {
            let mut activation = activation;
            // 6. Resume the suspended evaluation; the value of the resumed
            //    yield expression is the resumption value. The initial
            //    resume of a suspended-start generator discards it.
            if !is_start {
                activation.fiber.resume_with(Completion::normal(value));
            }
            activation
        }
    };
    drive_generator(agent, generator, activation)
}

enum TakenState {
    Executing,
    Completed,
    Suspended {
        activation: Box<SuspendedActivation>,
        is_start: bool,
    },
}

/// Swaps a suspended generator into the EXECUTING state, handing back its
/// detached activation.
fn take_suspended_state(agent: &mut Agent, generator: Object) -> TakenState {
    let data = generator_data_mut(agent, generator);
    match data.generator_state.as_ref().unwrap() {
        GeneratorState::Executing => TakenState::Executing,
        GeneratorState::Completed => TakenState::Completed,
        GeneratorState::SuspendedStart(_) | GeneratorState::SuspendedYield(_) => {
            let is_start = matches!(
                data.generator_state.as_ref().unwrap(),
                GeneratorState::SuspendedStart(_)
            );
            let Some(
                GeneratorState::SuspendedStart(activation)
                | GeneratorState::SuspendedYield(activation),
            ) = data.generator_state.replace(GeneratorState::Executing)
            else {
                unreachable!()
            };
            TakenState::Suspended {
                activation,
                is_start,
            }
        }
    }
}

/// ### [27.5.3.4 GeneratorResumeAbrupt ( generator, abruptCompletion, generatorBrand )](https://tc39.es/ecma262/#sec-generatorresumeabrupt)
pub(crate) fn generator_resume_abrupt(
    agent: &mut Agent,
    generator: Object,
    abrupt_completion: Completion,
) -> JsResult<Value> {
    debug_assert!(matches!(
        abrupt_completion,
        Completion::Throw(_) | Completion::Return(_)
    ));
    let taken = take_suspended_state(agent, generator);
    let activation = match taken {
        TakenState::Executing => {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "The generator is already running",
            ));
        }
        // 2. A return against SUSPENDED-START transitions straight to
        //    COMPLETED; against COMPLETED both kinds short-circuit.
        TakenState::Completed => {
            return match abrupt_completion {
                Completion::Throw(err) => Err(err),
                Completion::Return(value) => {
                    Ok(Value::Object(create_iter_result_object(agent, value, true)))
                }
                _ => unreachable!(),
            };
        }
        TakenState::Suspended {
            activation,
            is_start,
        } => {
            if is_start {
                generator_data_mut(agent, generator).generator_state =
                    Some(GeneratorState::Completed);
                return match abrupt_completion {
                    Completion::Throw(err) => Err(err),
                    Completion::Return(value) => {
                        Ok(Value::Object(create_iter_result_object(agent, value, true)))
                    }
                    _ => unreachable!(),
                };
            }
            let mut activation = activation;
            // 8. Resume the suspended evaluation by injecting the abrupt
            //    completion at the yield point.
            activation.fiber.resume_with(abrupt_completion);
            activation
        }
    };
    drive_generator(agent, generator, activation)
}

/// Drives the generator's fiber until the next yield marker or its
/// terminal completion.
fn drive_generator(
    agent: &mut Agent,
    generator: Object,
    mut activation: Box<SuspendedActivation>,
) -> JsResult<Value> {
    // 8. Push genContext onto the execution context stack.
    agent.push_execution_context(activation.execution_context.clone());
    loop {
        match activation.fiber.step(agent) {
            FiberStep::Continue => {}
            FiberStep::Yield(iter_result) => {
                // The yield expression already packaged the visible
                // result; detach the context and suspend.
                activation.execution_context = agent.pop_execution_context();
                generator_data_mut(agent, generator).generator_state =
                    Some(GeneratorState::SuspendedYield(activation));
                return Ok(iter_result);
            }
            FiberStep::Await(_) => {
                agent.pop_execution_context();
                generator_data_mut(agent, generator).generator_state =
                    Some(GeneratorState::Completed);
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Cannot await inside a synchronous generator",
                ));
            }
            FiberStep::Done(completion) => {
                agent.pop_execution_context();
                generator_data_mut(agent, generator).generator_state =
                    Some(GeneratorState::Completed);
                return match completion {
                    Completion::Normal(_) => Ok(Value::Object(create_iter_result_object(
                        agent,
                        Value::Undefined,
                        true,
                    ))),
                    Completion::Return(value) => {
                        Ok(Value::Object(create_iter_result_object(agent, value, true)))
                    }
                    Completion::Throw(err) => Err(err),
                    Completion::Break(_) | Completion::Continue(_) => unreachable!(),
                };
            }
        }
    }
}

/// Whether the running execution context belongs to an async generator
/// body, which changes how `yield` suspends.
pub(crate) fn in_async_generator(agent: &Agent) -> bool {
    agent
        .execution_context_stack
        .last()
        .and_then(|context| context.function)
        .is_some_and(|function| match &agent[function].kind {
            ObjectKind::ECMAScriptFunction(data) => data.is_async && data.is_generator,
            _ => false,
        })
}

/// The `Generator.prototype.next/return/throw` behaviours.
pub(crate) fn generator_prototype_next(
    agent: &mut Agent,
    this_value: Value,
    value: Value,
) -> JsResult<Value> {
    // 2. Return ? GeneratorResume(g, value, EMPTY).
    let generator = generator_validate(agent, this_value)?;
    generator_resume(agent, generator, value)
}

pub(crate) fn generator_prototype_return(
    agent: &mut Agent,
    this_value: Value,
    value: Value,
) -> JsResult<Value> {
    // 2. Let C be Completion Record { [[Type]]: RETURN, [[Value]]: value }.
    let generator = generator_validate(agent, this_value)?;
    generator_resume_abrupt(agent, generator, Completion::Return(value))
}

pub(crate) fn generator_prototype_throw(
    agent: &mut Agent,
    this_value: Value,
    value: Value,
) -> JsResult<Value> {
    // 2. Let C be ThrowCompletion(exception).
    let generator = generator_validate(agent, this_value)?;
    generator_resume_abrupt(agent, generator, Completion::Throw(JsError::new(value)))
}
