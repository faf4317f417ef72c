// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.1 Bound Function Exotic Objects](https://tc39.es/ecma262/#sec-bound-function-exotic-objects)

use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{Object, ObjectHeapData, ObjectKind, Value};

#[derive(Debug, Clone)]
pub struct BoundFunctionData {
    /// \[\[BoundTargetFunction]]
    pub bound_target_function: Object,
    /// \[\[BoundThis]]
    pub bound_this: Value,
    /// \[\[BoundArguments]]
    pub bound_arguments: Vec<Value>,
}

/// ### [10.4.1.3 BoundFunctionCreate ( targetFunction, boundThis, boundArgs )](https://tc39.es/ecma262/#sec-boundfunctioncreate)
pub fn bound_function_create(
    agent: &mut Agent,
    target_function: Object,
    bound_this: Value,
    bound_arguments: Vec<Value>,
) -> JsResult<Object> {
    // 1. Let proto be ? targetFunction.[[GetPrototypeOf]]().
    let prototype = target_function.internal_get_prototype_of(agent)?;
    // 2.-7. Create the exotic object with the bound slots.
    Ok(agent.heap.create_object(ObjectHeapData::new(
        prototype,
        ObjectKind::BoundFunction(Box::new(BoundFunctionData {
            bound_target_function: target_function,
            bound_this,
            bound_arguments,
        })),
    )))
}

fn assemble_arguments(data: &BoundFunctionData, arguments: ArgumentsList) -> Vec<Value> {
    let mut args = Vec::with_capacity(data.bound_arguments.len() + arguments.len());
    args.extend_from_slice(&data.bound_arguments);
    args.extend_from_slice(arguments.0);
    args
}

/// ### [10.4.1.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-call-thisargument-argumentslist)
pub fn bound_function_call(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let ObjectKind::BoundFunction(data) = &agent[function].kind else {
        unreachable!()
    };
    // 1.-3. Assemble boundArgs + argumentsList.
    let target = data.bound_target_function;
    let bound_this = data.bound_this;
    let args = assemble_arguments(data, arguments);
    // 5. Return ? Call(target, boundThis, args).
    target.internal_call(agent, bound_this, ArgumentsList(&args))
}

/// ### [10.4.1.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-bound-function-exotic-objects-construct-argumentslist-newtarget)
pub fn bound_function_construct(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    let ObjectKind::BoundFunction(data) = &agent[function].kind else {
        unreachable!()
    };
    let target = data.bound_target_function;
    // 1. Let target be F.[[BoundTargetFunction]];
    // 2. Assert: IsConstructor(target) is true.
    let args = assemble_arguments(data, arguments);
    // 4. If SameValue(F, newTarget) is true, set newTarget to target.
    let new_target = if new_target == function {
        target
    } else {
        new_target
    };
    // 5. Return ? Construct(target, args, newTarget).
    target.internal_construct(agent, ArgumentsList(&args), new_target)
}
