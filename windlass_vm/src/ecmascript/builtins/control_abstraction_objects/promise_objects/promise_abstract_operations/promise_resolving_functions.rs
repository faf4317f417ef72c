// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [27.2.1.3 CreateResolvingFunctions ( promise )](https://tc39.es/ecma262/#sec-createresolvingfunctions)

use super::promise_capability_records::PromiseCapability;
use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{Agent, JsResult};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseResolvingFunctionType {
    Resolve,
    Reject,
}

/// The internal slots of a promise resolving function: the promise it
/// settles and which side of the pair it is. The shared already-resolved
/// cell lives on the promise's pending state.
#[derive(Debug, Clone, Copy)]
pub struct PromiseResolvingFunctionData {
    pub(crate) promise: Object,
    pub(crate) resolve_type: PromiseResolvingFunctionType,
}

/// ### [27.2.1.3 CreateResolvingFunctions ( promise )](https://tc39.es/ecma262/#sec-createresolvingfunctions)
pub fn create_resolving_functions(agent: &mut Agent, promise: Object) -> (Object, Object) {
    let function_prototype = agent.current_realm().intrinsics.function_prototype();
    let mut make = |agent: &mut Agent, resolve_type| {
        let function = agent.heap.create_object(ObjectHeapData::new(
            Some(function_prototype),
            ObjectKind::PromiseResolvingFunction(PromiseResolvingFunctionData {
                promise,
                resolve_type,
            }),
        ));
        let length_key = PropertyKey::from_str(agent, "length");
        agent[function].properties.set(
            length_key,
            Property::data(Value::Number(1.0), false, false, true),
        );
        let name_key = PropertyKey::from_str(agent, "name");
        let name = Value::from_str(agent, "");
        agent[function]
            .properties
            .set(name_key, Property::data(name, false, false, true));
        function
    };
    let resolve = make(agent, PromiseResolvingFunctionType::Resolve);
    let reject = make(agent, PromiseResolvingFunctionType::Reject);
    (resolve, reject)
}

/// The \[\[Call]] behaviour of both resolving functions.
pub fn promise_resolving_function_call(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let ObjectKind::PromiseResolvingFunction(data) = &agent[function].kind else {
        unreachable!()
    };
    let data = *data;
    let capability = PromiseCapability::from_promise(data.promise);
    let argument = arguments.get(0);
    match data.resolve_type {
        // 27.2.1.3.2: the resolve function runs the resolution algorithm
        // unless the pair has already fired.
        PromiseResolvingFunctionType::Resolve => capability.try_resolve(agent, argument),
        // 27.2.1.3.1: the reject function rejects directly.
        PromiseResolvingFunctionType::Reject => capability.reject(agent, argument),
    }
    // Both return undefined.
    Ok(Value::Undefined)
}
