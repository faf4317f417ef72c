// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.3 Built-in Function Objects](https://tc39.es/ecma262/#sec-built-in-function-objects)

use crate::ecmascript::builtins::ArgumentsList;
use crate::ecmascript::execution::{
    Agent, ExceptionType, ExecutionContext, JsResult, RealmIdentifier,
};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Value,
};

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList) -> JsResult<Value>;
pub type ConstructorFn = fn(&mut Agent, Value, ArgumentsList, Option<Object>) -> JsResult<Value>;

/// The native behaviour of a built-in function. Constructor behaviours
/// receive `new.target`, `None` when \[\[Call]]ed.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Regular(RegularFn),
    Constructor(ConstructorFn),
}

/// A description of one built-in function: its name, its `length`, and its
/// native behaviour. Intrinsic modules implement this per function and
/// hand the type to the builders.
pub trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;
    /// Getter/setter builtins carry the `get `/`set ` name prefix.
    const NAME_PREFIX: &'static str = "";
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunctionData {
    pub(crate) behaviour: Behaviour,
    /// \[\[Realm]]
    pub(crate) realm: RealmIdentifier,
}

impl BuiltinFunctionData {
    pub fn is_constructor(&self) -> bool {
        matches!(self.behaviour, Behaviour::Constructor(_))
    }
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
pub fn create_builtin_function(
    agent: &mut Agent,
    behaviour: Behaviour,
    name: &str,
    length: u8,
    name_prefix: &str,
) -> Object {
    // 2. If realm is not present, set realm to the current Realm Record.
    let realm = agent.current_realm_id();
    // 5. Let func be a new built-in function object.
    let prototype = agent.current_realm().intrinsics.function_prototype();
    let function = agent.heap.create_object(ObjectHeapData::new(
        Some(prototype),
        ObjectKind::BuiltinFunction(BuiltinFunctionData { behaviour, realm }),
    ));
    // 7. Perform SetFunctionLength(func, length).
    let length_key = PropertyKey::from_str(agent, "length");
    agent[function].properties.set(
        length_key,
        Property::data(Value::Number(length as f64), false, false, true),
    );
    // 9./10. Perform SetFunctionName(func, name, prefix).
    let name_value = if name_prefix.is_empty() {
        Value::from_str(agent, name)
    } else {
        Value::from_string(agent, format!("{name_prefix}{name}"))
    };
    let name_key = PropertyKey::from_str(agent, "name");
    agent[function]
        .properties
        .set(name_key, Property::data(name_value, false, false, true));
    // 11. Return func.
    function
}

/// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
pub fn builtin_function_call(
    agent: &mut Agent,
    function: Object,
    this_argument: Value,
    arguments: ArgumentsList,
) -> JsResult<Value> {
    let ObjectKind::BuiltinFunction(data) = &agent[function].kind else {
        unreachable!()
    };
    let behaviour = data.behaviour;
    let realm = data.realm;
    // 2.-7. Prepare a new execution context for the builtin and make it the
    //    running execution context.
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: None,
        function: Some(function),
        realm,
        script_or_module: None,
    });
    // 8. Let result be the Completion Record that is the result of
    //    evaluating F in a manner that conforms to this specification.
    let result = match behaviour {
        Behaviour::Regular(behaviour) => behaviour(agent, this_argument, arguments),
        Behaviour::Constructor(behaviour) => behaviour(agent, this_argument, arguments, None),
    };
    // 9. Remove calleeContext from the execution context stack.
    agent.pop_execution_context();
    // 11. Return ? result.
    result
}

/// ### [10.3.2 \[\[Construct\]\] ( argumentsList, newTarget )](https://tc39.es/ecma262/#sec-built-in-function-objects-construct-argumentslist-newtarget)
pub fn builtin_function_construct(
    agent: &mut Agent,
    function: Object,
    arguments: ArgumentsList,
    new_target: Object,
) -> JsResult<Object> {
    let ObjectKind::BuiltinFunction(data) = &agent[function].kind else {
        unreachable!()
    };
    let Behaviour::Constructor(behaviour) = data.behaviour else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Function is not a constructor",
        ));
    };
    let realm = data.realm;
    agent.push_execution_context(ExecutionContext {
        ecmascript_code: None,
        function: Some(function),
        realm,
        script_or_module: None,
    });
    let result = behaviour(agent, Value::Undefined, arguments, Some(new_target));
    agent.pop_execution_context();
    match result? {
        Value::Object(object) => Ok(object),
        _ => unreachable!("builtin constructors always return objects"),
    }
}
