// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)
//!
//! The error heap marker plus the construction path the agent itself uses
//! to throw. Error objects carry `message` and `name` properties and a
//! non-standard `stack` captured at construction.

use crate::ecmascript::execution::{Agent, ExceptionType};
use crate::ecmascript::types::{
    Object, ObjectHeapData, ObjectKind, Property, PropertyKey, Value,
};

/// The `ErrorData` internal slot: marks an object as an Error and records
/// which error kind allocated it.
#[derive(Debug, Clone, Copy)]
pub struct ErrorData {
    pub kind: ExceptionType,
}

/// Creates an error object of the given kind with a message and a captured
/// stack trace. This is the path `Agent::throw_exception` takes; the error
/// constructors go through `OrdinaryCreateFromConstructor` instead so that
/// subclassing works.
pub fn create_error_object(
    agent: &mut Agent,
    kind: ExceptionType,
    message: String,
) -> Object {
    // Intrinsics may not exist yet while a realm is still assembling; fall
    // back to a prototype-less error rather than failing the throw.
    let prototype = if agent.execution_context_stack.is_empty() {
        None
    } else {
        agent.current_realm().intrinsics.try_get(match kind {
            ExceptionType::Error => "%Error.prototype%",
            ExceptionType::AggregateError => "%AggregateError.prototype%",
            ExceptionType::EvalError => "%EvalError.prototype%",
            ExceptionType::RangeError => "%RangeError.prototype%",
            ExceptionType::ReferenceError => "%ReferenceError.prototype%",
            ExceptionType::SyntaxError => "%SyntaxError.prototype%",
            ExceptionType::TypeError => "%TypeError.prototype%",
            ExceptionType::UriError => "%URIError.prototype%",
        })
    };
    let object = agent.heap.create_object(ObjectHeapData::new(
        prototype,
        ObjectKind::Error(ErrorData { kind }),
    ));
    let message_value = Value::from_string(agent, message);
    set_error_properties(agent, object, kind, Some(message_value));
    object
}

/// Installs `message` (when present) and the captured `stack` on a fresh
/// error object. The `name` property is inherited from the prototype for
/// intrinsic-constructed errors, but direct agent throws may lack a
/// prototype chain, so it is defined as an own property there.
pub fn set_error_properties(
    agent: &mut Agent,
    object: Object,
    kind: ExceptionType,
    message: Option<Value>,
) {
    if let Some(message) = message {
        let message_key = PropertyKey::from_str(agent, "message");
        agent[object]
            .properties
            .set(message_key, Property::data(message, true, false, true));
    }
    if agent[object].prototype.is_none() {
        let name = Value::from_str(agent, kind.as_str());
        let name_key = PropertyKey::from_str(agent, "name");
        agent[object]
            .properties
            .set(name_key, Property::data(name, true, false, true));
    }
    capture_error_stack(agent, object, kind);
}

/// Populates the non-standard `stack` property from the current execution
/// context stack.
pub fn capture_error_stack(agent: &mut Agent, object: Object, kind: ExceptionType) {
    let trace = agent.capture_stack_trace();
    let stack = Value::from_string(agent, format!("{}{trace}", kind.as_str()));
    let stack_key = PropertyKey::from_str(agent, "stack");
    agent[object]
        .properties
        .set(stack_key, Property::data(stack, true, false, true));
}

/// Whether the object carries the `ErrorData` marker.
pub fn is_error_object(agent: &Agent, object: Object) -> bool {
    matches!(agent[object].kind, ObjectKind::Error(_))
}
